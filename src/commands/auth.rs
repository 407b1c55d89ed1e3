//! Authentication CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tenantguard_core::error::AppError;
use tenantguard_entity::Plan;
use tenantguard_service::{Backend, BootstrapRequest};

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Create the first organization and its owner
    Bootstrap {
        /// Owner email
        #[arg(long)]
        email: String,
        /// Organization name
        #[arg(long)]
        org_name: String,
        /// Plan (paid or trial)
        #[arg(long, default_value = "trial")]
        plan: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the current identity
    Whoami,
    /// Show the current organization
    Org,
    /// Extend the live session
    Touch,
    /// Reseed demo data and clear session and lockout state
    Reset {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute auth commands
pub async fn execute(
    args: &AuthArgs,
    backend: &Backend,
    format: OutputFormat,
) -> Result<(), AppError> {
    let auth = backend.auth();

    match &args.command {
        AuthCommand::Bootstrap {
            email,
            org_name,
            plan,
            password,
        } => {
            let plan: Plan = plan.parse()?;
            let password = super::password_or_prompt(password, true)?;
            let identity = auth
                .bootstrap_admin(BootstrapRequest {
                    email: email.clone(),
                    password,
                    org_name: org_name.clone(),
                    plan,
                })
                .await?;
            output::print_success(&format!("Created '{org_name}' with owner {}", identity.email));
        }
        AuthCommand::Login { email, password } => {
            let password = super::password_or_prompt(password, false)?;
            let identity = auth.login(email, &password).await?;
            output::print_success(&format!("Signed in as {} ({})", identity.email, identity.role));
        }
        AuthCommand::Logout => {
            auth.logout().await?;
            output::print_success("Signed out");
        }
        AuthCommand::Whoami => {
            let identity = auth.me().await?;
            match format {
                OutputFormat::Json => output::print_item(&identity, format),
                OutputFormat::Table => {
                    output::print_kv("Id", &identity.id);
                    output::print_kv("Name", &identity.full_name);
                    output::print_kv("Email", &identity.email);
                    output::print_kv("Role", identity.role.as_str());
                    output::print_kv("Organization", identity.org_id.as_deref().unwrap_or("-"));
                }
            }
        }
        AuthCommand::Org => match auth.current_org().await? {
            Some(org) => output::print_item(&org, format),
            None => output::print_warning("No organization for the current caller"),
        },
        AuthCommand::Touch => match auth.touch_session().await? {
            Some(session) => {
                output::print_success(&format!("Session extended until {}", session.expires_at))
            }
            None => output::print_warning("No live session"),
        },
        AuthCommand::Reset { force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Replace ALL data with the demo seed?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    output::print_warning("Aborted");
                    return Ok(());
                }
            }
            auth.reset_demo().await?;
            output::print_success("Demo data restored");
        }
    }

    Ok(())
}
