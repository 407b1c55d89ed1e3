//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tenantguard_core::config::AppConfig;
use tenantguard_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets redacted)
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.auth.session_secret = "********".to_string();
            match format {
                OutputFormat::Json => output::print_item(&shown, format),
                OutputFormat::Table => {
                    output::print_kv("Store backend", &format!("{:?}", shown.store.backend));
                    output::print_kv("Data directory", &shown.store.data_dir);
                    output::print_kv("PBKDF2 iterations", &shown.auth.pbkdf2_iterations.to_string());
                    output::print_kv("Lockout", &format!(
                        "{} failures / {} min",
                        shown.auth.max_failed_attempts, shown.auth.lockout_minutes
                    ));
                    output::print_kv("Invite TTL (min)", &shown.auth.invite_ttl_minutes.to_string());
                    output::print_kv(
                        "AI quota (req/min)",
                        &shown.rate_limit.default_requests_per_min.to_string(),
                    );
                    output::print_kv(
                        "Records API",
                        shown.integrations.api_base_url.as_deref().unwrap_or("(none)"),
                    );
                    output::print_kv("Log level", &shown.logging.level);
                }
            }
        }
    }
    Ok(())
}
