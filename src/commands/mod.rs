//! CLI command definitions and dispatch.

pub mod admin;
pub mod auth;
pub mod config;
pub mod entity;
pub mod integration;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use tenantguard_core::config::AppConfig;
use tenantguard_core::error::AppError;
use tenantguard_service::Backend;

/// TenantGuard: multi-tenant security operations backend
#[derive(Debug, Parser)]
#[command(name = "tenantguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $TENANTGUARD_CONFIG or config/default.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, first-run setup
    Auth(auth::AuthArgs),
    /// Invitations, roles, and passwords
    User(user::UserArgs),
    /// Admin-access requests
    Admin(admin::AdminArgs),
    /// Generic record operations
    Entity(entity::EntityArgs),
    /// AI assistant, email, and notifications
    Integration(integration::IntegrationArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, self.format);
        }

        let backend = Backend::open(&config).await?;
        match &self.command {
            Commands::Auth(args) => auth::execute(args, &backend, self.format).await,
            Commands::User(args) => user::execute(args, &backend, self.format).await,
            Commands::Admin(args) => admin::execute(args, &backend, self.format).await,
            Commands::Entity(args) => entity::execute(args, &backend, self.format).await,
            Commands::Integration(args) => integration::execute(args, &backend, self.format).await,
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// Helper: the given password, or an interactive prompt for one
pub fn password_or_prompt(password: &Option<String>, confirm: bool) -> Result<String, AppError> {
    if let Some(password) = password {
        return Ok(password.clone());
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
