//! TenantGuard CLI. Drives the backend against the configured store.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use tenantguard_core::config::AppConfig;
use tenantguard_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(path: Option<&str>) -> Result<AppConfig, AppError> {
    let config_path = match path {
        Some(p) => p.to_string(),
        None => std::env::var("TENANTGUARD_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string()),
    };
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
