//! Admin-access request CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tenantguard_core::error::AppError;
use tenantguard_service::Backend;

/// Arguments for admin-request commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin-request subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin-request subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Ask the organization owner for admin access
    Request {
        /// Why you need it
        #[arg(long)]
        reason: String,
    },
    /// Approve a pending request (owner only)
    Approve {
        /// Request ID
        id: String,
    },
    /// Deny a pending request (owner only)
    Deny {
        /// Request ID
        id: String,
    },
}

/// Execute admin-request commands
pub async fn execute(
    args: &AdminArgs,
    backend: &Backend,
    format: OutputFormat,
) -> Result<(), AppError> {
    let requests = backend.admin_requests();

    let request = match &args.command {
        AdminCommand::Request { reason } => requests.request_admin_access(reason).await?,
        AdminCommand::Approve { id } => requests.approve_admin_request(id).await?,
        AdminCommand::Deny { id } => requests.deny_admin_request(id).await?,
    };

    match format {
        OutputFormat::Json => output::print_item(&request, format),
        OutputFormat::Table => {
            output::print_kv("Request", &request.id);
            output::print_kv("Email", &request.email);
            output::print_kv("Status", request.status.as_str());
        }
    }
    Ok(())
}
