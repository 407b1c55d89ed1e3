//! AI assistant, email, and notification CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use tenantguard_core::error::AppError;
use tenantguard_service::Backend;

/// Arguments for integration commands
#[derive(Debug, Args)]
pub struct IntegrationArgs {
    /// Integration subcommand
    #[command(subcommand)]
    pub command: IntegrationCommand,
}

/// Integration subcommands
#[derive(Debug, Subcommand)]
pub enum IntegrationCommand {
    /// Ask the AI assistant
    Ask {
        /// Prompt text
        prompt: String,
    },
    /// Send an email (mirrored in-app for known recipients)
    Email {
        /// Recipient
        #[arg(long)]
        to: String,
        /// Subject
        #[arg(long)]
        subject: String,
        /// Body
        #[arg(long)]
        body: String,
    },
    /// List your notifications
    Notifications,
    /// Mark a notification as read
    MarkRead {
        /// Notification ID
        id: String,
    },
    /// List document-vault entries for your organization
    Vault,
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Notification ID
    id: String,
    /// Title
    title: String,
    /// Read
    read: bool,
    /// Created at
    created: String,
}

/// Execute integration commands
pub async fn execute(
    args: &IntegrationArgs,
    backend: &Backend,
    format: OutputFormat,
) -> Result<(), AppError> {
    let integrations = backend.integrations();

    match &args.command {
        IntegrationCommand::Ask { prompt } => {
            let reply = integrations.invoke_llm(prompt).await?;
            println!("{reply}");
        }
        IntegrationCommand::Email { to, subject, body } => {
            integrations.send_email(to, subject, body).await?;
            output::print_success(&format!("Email sent to {to}"));
        }
        IntegrationCommand::Notifications => {
            let rows: Vec<NotificationRow> = backend
                .notifications()
                .list_mine()
                .await?
                .iter()
                .map(|n| NotificationRow {
                    id: n.id.clone(),
                    title: n.title.clone(),
                    read: n.read,
                    created: n.created_date.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        IntegrationCommand::MarkRead { id } => {
            backend.notifications().mark_read(id).await?;
            output::print_success("Marked as read");
        }
        IntegrationCommand::Vault => {
            let documents = integrations.vault_documents().await?;
            output::print_item(&documents, format);
        }
    }

    Ok(())
}
