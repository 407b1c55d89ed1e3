//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use tenantguard_auth::{InviteState, NewInvite};
use tenantguard_core::error::AppError;
use tenantguard_entity::{Invitation, Role};
use tenantguard_service::Backend;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Invite a user, creating their account if needed
    Invite {
        /// Invitee email
        #[arg(long)]
        email: String,
        /// Role to grant
        #[arg(long, default_value = "user")]
        role: String,
        /// Target organization (defaults to yours)
        #[arg(long)]
        org: Option<String>,
        /// Target group
        #[arg(long)]
        group: Option<String>,
        /// Only issue the invitation; do not create the account
        #[arg(long)]
        token_only: bool,
    },
    /// Check an invitation token
    InviteStatus {
        /// Invitation token
        token: String,
    },
    /// Redeem an invitation token
    Accept {
        /// Invitation token
        token: String,
        /// New password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Change a user's role
    Role {
        /// User ID
        user_id: String,
        /// New role
        role: String,
    },
    /// Set a user's password
    Password {
        /// User ID
        user_id: String,
        /// New password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

/// Invitation display row for table output
#[derive(Debug, Serialize, Tabled)]
struct InvitationRow {
    /// Invitation ID
    id: String,
    /// Invitee
    email: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Expires at
    expires_at: String,
    /// Token
    token: String,
}

impl From<&Invitation> for InvitationRow {
    fn from(i: &Invitation) -> Self {
        Self {
            id: i.id.clone(),
            email: i.email.clone(),
            role: i.role.to_string(),
            status: i.status.to_string(),
            expires_at: i.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            token: i.token.clone(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    backend: &Backend,
    format: OutputFormat,
) -> Result<(), AppError> {
    let users = backend.users();

    match &args.command {
        UserCommand::Invite {
            email,
            role,
            org,
            group,
            token_only,
        } => {
            let request = NewInvite {
                email: email.clone(),
                role: role.parse::<Role>()?,
                org_id: org.clone(),
                group_id: group.clone(),
            };
            let invitation = if *token_only {
                Some(users.create_invite(request).await?)
            } else {
                users.invite_user(request).await?.invitation
            };
            match invitation {
                Some(invitation) => {
                    output::print_list(&[InvitationRow::from(&invitation)], format)
                }
                None => output::print_warning(&format!("{email} is already active")),
            }
        }
        UserCommand::InviteStatus { token } => match users.get_invite_by_token(token).await? {
            Some(lookup) => {
                output::print_list(&[InvitationRow::from(&lookup.invitation)], format);
                match lookup.state {
                    InviteState::Valid => output::print_success("Invitation is valid"),
                    InviteState::Expired => output::print_warning("Invitation has expired"),
                    InviteState::Invalid => output::print_warning("Invitation is no longer valid"),
                }
            }
            None => output::print_warning("No invitation for that token"),
        },
        UserCommand::Accept { token, password } => {
            let password = super::password_or_prompt(password, true)?;
            let user = users.accept_invite(token, &password).await?;
            output::print_success(&format!("Account {} activated", user.email));
        }
        UserCommand::Role { user_id, role } => {
            let user = users.assign_role(user_id, role.parse::<Role>()?).await?;
            output::print_success(&format!("{} is now {}", user.email, user.role));
        }
        UserCommand::Password { user_id, password } => {
            let password = super::password_or_prompt(password, true)?;
            users.set_password(user_id, &password).await?;
            output::print_success("Password updated");
        }
    }

    Ok(())
}
