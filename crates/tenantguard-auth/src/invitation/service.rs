//! Issues, looks up, and redeems invitations.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use validator::ValidateEmail;

use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, EmailSender, OutgoingEmail};
use tenantguard_entity::{
    ActivityLog, EntityType, Identity, Invitation, InvitationStatus, Role, User, new_id,
};
use tenantguard_store::{DocumentStore, StoreDocument};

use super::token::generate_token;
use crate::password::{PasswordHasher, PasswordValidator};

/// Input to [`InvitationService::create_invite`] and
/// [`InvitationService::invite_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvite {
    /// Invitee email.
    pub email: String,
    /// Role granted.
    pub role: Role,
    /// Target organization; defaults to the inviter's.
    pub org_id: Option<String>,
    /// Target group.
    pub group_id: Option<String>,
}

/// How a token lookup resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    /// Pending and within its TTL.
    Valid,
    /// No longer pending (used, expired earlier, or denied).
    Invalid,
    /// Was pending but its TTL elapsed; now marked expired.
    Expired,
}

/// Result of [`InvitationService::get_invite_by_token`].
#[derive(Debug, Clone, PartialEq)]
pub struct InviteLookup {
    /// The invitation as stored after the lookup.
    pub invitation: Invitation,
    /// How the lookup resolved.
    pub state: InviteState,
}

/// Result of [`InvitationService::invite_user`].
#[derive(Debug, Clone, PartialEq)]
pub struct InviteOutcome {
    /// The user record, created if it did not exist.
    pub user: User,
    /// The issued invitation; `None` when the user already had credentials.
    pub invitation: Option<Invitation>,
}

/// Invitation lifecycle over the document store.
///
/// Transitions are only `pending → used` and `pending → expired`.
#[derive(Debug)]
pub struct InvitationService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    mailer: Arc<dyn EmailSender>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    /// Token lifetime.
    ttl: Duration,
    /// Base for redemption links.
    app_base_url: String,
}

impl InvitationService {
    /// Creates the service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn EmailSender>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            clock,
            mailer,
            hasher: PasswordHasher::new(config),
            validator: PasswordValidator::new(config),
            ttl: Duration::minutes(config.invite_ttl_minutes),
            app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Redemption link for a token.
    pub fn invite_link(&self, token: &str) -> String {
        format!("{}/accept-invite?token={token}", self.app_base_url)
    }

    /// Issue a pending invitation and email its redemption link.
    pub async fn create_invite(&self, actor: &Identity, request: NewInvite) -> AppResult<Invitation> {
        authorize_invite(actor, request.role)?;
        let request = normalize(actor, request)?;
        self.issue(actor, &request).await
    }

    /// Idempotent invite: an activated user is returned unchanged, an
    /// unactivated one gets a fresh invitation, and an unknown email gets a
    /// new credential-less user plus an invitation.
    pub async fn invite_user(&self, actor: &Identity, request: NewInvite) -> AppResult<InviteOutcome> {
        authorize_invite(actor, request.role)?;
        let request = normalize(actor, request)?;
        let now = self.clock.now();

        let user = self
            .store
            .mutate(|doc| {
                if let Some(existing) = doc.user_by_email(&request.email) {
                    return Ok(existing);
                }
                let user = User {
                    id: new_id(),
                    full_name: display_name(&request.email),
                    email: request.email.clone(),
                    role: request.role,
                    org_id: request.org_id.clone(),
                    group_id: request.group_id.clone(),
                    password_hash: None,
                    password_salt: None,
                    last_login_at: None,
                    login_count: 0,
                    created_date: now,
                    extra: Default::default(),
                };
                doc.upsert(EntityType::User, &user)?;
                Ok(user)
            })
            .await?;

        if user.has_credentials() {
            info!(email = %user.email, "Invitee already active; nothing to send");
            return Ok(InviteOutcome {
                user,
                invitation: None,
            });
        }

        let invitation = self.issue(actor, &request).await?;
        Ok(InviteOutcome {
            user,
            invitation: Some(invitation),
        })
    }

    /// Look up an invitation by token.
    ///
    /// A pending invitation past its deadline is flipped to `expired` and
    /// persisted before being returned.
    pub async fn get_invite_by_token(&self, token: &str) -> AppResult<Option<InviteLookup>> {
        let Some(invitation) = self.find_by_token(token).await? else {
            return Ok(None);
        };

        if invitation.status != InvitationStatus::Pending {
            return Ok(Some(InviteLookup {
                invitation,
                state: InviteState::Invalid,
            }));
        }

        if invitation.is_expired_at(self.clock.now()) {
            let invitation = self.mark_expired(invitation).await?;
            return Ok(Some(InviteLookup {
                invitation,
                state: InviteState::Expired,
            }));
        }

        Ok(Some(InviteLookup {
            invitation,
            state: InviteState::Valid,
        }))
    }

    /// Redeem a token: set the invitee's password and mark the invitation
    /// used.
    ///
    /// Fails with `NotFound`, `AlreadyUsed`, `Expired` (after flipping the
    /// status), or `WeakPassword`; credentials are untouched on failure.
    pub async fn accept_invite(&self, token: &str, password: &str) -> AppResult<User> {
        let invitation = self
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::already_used(format!(
                "Invitation is {}",
                invitation.status
            )));
        }

        let now = self.clock.now();
        if invitation.is_expired_at(now) {
            self.mark_expired(invitation).await?;
            return Err(AppError::expired("Invitation has expired"));
        }

        self.validator.validate(password)?;
        let salt = PasswordHasher::generate_salt();
        let hash = self.hasher.hash_password(password, &salt);

        let user = self
            .store
            .mutate(|doc| {
                let mut invitation: Invitation = doc
                    .get_typed(EntityType::Invitation, &invitation.id)?
                    .ok_or_else(|| AppError::not_found("Invitation not found"))?;
                if !invitation.status.can_transition_to(InvitationStatus::Used) {
                    return Err(AppError::already_used(format!(
                        "Invitation is {}",
                        invitation.status
                    )));
                }

                let mut user = doc
                    .user_by_email(&invitation.email)
                    .unwrap_or_else(|| user_from_invitation(&invitation, now));
                user.password_salt = Some(salt);
                user.password_hash = Some(hash);
                if user.org_id.is_none() {
                    user.org_id = invitation.org_id.clone();
                }
                if user.group_id.is_none() {
                    user.group_id = invitation.group_id.clone();
                }
                doc.upsert(EntityType::User, &user)?;

                invitation.status = InvitationStatus::Used;
                invitation.used_at = Some(now);
                doc.upsert(EntityType::Invitation, &invitation)?;

                log_activity(
                    doc,
                    ActivityLog::new(
                        invitation.org_id.clone(),
                        &user.email,
                        "invite.accepted",
                        EntityType::Invitation.as_str(),
                        Some(invitation.id.clone()),
                        format!("{} activated their account", user.email),
                        now,
                    ),
                )?;
                Ok(user)
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Invitation accepted");
        Ok(user)
    }

    async fn issue(&self, actor: &Identity, request: &NewInvite) -> AppResult<Invitation> {
        let now = self.clock.now();
        let invitation = Invitation {
            id: new_id(),
            email: request.email.clone(),
            role: request.role,
            org_id: request.org_id.clone(),
            group_id: request.group_id.clone(),
            token: generate_token(),
            status: InvitationStatus::Pending,
            expires_at: now + self.ttl,
            used_at: None,
            invited_by: actor.email.clone(),
            created_date: now,
        };

        self.store
            .mutate(|doc| {
                doc.upsert(EntityType::Invitation, &invitation)?;
                log_activity(
                    doc,
                    ActivityLog::new(
                        invitation.org_id.clone(),
                        &actor.email,
                        "invite.created",
                        EntityType::Invitation.as_str(),
                        Some(invitation.id.clone()),
                        format!("Invited {} as {}", invitation.email, invitation.role),
                        now,
                    ),
                )
            })
            .await?;

        let email = OutgoingEmail {
            to: invitation.email.clone(),
            subject: "You're invited to TenantGuard".to_string(),
            body: format!(
                "{} invited you to join as {}.\n\nSet your password here: {}\n\nThis link expires at {}.",
                actor.email,
                invitation.role,
                self.invite_link(&invitation.token),
                invitation.expires_at.to_rfc3339(),
            ),
        };
        if let Err(e) = self.mailer.send(&email).await {
            warn!(email = %invitation.email, error = %e, "Failed to send invitation email");
        }

        info!(
            invitation_id = %invitation.id,
            email = %invitation.email,
            role = %invitation.role,
            "Invitation issued"
        );
        Ok(invitation)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Invitation>> {
        self.store
            .read(|doc| {
                doc.typed::<Invitation>(EntityType::Invitation)
                    .into_iter()
                    .find(|i| i.token == token)
            })
            .await
    }

    async fn mark_expired(&self, mut invitation: Invitation) -> AppResult<Invitation> {
        invitation.status = InvitationStatus::Expired;
        self.store
            .mutate(|doc| doc.upsert(EntityType::Invitation, &invitation))
            .await?;
        info!(invitation_id = %invitation.id, "Invitation expired");
        Ok(invitation)
    }
}

/// Only privileged callers invite, and only an owner grants a privileged role.
fn authorize_invite(actor: &Identity, role: Role) -> AppResult<()> {
    if !actor.is_privileged() {
        return Err(AppError::access_denied("Only owners and admins can invite users"));
    }
    if role.is_privileged() && !actor.is_owner() {
        return Err(AppError::permission_denied(format!(
            "Only an owner can grant the '{role}' role"
        )));
    }
    Ok(())
}

fn normalize(actor: &Identity, mut request: NewInvite) -> AppResult<NewInvite> {
    request.email = request.email.trim().to_lowercase();
    if !request.email.validate_email() {
        return Err(AppError::validation(format!(
            "Invalid email address: '{}'",
            request.email
        )));
    }
    if request.org_id.is_none() {
        request.org_id = actor.org_id.clone();
    }
    Ok(request)
}

fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn user_from_invitation(invitation: &Invitation, now: chrono::DateTime<chrono::Utc>) -> User {
    User {
        id: new_id(),
        full_name: display_name(&invitation.email),
        email: invitation.email.clone(),
        role: invitation.role,
        org_id: invitation.org_id.clone(),
        group_id: invitation.group_id.clone(),
        password_hash: None,
        password_salt: None,
        last_login_at: None,
        login_count: 0,
        created_date: now,
        extra: Default::default(),
    }
}

fn log_activity(doc: &mut StoreDocument, entry: ActivityLog) -> AppResult<()> {
    doc.upsert(EntityType::ActivityLog, &entry)
}
