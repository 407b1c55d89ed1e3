//! Invitations, role assignment, and password changes.

use std::sync::Arc;

use tracing::info;

use tenantguard_auth::{
    InvitationService, InviteLookup, InviteOutcome, NewInvite, PasswordHasher, PasswordValidator,
    SessionManager,
};
use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::Clock;
use tenantguard_entity::{ActivityLog, EntityType, Invitation, Role, User};
use tenantguard_store::DocumentStore;

use crate::context::RequestContext;

/// Handles user management on behalf of the current caller.
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
    invitations: Arc<InvitationService>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
        invitations: Arc<InvitationService>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
            invitations,
            hasher: PasswordHasher::new(config),
            validator: PasswordValidator::new(config),
        }
    }

    async fn context(&self) -> AppResult<RequestContext> {
        RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref()).await
    }

    /// Ensure a user exists for `request.email` and, unless they already
    /// have credentials, issue them an invitation.
    pub async fn invite_user(&self, request: NewInvite) -> AppResult<InviteOutcome> {
        let ctx = self.context().await?;
        self.invitations.invite_user(&ctx.identity, request).await
    }

    /// Issue an invitation without touching the `User` collection.
    pub async fn create_invite(&self, request: NewInvite) -> AppResult<Invitation> {
        let ctx = self.context().await?;
        self.invitations.create_invite(&ctx.identity, request).await
    }

    /// Look up an invitation by its token.
    pub async fn get_invite_by_token(&self, token: &str) -> AppResult<Option<InviteLookup>> {
        self.invitations.get_invite_by_token(token).await
    }

    /// Redeem an invitation token with a new password.
    pub async fn accept_invite(&self, token: &str, password: &str) -> AppResult<User> {
        self.invitations.accept_invite(token, password).await
    }

    /// Change a user's role.
    ///
    /// Requires a privileged caller (`AccessDenied`); granting `owner` or
    /// `admin`, or changing the role of an owner or admin, requires an owner
    /// (`PermissionDenied`).
    pub async fn assign_role(&self, user_id: &str, role: Role) -> AppResult<User> {
        let ctx = self.context().await?;
        if !ctx.is_privileged() {
            return Err(AppError::access_denied("Only owners and admins can change roles"));
        }
        if role.is_privileged() && !ctx.is_owner() {
            return Err(AppError::permission_denied(format!(
                "Only an owner can grant the '{role}' role"
            )));
        }

        let now = ctx.request_time;
        let user = self
            .store
            .mutate(|doc| {
                let mut user: User = doc
                    .get_typed(EntityType::User, user_id)?
                    .ok_or_else(|| AppError::not_found("User not found"))?;
                let previous = user.role;
                if previous.is_privileged() && previous != role && !ctx.is_owner() {
                    return Err(AppError::permission_denied(format!(
                        "Only an owner can change the role of an {previous}"
                    )));
                }
                user.role = role;
                doc.upsert(EntityType::User, &user)?;
                doc.upsert(
                    EntityType::ActivityLog,
                    &ActivityLog::new(
                        user.org_id.clone(),
                        &ctx.identity.email,
                        "user.role_changed",
                        EntityType::User.as_str(),
                        Some(user.id.clone()),
                        format!("{} changed from {previous} to {role}", user.email),
                        now,
                    ),
                )?;
                Ok(user)
            })
            .await?;

        info!(user_id = %user.id, role = %role, actor = %ctx.identity.email, "Role assigned");
        Ok(user)
    }

    /// Set a user's password: the user themself, or an owner/admin.
    pub async fn set_password(&self, user_id: &str, password: &str) -> AppResult<()> {
        let ctx = self.context().await?;
        ctx.require_authenticated()?;
        if ctx.identity.id != user_id && !ctx.is_privileged() {
            return Err(AppError::access_denied(
                "You can only change your own password",
            ));
        }
        self.validator.validate(password)?;

        let salt = PasswordHasher::generate_salt();
        let hash = self.hasher.hash_password(password, &salt);
        self.store
            .mutate(|doc| {
                let mut user: User = doc
                    .get_typed(EntityType::User, user_id)?
                    .ok_or_else(|| AppError::not_found("User not found"))?;
                user.password_salt = Some(salt);
                user.password_hash = Some(hash);
                doc.upsert(EntityType::User, &user)
            })
            .await?;

        info!(user_id = %user_id, actor = %ctx.identity.email, "Password set");
        Ok(())
    }
}
