//! Login, logout, first-run bootstrap, and demo reset.

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use tenantguard_auth::{
    LiveSession, LoginGuard, PasswordHasher, PasswordValidator, RateLimiter, SessionManager,
};
use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::Clock;
use tenantguard_entity::{
    ActivityLog, EntityType, Identity, Organization, Plan, Role, User, backfill_organization,
    new_id, to_record,
};
use tenantguard_store::DocumentStore;

use crate::context::RequestContext;

/// First-run setup: the organization and its owner account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRequest {
    /// Owner login email.
    pub email: String,
    /// Owner password.
    pub password: String,
    /// Organization display name.
    pub org_name: String,
    /// Billing plan.
    #[serde(default)]
    pub plan: Plan,
}

/// Authentication operations.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<SessionManager>,
    guard: Arc<LoginGuard>,
    limiter: Arc<RateLimiter>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        store: Arc<DocumentStore>,
        clock: Arc<dyn Clock>,
        sessions: Arc<SessionManager>,
        guard: Arc<LoginGuard>,
        limiter: Arc<RateLimiter>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            clock,
            sessions,
            guard,
            limiter,
            hasher: PasswordHasher::new(config),
            validator: PasswordValidator::new(config),
        }
    }

    /// The current caller; the guest identity without a live session.
    pub async fn me(&self) -> AppResult<Identity> {
        self.sessions.current_identity().await
    }

    /// Authenticate and start a session.
    ///
    /// While locked out this fails with `LockedOut` before the document
    /// store is consulted. Unknown emails, unactivated accounts, and wrong
    /// passwords all fail with the same `InvalidCredentials` error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Identity> {
        self.guard.check().await?;

        let user = self.store.read(|doc| doc.user_by_email(email)).await?;
        let verified = user.filter(|u| match (&u.password_salt, &u.password_hash) {
            (Some(salt), Some(hash)) => self.hasher.verify_password(password, salt, hash),
            _ => false,
        });

        let Some(user) = verified else {
            let attempts = self.guard.record_failure().await?;
            warn!(email = %email.trim(), failures = attempts.count, "Login failed");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        };

        self.guard.record_success().await?;

        let now = self.clock.now();
        let user = self
            .store
            .mutate(|doc| {
                let mut user: User = doc
                    .get_typed(EntityType::User, &user.id)?
                    .ok_or_else(|| AppError::not_found("User not found"))?;
                user.last_login_at = Some(now);
                user.login_count += 1;
                doc.upsert(EntityType::User, &user)?;
                Ok(user)
            })
            .await?;

        self.sessions.start(&user).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "Login succeeded");
        Ok(Identity::from(&user))
    }

    /// End the live session. No-op when nobody is logged in.
    pub async fn logout(&self) -> AppResult<()> {
        self.sessions.end().await
    }

    /// Create the first organization and its owner, then log the owner in.
    ///
    /// Fails with `Conflict` once any owner or admin has credentials.
    pub async fn bootstrap_admin(&self, request: BootstrapRequest) -> AppResult<Identity> {
        let email = request.email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: '{email}'")));
        }
        let org_name = request.org_name.trim();
        if org_name.is_empty() {
            return Err(AppError::validation("Organization name cannot be empty"));
        }
        self.validator.validate(&request.password)?;

        let salt = PasswordHasher::generate_salt();
        let hash = self.hasher.hash_password(&request.password, &salt);
        let now = self.clock.now();

        let owner = self
            .store
            .mutate(|doc| {
                let taken = doc
                    .typed::<User>(EntityType::User)
                    .iter()
                    .any(|u| u.role.is_privileged() && u.has_credentials());
                if taken {
                    return Err(AppError::conflict(
                        "An owner or admin account already exists",
                    ));
                }

                let org = Organization {
                    id: new_id(),
                    name: org_name.to_string(),
                    slug: slugify(org_name),
                    industry: None,
                    size: None,
                    plan: request.plan,
                    owner_email: email.clone(),
                    features: Default::default(),
                    security: Default::default(),
                    created_date: now,
                };
                let mut record = to_record(&org)?;
                backfill_organization(&mut record);
                doc.insert(EntityType::Organization, record);

                let mut owner = doc.user_by_email(&email).unwrap_or_else(|| User {
                    id: new_id(),
                    full_name: email.split('@').next().unwrap_or(&email).to_string(),
                    email: email.clone(),
                    role: Role::Owner,
                    org_id: None,
                    group_id: None,
                    password_hash: None,
                    password_salt: None,
                    last_login_at: None,
                    login_count: 0,
                    created_date: now,
                    extra: Default::default(),
                });
                owner.role = Role::Owner;
                owner.org_id = Some(org.id.clone());
                owner.password_salt = Some(salt);
                owner.password_hash = Some(hash);
                doc.upsert(EntityType::User, &owner)?;

                doc.upsert(
                    EntityType::ActivityLog,
                    &ActivityLog::new(
                        Some(org.id.clone()),
                        &owner.email,
                        "org.bootstrapped",
                        EntityType::Organization.as_str(),
                        Some(org.id.clone()),
                        format!("Created {} on the {} plan", org.name, org.plan),
                        now,
                    ),
                )?;
                Ok(owner)
            })
            .await?;

        self.guard.reset().await?;
        self.sessions.start(&owner).await?;
        info!(user_id = %owner.id, org_id = ?owner.org_id, "Bootstrap completed");
        Ok(Identity::from(&owner))
    }

    /// The caller's organization, if any.
    pub async fn current_org(&self) -> AppResult<Option<Organization>> {
        Ok(RequestContext::resolve(&self.sessions, &self.store, self.clock.as_ref())
            .await?
            .org)
    }

    /// Fail with `AccessDenied` unless `identity` holds one of `roles`.
    pub fn require_role(identity: &Identity, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&identity.role) {
            Ok(())
        } else {
            Err(AppError::access_denied(format!(
                "Role '{}' is not permitted here",
                identity.role
            )))
        }
    }

    /// Extend the live session. Returns `None` without one.
    pub async fn touch_session(&self) -> AppResult<Option<LiveSession>> {
        self.sessions.touch().await
    }

    /// Reseed the store and clear the session, lockout, and rate windows.
    pub async fn reset_demo(&self) -> AppResult<()> {
        self.store.reset().await?;
        self.sessions.set_session(None).await?;
        self.guard.reset().await?;
        self.limiter.reset().await;
        warn!("Demo data reset");
        Ok(())
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
