//! Request context carrying the resolved caller and their organization.

use chrono::{DateTime, Utc};
use tracing::warn;

use tenantguard_auth::SessionManager;
use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::Clock;
use tenantguard_entity::{EntityType, Identity, Organization};
use tenantguard_store::DocumentStore;

/// Context for one façade call.
///
/// Resolved fresh from the live session at the start of every operation so
/// that a role change or logout takes effect on the very next call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Who is acting (the guest identity when nobody is logged in).
    pub identity: Identity,
    /// The caller's organization, when they have one and it still exists.
    pub org: Option<Organization>,
    /// When the call started.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Resolve the caller from the live session.
    pub async fn resolve(
        sessions: &SessionManager,
        store: &DocumentStore,
        clock: &dyn Clock,
    ) -> AppResult<Self> {
        let identity = sessions.current_identity().await?;
        let org = match identity.org_id.as_deref() {
            Some(org_id) => store
                .read(|doc| doc.get_typed::<Organization>(EntityType::Organization, org_id))
                .await?
                .unwrap_or_else(|e| {
                    warn!(org_id = %org_id, error = %e, "Organization record unreadable; ignoring");
                    None
                }),
            None => None,
        };

        Ok(Self {
            identity,
            org,
            request_time: clock.now(),
        })
    }

    /// The caller's organization id.
    pub fn org_id(&self) -> Option<&str> {
        self.identity.org_id.as_deref()
    }

    /// Returns whether the caller is an owner or admin.
    pub fn is_privileged(&self) -> bool {
        self.identity.is_privileged()
    }

    /// Returns whether the caller is an owner.
    pub fn is_owner(&self) -> bool {
        self.identity.is_owner()
    }

    /// Fail with `AccessDenied` for the guest identity.
    pub fn require_authenticated(&self) -> AppResult<()> {
        if self.identity.is_guest() {
            return Err(AppError::access_denied("Sign in to continue"));
        }
        Ok(())
    }
}
