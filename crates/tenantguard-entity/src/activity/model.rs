//! Activity log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::new_id;

/// An audit trail entry for a notable flow (invites, role changes, admin
/// requests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: String,
    /// Tenant the action happened in.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Email of whoever performed the action.
    pub actor_email: String,
    /// Short action name, e.g. `invite.created`.
    pub action: String,
    /// Entity type of the target.
    pub target_type: String,
    /// Target record id.
    #[serde(default)]
    pub target_id: Option<String>,
    /// Human-readable details.
    #[serde(default)]
    pub details: String,
    /// When the entry was written.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl ActivityLog {
    /// Build a new entry with a fresh id.
    pub fn new(
        org_id: Option<String>,
        actor_email: impl Into<String>,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: Option<String>,
        details: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            org_id,
            actor_email: actor_email.into(),
            action: action.into(),
            target_type: target_type.into(),
            target_id,
            details: details.into(),
            created_date: now,
        }
    }
}
