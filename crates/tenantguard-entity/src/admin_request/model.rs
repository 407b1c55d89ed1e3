//! Admin-access request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision state of an [`AdminRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRequestStatus {
    /// Awaiting an owner's decision.
    #[default]
    Pending,
    /// Granted; the requester was promoted.
    Approved,
    /// Refused.
    Denied,
}

impl AdminRequestStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for AdminRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's request to be promoted to `admin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    /// Unique request identifier.
    pub id: String,
    /// Email of the account to promote.
    pub email: String,
    /// Free-text justification.
    #[serde(default)]
    pub reason: String,
    /// Id of the requesting user.
    pub requested_by: String,
    /// Tenant of the requester.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Decision state.
    pub status: AdminRequestStatus,
    /// Email of the owner who decided.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When the decision was made.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    /// When the record was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl AdminRequest {
    /// Whether the request is still awaiting a decision.
    pub fn is_pending(&self) -> bool {
        self.status == AdminRequestStatus::Pending
    }
}
