//! Session entity model.
//!
//! These rows back "who is active" views. They are bookkeeping only; the
//! live session that authenticates a caller is a signed token held by the
//! auth layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a session row is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The user is logged in.
    Active,
    /// The user logged out.
    Ended,
}

/// One row per user in the `Session` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique row identifier.
    pub id: String,
    /// The user this row describes.
    pub user_id: String,
    /// The user's email.
    pub user_email: String,
    /// The user's tenant.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Row status.
    pub status: SessionStatus,
    /// When the current session began.
    pub started_at: DateTime<Utc>,
    /// Last activity.
    pub last_seen_at: DateTime<Utc>,
    /// When the live session lapses without further activity.
    pub expires_at: DateTime<Utc>,
    /// When the user logged out.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// When the row was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl SessionRecord {
    /// Mark the row active again for a new or extended session.
    pub fn refresh(&mut self, now: DateTime<Utc>, expires_at: DateTime<Utc>, new_session: bool) {
        if new_session || self.status == SessionStatus::Ended {
            self.started_at = now;
        }
        self.status = SessionStatus::Active;
        self.last_seen_at = now;
        self.expires_at = expires_at;
        self.ended_at = None;
    }

    /// Mark the row ended.
    pub fn end(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Ended;
        self.last_seen_at = now;
        self.ended_at = Some(now);
    }
}
