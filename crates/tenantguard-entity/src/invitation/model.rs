//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::InvitationStatus;
use crate::user::Role;

/// A single-use, time-limited token letting an invited user set a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Unique invitation identifier.
    pub id: String,
    /// Invitee email.
    pub email: String,
    /// Role granted on acceptance.
    pub role: Role,
    /// Tenant the invitee joins.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Team the invitee joins.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Redemption token.
    pub token: String,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// Redemption deadline.
    pub expires_at: DateTime<Utc>,
    /// When the token was redeemed.
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    /// Email of the inviting user.
    #[serde(default)]
    pub invited_by: String,
    /// When the record was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl Invitation {
    /// Whether the deadline has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the invitation can still be redeemed at `now`.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired_at(now)
    }
}
