//! Invitation lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an invitation token.
///
/// The only transitions are `pending → used` and `pending → expired`.
/// `denied` is a recognised value for records written elsewhere but no
/// operation produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting redemption.
    #[default]
    Pending,
    /// Redeemed.
    Used,
    /// TTL elapsed before redemption.
    Expired,
    /// Rejected.
    Denied,
}

impl InvitationStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Used => "used",
            Self::Expired => "expired",
            Self::Denied => "denied",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Used) | (Self::Pending, Self::Expired)
        )
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
