//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::record::Record;

/// An account in the `User` collection.
///
/// A user without `password_hash` has been invited (or seeded) but has
/// not activated credentials yet, and cannot log in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Login email, unique within the store.
    pub email: String,
    /// Permission role.
    pub role: Role,
    /// Tenant this user belongs to.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Team inside the tenant.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Hex PBKDF2 hash of the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Hex salt used for `password_hash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_salt: Option<String>,
    /// Last successful login time.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Number of successful logins.
    #[serde(default)]
    pub login_count: u64,
    /// When the record was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
    /// Fields set through the entity surface that have no typed slot.
    #[serde(flatten)]
    pub extra: Record,
}

impl User {
    /// Whether this account has activated credentials.
    pub fn has_credentials(&self) -> bool {
        self.password_hash.is_some() && self.password_salt.is_some()
    }

    /// Case-insensitive email comparison.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}
