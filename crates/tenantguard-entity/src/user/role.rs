//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the permission system.
///
/// `Owner` and `Admin` are the privileged roles: they bypass per-record
/// ownership checks and organization scoping on reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Anchors an organization's administrative approvals.
    Owner,
    /// Manages users and data across organizations.
    Admin,
    /// Regular member of an organization.
    User,
    /// Unauthenticated caller.
    Guest,
}

impl Role {
    /// Check if this role is privileged (`owner` or `admin`).
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = tenantguard_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            _ => Err(tenantguard_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: owner, admin, user, guest"
            ))),
        }
    }
}
