//! The resolved caller identity.

use serde::{Deserialize, Serialize};

use super::model::User;
use super::role::Role;

/// Who is performing an operation, as resolved from the live session.
///
/// When no valid session exists the caller is [`Identity::guest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// User id (`"guest"` for the guest identity).
    pub id: String,
    /// Login email (empty for the guest identity).
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Permission role.
    pub role: Role,
    /// Tenant, if any.
    pub org_id: Option<String>,
    /// Team, if any.
    pub group_id: Option<String>,
}

impl Identity {
    /// The fixed identity used when nobody is logged in.
    pub fn guest() -> Self {
        Self {
            id: "guest".to_string(),
            email: String::new(),
            full_name: "Guest".to_string(),
            role: Role::Guest,
            org_id: None,
            group_id: None,
        }
    }

    /// Whether this is an unauthenticated caller.
    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }

    /// Whether the role is `owner` or `admin`.
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }

    /// Whether the role is `owner`.
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            org_id: user.org_id.clone(),
            group_id: user.group_id.clone(),
        }
    }
}
