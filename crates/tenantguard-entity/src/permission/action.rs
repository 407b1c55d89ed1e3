//! Actions checked against the per-entity permission table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four record-level operations every entity type exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// List, filter, or fetch records.
    Read,
    /// Insert a new record.
    Create,
    /// Merge fields into an existing record.
    Update,
    /// Remove a record.
    Delete,
}

impl Action {
    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
