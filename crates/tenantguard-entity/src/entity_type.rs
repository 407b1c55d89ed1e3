//! The closed set of entity collections held by the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tenantguard_core::error::AppError;

/// Every named collection in the store document.
///
/// The string form (see [`EntityType::as_str`]) is the collection key in
/// the persisted JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// Tenants.
    Organization,
    /// Teams inside an organization.
    Group,
    /// Accounts.
    User,
    /// One "who is active" row per user.
    Session,
    /// Pending and redeemed invitation tokens.
    Invitation,
    /// Requests to be promoted to admin.
    AdminRequest,
    /// Completed vulnerability scans.
    ScanHistory,
    /// Recurring scans owned by a user.
    ScheduledScan,
    /// In-app notifications.
    Notification,
    /// Audit trail of notable flows.
    ActivityLog,
    /// Inventory items.
    Asset,
    /// Risk register entries.
    Risk,
    /// Third-party vendors.
    Vendor,
    /// Security incidents.
    Incident,
    /// Written policies.
    Policy,
    /// Built-in training catalogue (append-only reference list).
    TrainingTemplate,
    /// Training assigned to a user.
    TrainingAssignment,
    /// Document-vault metadata.
    Document,
}

impl EntityType {
    /// All entity types, in document order.
    pub const ALL: [EntityType; 18] = [
        Self::Organization,
        Self::Group,
        Self::User,
        Self::Session,
        Self::Invitation,
        Self::AdminRequest,
        Self::ScanHistory,
        Self::ScheduledScan,
        Self::Notification,
        Self::ActivityLog,
        Self::Asset,
        Self::Risk,
        Self::Vendor,
        Self::Incident,
        Self::Policy,
        Self::TrainingTemplate,
        Self::TrainingAssignment,
        Self::Document,
    ];

    /// The collection key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Group => "Group",
            Self::User => "User",
            Self::Session => "Session",
            Self::Invitation => "Invitation",
            Self::AdminRequest => "AdminRequest",
            Self::ScanHistory => "ScanHistory",
            Self::ScheduledScan => "ScheduledScan",
            Self::Notification => "Notification",
            Self::ActivityLog => "ActivityLog",
            Self::Asset => "Asset",
            Self::Risk => "Risk",
            Self::Vendor => "Vendor",
            Self::Incident => "Incident",
            Self::Policy => "Policy",
            Self::TrainingTemplate => "TrainingTemplate",
            Self::TrainingAssignment => "TrainingAssignment",
            Self::Document => "Document",
        }
    }

    /// The field compared against the caller's organization when scoping reads.
    ///
    /// An organization is its own tenant, so it is scoped by `id`.
    pub fn scope_field(&self) -> &'static str {
        match self {
            Self::Organization => "id",
            _ => "orgId",
        }
    }

    /// Whether seed records of this type are appended on reconciliation
    /// when their id is missing from the persisted document.
    pub fn is_append_only_reference(&self) -> bool {
        matches!(self, Self::TrainingTemplate)
    }

    /// Whether new records get an `orgId` stamped on create.
    pub fn is_org_scoped(&self) -> bool {
        !matches!(self, Self::Organization | Self::TrainingTemplate)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::validation(format!("Unknown entity type: '{s}'")))
    }
}
