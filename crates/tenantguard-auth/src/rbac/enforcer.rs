//! Access decisions for entity operations.

use tracing::debug;

use tenantguard_core::error::AppError;
use tenantguard_entity::{Action, EntityType, Identity, Record, str_field};

use super::policies::policy_for;

/// Evaluates the permission table, ownership, and organization scope.
///
/// Stateless: every call is given the caller's freshly resolved identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl;

impl AccessControl {
    /// Creates an access controller.
    pub fn new() -> Self {
        Self
    }

    /// Whether `identity` may perform `action` on `entity_type`, optionally
    /// against a concrete `record`.
    ///
    /// The role must be in the action's role set. For a non-privileged role
    /// and a given record, the record must also sit in the caller's
    /// organization (or none), and when the type declares an owner field the
    /// record's value must equal the caller's email.
    pub fn can_perform(
        &self,
        identity: &Identity,
        entity_type: EntityType,
        action: Action,
        record: Option<&Record>,
    ) -> bool {
        let policy = policy_for(entity_type);
        if !policy.allows(identity.role, action) {
            return false;
        }
        if identity.is_privileged() {
            return true;
        }

        let Some(record) = record else {
            return true;
        };

        if !in_caller_org(identity, entity_type, record) {
            return false;
        }
        match policy.owner_field {
            Some(field) => owned_by(identity, record, field),
            None => true,
        }
    }

    /// [`can_perform`](Self::can_perform) as a `Result`, failing with
    /// `AccessDenied`.
    pub fn require(
        &self,
        identity: &Identity,
        entity_type: EntityType,
        action: Action,
        record: Option<&Record>,
    ) -> Result<(), AppError> {
        if self.can_perform(identity, entity_type, action, record) {
            Ok(())
        } else {
            debug!(
                role = %identity.role,
                entity = %entity_type,
                action = %action,
                "Access denied"
            );
            Err(AppError::access_denied(format!(
                "Role '{}' may not {action} {entity_type}",
                identity.role
            )))
        }
    }

    /// Restrict a listing to what `identity` may see.
    ///
    /// Guests see nothing; privileged roles see every organization; other
    /// roles see records with no organization or their own, further narrowed
    /// to records they own when the type declares an owner field.
    pub fn scope_to_org(
        &self,
        identity: &Identity,
        entity_type: EntityType,
        records: Vec<Record>,
    ) -> Vec<Record> {
        if identity.is_guest() {
            return Vec::new();
        }
        if identity.is_privileged() {
            return records;
        }

        let owner_field = policy_for(entity_type).owner_field;
        records
            .into_iter()
            .filter(|r| in_caller_org(identity, entity_type, r))
            .filter(|r| owner_field.is_none_or(|field| owned_by(identity, r, field)))
            .collect()
    }
}

fn in_caller_org(identity: &Identity, entity_type: EntityType, record: &Record) -> bool {
    match str_field(record, entity_type.scope_field()) {
        None => true,
        Some(org_id) => identity.org_id.as_deref() == Some(org_id),
    }
}

fn owned_by(identity: &Identity, record: &Record, field: &str) -> bool {
    str_field(record, field).is_some_and(|owner| owner.eq_ignore_ascii_case(&identity.email))
}
