//! The static per-entity permission table.

use tenantguard_entity::{Action, EntityType, Role};

const OWNER: &[Role] = &[Role::Owner];
const PRIVILEGED: &[Role] = &[Role::Owner, Role::Admin];
const MEMBERS: &[Role] = &[Role::Owner, Role::Admin, Role::User];
const NOBODY: &[Role] = &[];

/// Which roles may perform each action on one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPolicy {
    /// Roles allowed to list and filter.
    pub read: &'static [Role],
    /// Roles allowed to create.
    pub create: &'static [Role],
    /// Roles allowed to update.
    pub update: &'static [Role],
    /// Roles allowed to delete.
    pub delete: &'static [Role],
    /// Field that must equal a non-privileged caller's email.
    pub owner_field: Option<&'static str>,
}

impl EntityPolicy {
    const fn new(
        read: &'static [Role],
        create: &'static [Role],
        update: &'static [Role],
        delete: &'static [Role],
    ) -> Self {
        Self {
            read,
            create,
            update,
            delete,
            owner_field: None,
        }
    }

    const fn owned_by(mut self, field: &'static str) -> Self {
        self.owner_field = Some(field);
        self
    }

    /// Roles allowed to perform `action`.
    pub fn roles_for(&self, action: Action) -> &'static [Role] {
        match action {
            Action::Read => self.read,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Whether `role` may perform `action` at the type level.
    pub fn allows(&self, role: Role, action: Action) -> bool {
        self.roles_for(action).contains(&role)
    }
}

/// Permission table entry for an entity type.
///
/// Guests appear in no role set, so they can do nothing through the
/// entity surface.
pub fn policy_for(entity_type: EntityType) -> EntityPolicy {
    use EntityType::*;

    match entity_type {
        Organization => EntityPolicy::new(MEMBERS, OWNER, PRIVILEGED, OWNER),
        Group => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, PRIVILEGED),
        User => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, OWNER),
        Session => EntityPolicy::new(PRIVILEGED, NOBODY, NOBODY, PRIVILEGED),
        Invitation => EntityPolicy::new(PRIVILEGED, PRIVILEGED, PRIVILEGED, PRIVILEGED),
        AdminRequest => EntityPolicy::new(MEMBERS, MEMBERS, OWNER, OWNER).owned_by("email"),
        ScanHistory => EntityPolicy::new(MEMBERS, MEMBERS, PRIVILEGED, PRIVILEGED),
        ScheduledScan => EntityPolicy::new(MEMBERS, MEMBERS, MEMBERS, MEMBERS).owned_by("userEmail"),
        Notification => {
            EntityPolicy::new(MEMBERS, PRIVILEGED, MEMBERS, MEMBERS).owned_by("userEmail")
        }
        ActivityLog => EntityPolicy::new(PRIVILEGED, PRIVILEGED, NOBODY, OWNER),
        Asset => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, PRIVILEGED),
        Risk => EntityPolicy::new(MEMBERS, MEMBERS, MEMBERS, PRIVILEGED),
        Vendor => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, PRIVILEGED),
        Incident => EntityPolicy::new(MEMBERS, MEMBERS, MEMBERS, PRIVILEGED),
        Policy => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, PRIVILEGED),
        TrainingTemplate => EntityPolicy::new(MEMBERS, PRIVILEGED, PRIVILEGED, OWNER),
        TrainingAssignment => {
            EntityPolicy::new(MEMBERS, PRIVILEGED, MEMBERS, PRIVILEGED).owned_by("userEmail")
        }
        Document => EntityPolicy::new(MEMBERS, MEMBERS, PRIVILEGED, PRIVILEGED),
    }
}
