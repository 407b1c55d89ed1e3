//! Recipient resolution: decides who hears about which event.

use tenantguard_entity::{EntityType, Organization, Role, User};
use tenantguard_store::StoreDocument;

/// Resolves notification recipients from the store document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationRules;

impl NotificationRules {
    /// The account that approves admin requests for `org_id`.
    ///
    /// Prefers the organization's `ownerEmail`; falls back to the first
    /// user holding the `owner` role in that organization.
    pub fn org_owner(doc: &StoreDocument, org_id: Option<&str>) -> Option<String> {
        let org_id = org_id?;
        let declared = doc
            .get_typed::<Organization>(EntityType::Organization, org_id)
            .ok()
            .flatten()
            .map(|org| org.owner_email)
            .filter(|email| !email.trim().is_empty());
        if declared.is_some() {
            return declared;
        }

        doc.typed::<User>(EntityType::User)
            .into_iter()
            .find(|u| u.role == Role::Owner && u.org_id.as_deref() == Some(org_id))
            .map(|u| u.email)
    }

    /// The stored account for `email`, if any.
    pub fn known_recipient(doc: &StoreDocument, email: &str) -> Option<User> {
        doc.user_by_email(email)
    }
}
