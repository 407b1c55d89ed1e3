//! # tenantguard-entity
//!
//! Domain entity models for TenantGuard. Every entity is persisted as a
//! JSON object inside one collection of the store document; the structs
//! here are typed views over those objects for the collections the auth
//! layer reads and writes directly. Generic entity types (assets, risks,
//! scans, ...) stay as untyped [`Record`]s.

pub mod activity;
pub mod admin_request;
pub mod entity_type;
pub mod invitation;
pub mod notification;
pub mod organization;
pub mod permission;
pub mod record;
pub mod session;
pub mod user;

pub use activity::ActivityLog;
pub use admin_request::{AdminRequest, AdminRequestStatus};
pub use entity_type::EntityType;
pub use invitation::{Invitation, InvitationStatus};
pub use notification::Notification;
pub use organization::{Organization, Plan, SecurityPolicy, backfill_organization};
pub use permission::Action;
pub use record::{Record, from_record, new_id, str_field, to_record};
pub use session::{SessionRecord, SessionStatus};
pub use user::{Identity, Role, User};
