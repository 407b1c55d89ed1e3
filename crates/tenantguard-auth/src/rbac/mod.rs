//! Role-based access control over entity collections.

pub mod enforcer;
pub mod policies;

pub use enforcer::AccessControl;
pub use policies::{EntityPolicy, policy_for};
