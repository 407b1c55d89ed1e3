//! Admin-access request entities.

pub mod model;

pub use model::{AdminRequest, AdminRequestStatus};
