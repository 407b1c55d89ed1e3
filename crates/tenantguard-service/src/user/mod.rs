//! Users surface: invitations, roles, passwords, and admin requests.

pub mod admin;
pub mod service;

pub use admin::AdminRequestService;
pub use service::UserService;
