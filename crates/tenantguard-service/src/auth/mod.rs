//! Auth surface: login, logout, bootstrap, and session upkeep.

pub mod service;

pub use service::{AuthService, BootstrapRequest};
