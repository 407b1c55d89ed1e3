//! Consecutive-failure login lockout.

pub mod guard;

pub use guard::{LoginAttempts, LoginGuard};
