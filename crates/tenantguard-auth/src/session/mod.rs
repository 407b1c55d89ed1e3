//! Live session lifecycle.

pub mod manager;
pub mod store;

pub use manager::{LiveSession, SessionManager};
pub use store::{record_session_ended, record_session_started};
