//! Session entities.

pub mod model;

pub use model::{SessionRecord, SessionStatus};
