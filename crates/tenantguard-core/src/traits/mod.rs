//! Core traits defined in `tenantguard-core` and implemented by other crates.

pub mod clock;
pub mod kv;
pub mod mail;

pub use clock::{Clock, ManualClock, SystemClock};
pub use kv::KeyValueStore;
pub use mail::{EmailSender, OutgoingEmail};
