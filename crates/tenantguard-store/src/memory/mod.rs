//! In-process key-value backend.

pub mod store;

pub use store::MemoryKvStore;
