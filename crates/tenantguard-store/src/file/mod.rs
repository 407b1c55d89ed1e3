//! Directory-backed key-value backend.

pub mod store;

pub use store::FileKvStore;
