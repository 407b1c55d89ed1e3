//! # tenantguard-store
//!
//! Persistence for TenantGuard. Two layers:
//!
//! - **Key-value backends** implementing
//!   [`KeyValueStore`](tenantguard_core::traits::KeyValueStore): an
//!   in-process [`DashMap`](https://crates.io/crates/dashmap) map and a
//!   directory with one file per key.
//! - **[`DocumentStore`]**: one JSON document holding every entity
//!   collection, seeded from a built-in document, reconciled on load and
//!   guarded by an optimistic revision check on save.
//!
//! The backend is selected at runtime based on configuration.

pub mod document;
pub mod file;
pub mod json;
pub mod keys;
pub mod memory;
pub mod provider;
pub mod seed;

pub use document::{DocumentStore, StoreDocument, StoreMeta};
pub use file::FileKvStore;
pub use memory::MemoryKvStore;
pub use provider::KvStoreManager;
