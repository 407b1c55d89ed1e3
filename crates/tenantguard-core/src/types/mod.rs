//! Core type definitions used across the TenantGuard workspace.

pub mod filter;
pub mod sorting;

pub use filter::Predicates;
pub use sorting::{SortDirection, SortField};

/// A stored entity: a JSON object keyed by field name.
///
/// Every record carries `id` and `created_date`; tenant-scoped records
/// also carry `orgId`.
pub type Record = serde_json::Map<String, serde_json::Value>;
