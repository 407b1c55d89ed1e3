//! # tenantguard-core
//!
//! Core crate for TenantGuard. Contains the unified error system,
//! configuration schemas, the persistence and clock traits every other
//! crate is written against, and the record query types (sorting and
//! equality filters) shared by the store and the entity API.
//!
//! This crate has **no** internal dependencies on other TenantGuard crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
