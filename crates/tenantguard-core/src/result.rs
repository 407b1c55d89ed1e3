//! Convenience result type alias for TenantGuard.

use crate::error::AppError;

/// A specialized `Result` type for TenantGuard operations.
pub type AppResult<T> = Result<T, AppError>;
