//! Unified application error types for TenantGuard.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The presentation layer is expected
//! to translate an error's [`ErrorKind`] into a user-visible message; the
//! core never retries.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The permission table or an ownership check rejected the action.
    AccessDenied,
    /// Unknown email, missing credentials, or a password mismatch.
    InvalidCredentials,
    /// Too many failed logins; the lockout window has not elapsed.
    LockedOut,
    /// A new password does not satisfy the password policy.
    WeakPassword,
    /// The requested record or invitation was not found.
    NotFound,
    /// An invitation token has already been redeemed (or is no longer pending).
    AlreadyUsed,
    /// An invitation token was redeemed after its TTL elapsed.
    Expired,
    /// A privilege escalation was attempted (e.g. a non-owner granting admin).
    PermissionDenied,
    /// The per-organization AI request quota is exhausted for this window.
    RateLimited,
    /// A conflicting state was detected (stale document revision, duplicate bootstrap).
    Conflict,
    /// Input validation failed.
    Validation,
    /// The key-value backend failed to read or write.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An external integration failed.
    ExternalService,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "ACCESS_DENIED"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::LockedOut => write!(f, "LOCKED_OUT"),
            Self::WeakPassword => write!(f, "WEAK_PASSWORD"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyUsed => write!(f, "ALREADY_USED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout TenantGuard.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create a locked-out error.
    pub fn locked_out(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LockedOut, message)
    }

    /// Create a weak-password error.
    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WeakPassword, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an already-used error.
    pub fn already_used(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyUsed, message)
    }

    /// Create an expired error.
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Expired, message)
    }

    /// Create a permission-denied (privilege escalation) error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
