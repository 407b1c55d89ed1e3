//! # tenantguard-auth
//!
//! Authentication and authorization for TenantGuard.
//!
//! ## Modules
//!
//! - `password`: PBKDF2-HMAC-SHA256 hashing and password policy
//! - `jwt`: signing and verifying the live session token
//! - `session`: live session lifecycle and the `Session` activity rows
//! - `lockout`: global consecutive-failure login guard
//! - `rbac`: per-entity permission table and organization scoping
//! - `invitation`: single-use, time-boxed invitation tokens
//! - `rate_limit`: fixed-window per-organization AI request limiter

pub mod invitation;
pub mod jwt;
pub mod lockout;
pub mod password;
pub mod rate_limit;
pub mod rbac;
pub mod session;

pub use invitation::{InvitationService, InviteLookup, InviteOutcome, InviteState, NewInvite};
pub use jwt::{JwtDecoder, JwtEncoder, SessionClaims};
pub use lockout::{LoginAttempts, LoginGuard};
pub use password::{PasswordHasher, PasswordValidator};
pub use rate_limit::RateLimiter;
pub use rbac::{AccessControl, EntityPolicy};
pub use session::{LiveSession, SessionManager};
