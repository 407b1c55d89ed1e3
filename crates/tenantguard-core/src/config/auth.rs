//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential, session, lockout, and invitation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign the live session token (HMAC-SHA256).
    #[serde(default = "default_session_secret")]
    pub session_secret: String,
    /// PBKDF2 iteration count for password hashing.
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Consecutive failed logins before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_minutes: i64,
    /// Invitation token lifetime in minutes.
    #[serde(default = "default_invite_ttl")]
    pub invite_ttl_minutes: i64,
    /// Session TTL used when the organization does not configure one.
    #[serde(default = "default_session_timeout")]
    pub default_session_timeout_mins: i64,
    /// Lower bound applied to any organization-configured session TTL.
    #[serde(default = "default_min_session_timeout")]
    pub min_session_timeout_mins: i64,
    /// Base URL used to build invitation redemption links.
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: default_session_secret(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            password_min_length: default_password_min(),
            max_failed_attempts: default_max_failed(),
            lockout_minutes: default_lockout(),
            invite_ttl_minutes: default_invite_ttl(),
            default_session_timeout_mins: default_session_timeout(),
            min_session_timeout_mins: default_min_session_timeout(),
            app_base_url: default_app_base_url(),
        }
    }
}

fn default_session_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    100_000
}

fn default_password_min() -> usize {
    10
}

fn default_max_failed() -> u32 {
    5
}

fn default_lockout() -> i64 {
    10
}

fn default_invite_ttl() -> i64 {
    10
}

fn default_session_timeout() -> i64 {
    45
}

fn default_min_session_timeout() -> i64 {
    5
}

fn default_app_base_url() -> String {
    "http://localhost:5173".to_string()
}
