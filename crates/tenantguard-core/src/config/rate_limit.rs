//! AI-query rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Fixed-window rate limiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: i64,
    /// Requests per window when the organization does not configure a quota.
    #[serde(default = "default_requests")]
    pub default_requests_per_min: u32,
    /// Lower bound applied to any organization-configured quota.
    #[serde(default = "default_min_requests")]
    pub min_requests_per_min: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window(),
            default_requests_per_min: default_requests(),
            min_requests_per_min: default_min_requests(),
        }
    }
}

fn default_window() -> i64 {
    60
}

fn default_requests() -> u32 {
    30
}

fn default_min_requests() -> u32 {
    5
}
