//! Fixed-window rate limiting for the AI-query integration.

pub mod limiter;

pub use limiter::RateLimiter;
