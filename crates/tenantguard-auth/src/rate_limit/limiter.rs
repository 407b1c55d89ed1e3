//! Per-organization fixed-window counter.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use tenantguard_core::config::RateLimitConfig;
use tenantguard_core::traits::Clock;
use tenantguard_entity::{Identity, Organization};

/// Bucket used by callers without an organization.
pub const GLOBAL_BUCKET: &str = "global";

/// One counting window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

/// Counts AI requests in discrete, non-overlapping windows per organization.
///
/// State is process-scoped; a restart starts every bucket fresh.
#[derive(Debug)]
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    /// Window length.
    window: Duration,
    /// Limit when the organization does not configure one.
    default_limit: u32,
    /// Floor for organization-configured limits.
    min_limit: u32,
    /// Bucket key → current window.
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Creates a limiter from configuration.
    pub fn new(clock: Arc<dyn Clock>, config: &RateLimitConfig) -> Self {
        Self {
            clock,
            window: Duration::seconds(config.window_seconds.max(1)),
            default_limit: config.default_requests_per_min,
            min_limit: config.min_requests_per_min,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Permitted requests per window for an organization: its
    /// `aiRequestsPerMin` floored at the minimum, or the default.
    pub fn limit_for(&self, org: Option<&Organization>) -> u32 {
        org.and_then(|o| o.security.ai_requests_per_min)
            .unwrap_or(self.default_limit)
            .max(self.min_limit)
    }

    /// Bucket key for a caller.
    pub fn bucket_for(identity: &Identity) -> &str {
        identity.org_id.as_deref().unwrap_or(GLOBAL_BUCKET)
    }

    /// Admit or refuse one request from `identity`, whose organization is
    /// `org`.
    pub async fn allow(&self, identity: &Identity, org: Option<&Organization>) -> bool {
        let limit = self.limit_for(org);
        self.allow_in(Self::bucket_for(identity), limit).await
    }

    /// Admit or refuse one request in `bucket` with an explicit limit.
    ///
    /// An absent or elapsed window restarts at 1 (allowed); otherwise the
    /// request is allowed and counted while the count is below `limit`.
    pub async fn allow_in(&self, bucket: &str, limit: u32) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock().await;
        let window = windows.entry(bucket.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if window.count == 0 || now >= window.started_at + self.window {
            debug!(bucket, "Starting new rate-limit window");
            *window = Window {
                started_at: now,
                count: 1,
            };
            return true;
        }

        if window.count < limit {
            window.count += 1;
            return true;
        }

        warn!(bucket, limit, "AI request rate limit reached");
        false
    }

    /// Forget every window.
    pub async fn reset(&self) {
        self.windows.lock().await.clear();
    }
}
