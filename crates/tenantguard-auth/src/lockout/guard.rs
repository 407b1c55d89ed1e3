//! Global login-attempt counter with a temporary lockout.
//!
//! The counter is keyed globally, not per identity: five wrong passwords
//! for any mix of emails lock every login in this context.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tenantguard_core::config::AuthConfig;
use tenantguard_core::error::{AppError, ErrorKind};
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, KeyValueStore};
use tenantguard_store::json::{get_json, set_json};
use tenantguard_store::keys;

/// Persisted guard state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempts {
    /// Consecutive failures since the last success or elapsed lock.
    pub count: u32,
    /// Logins are refused until this instant.
    #[serde(default)]
    pub lock_until: Option<DateTime<Utc>>,
}

/// Tracks failed logins and enforces the lockout window.
#[derive(Debug)]
pub struct LoginGuard {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Failures that trigger a lock.
    max_failed: u32,
    /// Lock length.
    lockout: Duration,
}

impl LoginGuard {
    /// Creates a guard from auth configuration.
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: &AuthConfig) -> Self {
        Self {
            kv,
            clock,
            max_failed: config.max_failed_attempts.max(1),
            lockout: Duration::minutes(config.lockout_minutes),
        }
    }

    /// Current state. An unreadable record counts as a clean slate.
    pub async fn state(&self) -> AppResult<LoginAttempts> {
        match get_json::<LoginAttempts>(self.kv.as_ref(), &keys::login_attempts()).await {
            Ok(state) => Ok(state.unwrap_or_default()),
            Err(e) if e.is(ErrorKind::Serialization) => {
                warn!(error = %e, "Login-attempt record unreadable; resetting");
                Ok(LoginAttempts::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Refuse with `LockedOut` while a lock is in force.
    ///
    /// Does not count as an attempt. Once an elapsed lock is observed the
    /// counter starts fresh.
    pub async fn check(&self) -> AppResult<()> {
        let state = self.state().await?;
        let Some(lock_until) = state.lock_until else {
            return Ok(());
        };

        let now = self.clock.now();
        if lock_until > now {
            let remaining = (lock_until - now).num_seconds().max(1);
            let minutes = (remaining + 59) / 60;
            return Err(AppError::locked_out(format!(
                "Too many failed login attempts. Try again in {minutes} minute(s)"
            )));
        }

        debug!("Login lockout elapsed; resetting counter");
        self.reset().await
    }

    /// Record a failed login; locks once the threshold is reached.
    pub async fn record_failure(&self) -> AppResult<LoginAttempts> {
        let mut state = self.state().await?;
        state.count += 1;
        if state.count >= self.max_failed {
            let lock_until = self.clock.now() + self.lockout;
            state.lock_until = Some(lock_until);
            warn!(
                failures = state.count,
                lock_until = %lock_until,
                "Login locked after repeated failures"
            );
        }
        set_json(self.kv.as_ref(), &keys::login_attempts(), &state).await?;
        Ok(state)
    }

    /// Record a successful login.
    pub async fn record_success(&self) -> AppResult<()> {
        self.reset().await
    }

    /// Clear the counter and any lock.
    pub async fn reset(&self) -> AppResult<()> {
        set_json(
            self.kv.as_ref(),
            &keys::login_attempts(),
            &LoginAttempts::default(),
        )
        .await
    }
}
