//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file overlaid with `TENANTGUARD__`-prefixed environment
//! variables. Every field has a serde default, so an empty source yields a
//! usable configuration.

pub mod auth;
pub mod integrations;
pub mod logging;
pub mod rate_limit;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::integrations::IntegrationsConfig;
pub use self::logging::LoggingConfig;
pub use self::rate_limit::RateLimitConfig;
pub use self::store::{StoreBackend, StoreConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Authentication, session, lockout, and invitation settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// AI-query rate limiting settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// External integration endpoints.
    #[serde(default)]
    pub integrations: IntegrationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Environment variables use the `TENANTGUARD` prefix and `__` as the
    /// section separator, e.g. `TENANTGUARD__STORE__BACKEND=memory`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TENANTGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
