//! External integration configuration.

use serde::{Deserialize, Serialize};

/// Endpoints for the network-backed integrations.
///
/// When an endpoint is unset the corresponding call degrades to an empty
/// result instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    /// Base URL of the file-upload / audit-log / document-vault API.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Endpoint accepting AI-query requests.
    #[serde(default)]
    pub llm_endpoint: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            llm_endpoint: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
