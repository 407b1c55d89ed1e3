//! Organization entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::Plan;

/// A tenant: the scoping unit for data visibility and policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Unique organization identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-safe short name.
    #[serde(default)]
    pub slug: String,
    /// Industry vertical.
    #[serde(default)]
    pub industry: Option<String>,
    /// Headcount bucket.
    #[serde(default)]
    pub size: Option<String>,
    /// Billing plan.
    #[serde(default)]
    pub plan: Plan,
    /// Email of the owning account.
    #[serde(default)]
    pub owner_email: String,
    /// Feature-flag name → enabled.
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    /// Security policy.
    #[serde(default)]
    pub security: SecurityPolicy,
    /// When the record was created.
    #[serde(rename = "created_date")]
    pub created_date: DateTime<Utc>,
}

impl Organization {
    /// Whether a feature flag is enabled (absent flags are off).
    pub fn feature_enabled(&self, flag: &str) -> bool {
        self.features.get(flag).copied().unwrap_or(false)
    }
}

/// Per-organization security policy.
///
/// Fields are optional at the type level because records written by older
/// builds may lack them; reconciliation backfills every key on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    /// Sliding session lifetime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout_mins: Option<i64>,
    /// AI-query quota per 60-second window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_requests_per_min: Option<u32>,
    /// Require a second factor in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_mfa: Option<bool>,
    /// Allow read-only guest links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_guest_links: Option<bool>,
    /// Show the AI assistant panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_ai_assistant: Option<bool>,
    /// Poll dashboards for fresh data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_refresh_dashboards: Option<bool>,
}
