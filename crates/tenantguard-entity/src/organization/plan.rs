//! Billing plans and the defaults they imply.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use tenantguard_core::error::AppError;
use tenantguard_core::types::Record;

/// Every feature flag an organization carries.
pub const FEATURE_FLAGS: [&str; 8] = [
    "aiAssistant",
    "vulnerabilityScans",
    "riskRegister",
    "vendorManagement",
    "trainingCenter",
    "documentVault",
    "complianceReports",
    "apiAccess",
];

const TRIAL_FEATURES: [&str; 4] = [
    "aiAssistant",
    "vulnerabilityScans",
    "riskRegister",
    "trainingCenter",
];

/// Billing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Full feature set.
    Paid,
    /// Evaluation tier.
    #[default]
    Trial,
}

impl Plan {
    /// Return the plan as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Trial => "trial",
        }
    }

    /// Default feature flags for this plan.
    pub fn default_features(&self) -> Record {
        FEATURE_FLAGS
            .iter()
            .map(|flag| {
                let enabled = match self {
                    Self::Paid => true,
                    Self::Trial => TRIAL_FEATURES.contains(flag),
                };
                (flag.to_string(), Value::Bool(enabled))
            })
            .collect()
    }

    /// Default security policy for this plan.
    pub fn default_security(&self) -> Record {
        let ai_quota = match self {
            Self::Paid => 30,
            Self::Trial => 10,
        };
        let value = json!({
            "sessionTimeoutMins": 45,
            "aiRequestsPerMin": ai_quota,
            "enforceMfa": false,
            "allowGuestLinks": false,
            "showAiAssistant": true,
            "autoRefreshDashboards": true,
        });
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Plan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(Self::Paid),
            "trial" => Ok(Self::Trial),
            _ => Err(AppError::validation(format!(
                "Invalid plan: '{s}'. Expected one of: paid, trial"
            ))),
        }
    }
}

/// Fill any missing `features` / `security` keys of an organization record
/// from its plan's defaults. Existing values are never overwritten.
///
/// Returns whether the record changed.
pub fn backfill_organization(record: &mut Record) -> bool {
    let plan = record
        .get("plan")
        .and_then(Value::as_str)
        .and_then(|p| p.parse::<Plan>().ok())
        .unwrap_or_default();

    let mut changed = fill_missing(record, "features", plan.default_features());
    changed |= fill_missing(record, "security", plan.default_security());
    changed
}

fn fill_missing(record: &mut Record, key: &str, defaults: Record) -> bool {
    let slot = record
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Record::new()));
    if !slot.is_object() {
        *slot = Value::Object(Record::new());
    }
    let Value::Object(map) = slot else {
        return false;
    };

    let mut changed = false;
    for (name, value) in defaults {
        if !map.contains_key(&name) {
            map.insert(name, value);
            changed = true;
        }
    }
    changed
}
