//! Equality predicates for `filter` calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;

/// A set of field → expected value pairs; a record matches when every
/// field is present and equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Predicates(pub Record);

impl Predicates {
    /// Create an empty predicate set (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns whether `record` satisfies every condition.
    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

impl From<Record> for Predicates {
    fn from(map: Record) -> Self {
        Self(map)
    }
}
