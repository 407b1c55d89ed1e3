//! Conversions between typed entities and stored records.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use tenantguard_core::error::AppError;

pub use tenantguard_core::types::Record;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Serialize a typed entity into a stored record.
pub fn to_record<T: Serialize>(entity: &T) -> Result<Record, AppError> {
    match serde_json::to_value(entity)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::internal(format!(
            "Entity serialized to a non-object value: {other}"
        ))),
    }
}

/// Deserialize a stored record into a typed entity.
pub fn from_record<T: DeserializeOwned>(record: &Record) -> Result<T, AppError> {
    Ok(serde_json::from_value(serde_json::Value::Object(
        record.clone(),
    ))?)
}

/// Read a string field from a record.
pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}
