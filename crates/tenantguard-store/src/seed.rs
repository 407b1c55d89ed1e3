//! The built-in seed document.

use std::collections::BTreeMap;

use tenantguard_core::error::{AppError, ErrorKind};
use tenantguard_core::result::AppResult;
use tenantguard_entity::{EntityType, Record};

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Parse the built-in seed collections.
///
/// Every [`EntityType`] is present in the result, empty if the seed file
/// carries no records for it.
pub fn seed_collections() -> AppResult<BTreeMap<String, Vec<Record>>> {
    let mut collections: BTreeMap<String, Vec<Record>> = serde_json::from_str(SEED_JSON)
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Built-in seed document is malformed", e)
        })?;

    for entity_type in EntityType::ALL {
        collections
            .entry(entity_type.as_str().to_string())
            .or_default();
    }
    Ok(collections)
}
