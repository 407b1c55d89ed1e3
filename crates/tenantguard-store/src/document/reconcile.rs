//! Additive reconciliation of a persisted document against the seed.

use std::collections::{BTreeMap, HashSet};

use tenantguard_entity::organization::backfill_organization;
use tenantguard_entity::{EntityType, Record, str_field};

use super::model::StoreDocument;

/// Bring a same-version document up to date with the seed without
/// overwriting anything already present:
///
/// - collections missing from the document are copied from the seed;
/// - organizations get missing `features` / `security` keys from their
///   plan's defaults;
/// - append-only reference lists gain seed records whose id is absent.
///
/// Returns whether the document changed.
pub fn reconcile(doc: &mut StoreDocument, seed: &BTreeMap<String, Vec<Record>>) -> bool {
    let mut changed = false;

    for (name, records) in seed {
        if !doc.collections.contains_key(name) {
            doc.collections.insert(name.clone(), records.clone());
            changed = true;
        }
    }

    for org in doc.records_mut(EntityType::Organization) {
        changed |= backfill_organization(org);
    }

    for entity_type in EntityType::ALL {
        if !entity_type.is_append_only_reference() {
            continue;
        }
        let Some(seed_records) = seed.get(entity_type.as_str()) else {
            continue;
        };

        let existing: HashSet<String> = doc
            .records(entity_type)
            .iter()
            .filter_map(|r| str_field(r, "id").map(str::to_string))
            .collect();
        let missing: Vec<Record> = seed_records
            .iter()
            .filter(|r| str_field(r, "id").is_some_and(|id| !existing.contains(id)))
            .cloned()
            .collect();

        if !missing.is_empty() {
            doc.records_mut(entity_type).extend(missing);
            changed = true;
        }
    }

    changed
}
