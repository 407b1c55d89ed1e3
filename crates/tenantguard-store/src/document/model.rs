//! In-memory shape of the persisted store document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_entity::{EntityType, Record, User, from_record, str_field, to_record};

use crate::keys::SCHEMA_VERSION;
use crate::seed::seed_collections;

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMeta {
    /// Schema version. A mismatch on load discards the document.
    pub version: u32,
    /// Incremented on every successful save.
    #[serde(default)]
    pub revision: u64,
    /// When the document was last (re)seeded.
    #[serde(default)]
    pub seeded_at: Option<DateTime<Utc>>,
}

/// Every entity collection plus the `meta` stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Version and revision stamp.
    pub meta: StoreMeta,
    /// Collection name → records.
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<Record>>,
}

impl StoreDocument {
    /// Build a fresh document from the built-in seed.
    pub fn seeded(now: DateTime<Utc>) -> AppResult<Self> {
        Ok(Self {
            meta: StoreMeta {
                version: SCHEMA_VERSION,
                revision: 0,
                seeded_at: Some(now),
            },
            collections: seed_collections()?,
        })
    }

    /// All records of a collection (empty if the collection is absent).
    pub fn records(&self, entity_type: EntityType) -> &[Record] {
        self.collections
            .get(entity_type.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable access to a collection, creating it if absent.
    pub fn records_mut(&mut self, entity_type: EntityType) -> &mut Vec<Record> {
        self.collections
            .entry(entity_type.as_str().to_string())
            .or_default()
    }

    /// Find a record by id.
    pub fn find(&self, entity_type: EntityType, id: &str) -> Option<&Record> {
        self.records(entity_type)
            .iter()
            .find(|r| str_field(r, "id") == Some(id))
    }

    /// Find a record by id, mutably.
    pub fn find_mut(&mut self, entity_type: EntityType, id: &str) -> Option<&mut Record> {
        self.records_mut(entity_type)
            .iter_mut()
            .find(|r| str_field(r, "id") == Some(id))
    }

    /// Append a record.
    pub fn insert(&mut self, entity_type: EntityType, record: Record) {
        self.records_mut(entity_type).push(record);
    }

    /// Remove a record by id, returning it.
    pub fn remove(&mut self, entity_type: EntityType, id: &str) -> Option<Record> {
        let records = self.records_mut(entity_type);
        let pos = records
            .iter()
            .position(|r| str_field(r, "id") == Some(id))?;
        Some(records.remove(pos))
    }

    /// Typed view of a collection.
    ///
    /// Records that do not fit `T` (for example a `User` created through the
    /// generic entity surface without an email) are skipped with a warning.
    pub fn typed<T: DeserializeOwned>(&self, entity_type: EntityType) -> Vec<T> {
        self.records(entity_type)
            .iter()
            .filter_map(|record| match from_record::<T>(record) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(
                        collection = %entity_type,
                        id = str_field(record, "id").unwrap_or("?"),
                        error = %e,
                        "Skipping malformed record"
                    );
                    None
                }
            })
            .collect()
    }

    /// Typed lookup by id.
    pub fn get_typed<T: DeserializeOwned>(
        &self,
        entity_type: EntityType,
        id: &str,
    ) -> AppResult<Option<T>> {
        self.find(entity_type, id).map(from_record).transpose()
    }

    /// Find a user by email, ignoring case and surrounding whitespace.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.typed::<User>(EntityType::User)
            .into_iter()
            .find(|u| u.email_matches(email))
    }

    /// Insert or replace a typed entity, matched by its `id` field.
    pub fn upsert<T: Serialize>(&mut self, entity_type: EntityType, entity: &T) -> AppResult<()> {
        let record = to_record(entity)?;
        let id = str_field(&record, "id")
            .ok_or_else(|| AppError::internal(format!("{entity_type} record has no id")))?
            .to_string();

        match self.find_mut(entity_type, &id) {
            Some(existing) => *existing = record,
            None => self.insert(entity_type, record),
        }
        Ok(())
    }
}
