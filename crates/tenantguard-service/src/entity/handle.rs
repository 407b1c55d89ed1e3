//! Per-type view over the entity service.

use tenantguard_core::result::AppResult;
use tenantguard_core::types::{Predicates, SortField};
use tenantguard_entity::{EntityType, Record};

use super::service::EntityService;

/// Operations on one entity collection, as returned by
/// `Backend::entities`.
#[derive(Debug, Clone, Copy)]
pub struct EntityHandle<'a> {
    service: &'a EntityService,
    entity_type: EntityType,
}

impl<'a> EntityHandle<'a> {
    pub(crate) fn new(service: &'a EntityService, entity_type: EntityType) -> Self {
        Self {
            service,
            entity_type,
        }
    }

    /// The collection this handle operates on.
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Every visible record, optionally sorted and truncated.
    pub async fn list(&self, sort: Option<&SortField>, limit: Option<usize>) -> AppResult<Vec<Record>> {
        self.service.query(self.entity_type, None, sort, limit).await
    }

    /// Visible records whose fields equal every predicate.
    pub async fn filter(
        &self,
        predicates: &Predicates,
        sort: Option<&SortField>,
        limit: Option<usize>,
    ) -> AppResult<Vec<Record>> {
        self.service
            .query(self.entity_type, Some(predicates), sort, limit)
            .await
    }

    /// Insert a new record.
    pub async fn create(&self, fields: Record) -> AppResult<Record> {
        self.service.create(self.entity_type, fields).await
    }

    /// Merge fields into an existing record.
    pub async fn update(&self, id: &str, partial: Record) -> AppResult<Record> {
        self.service.update(self.entity_type, id, partial).await
    }

    /// Remove a record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.service.delete(self.entity_type, id).await
    }
}
