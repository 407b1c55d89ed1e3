//! Persisted, versioned document store with optimistic concurrency.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tenantguard_core::error::AppError;
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::{Clock, KeyValueStore};

use super::model::{StoreDocument, StoreMeta};
use super::reconcile::reconcile;
use crate::json::set_json;
use crate::keys::{self, SCHEMA_VERSION};
use crate::seed::seed_collections;

/// Only the `meta` block of a persisted document.
#[derive(Debug, Deserialize)]
struct PersistedMeta {
    meta: StoreMeta,
}

/// Owns the in-process copy of the store document and writes it through
/// to a [`KeyValueStore`].
///
/// Mutations run against a clone of the cached document and only replace
/// the cache once persisted, so a failed closure or a failed write leaves
/// both the cache and the backend untouched.
#[derive(Debug)]
pub struct DocumentStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<StoreDocument>>,
}

impl DocumentStore {
    /// Create a store over a backend. Nothing is read until first access.
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// The backend this store persists to.
    pub fn kv(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// Return the current document, loading (and seeding or reconciling)
    /// it on first access.
    pub async fn load(&self) -> AppResult<StoreDocument> {
        let mut cached = self.cached.lock().await;
        Ok(self.ensure_loaded(&mut cached).await?.clone())
    }

    /// Persist a whole document.
    ///
    /// `doc.meta.revision` must equal the persisted revision, i.e. `doc`
    /// must descend from the latest saved document; otherwise the save is
    /// rejected with `Conflict` and the cached copy is dropped.
    pub async fn save(&self, mut doc: StoreDocument) -> AppResult<()> {
        let mut cached = self.cached.lock().await;
        match self.persist_checked(&mut doc).await {
            Ok(()) => {
                *cached = Some(doc);
                Ok(())
            }
            Err(e) => {
                *cached = None;
                Err(e)
            }
        }
    }

    /// Discard the persisted document and replace it with the seed.
    pub async fn reset(&self) -> AppResult<StoreDocument> {
        let mut cached = self.cached.lock().await;
        let previous = self.persisted_revision().await?.unwrap_or(0);

        let mut doc = StoreDocument::seeded(self.clock.now())?;
        doc.meta.revision = previous + 1;
        self.write(&doc).await?;

        info!(revision = doc.meta.revision, "Store reset to seed data");
        *cached = Some(doc.clone());
        Ok(doc)
    }

    /// Drop the cached copy so the next access reloads from the backend.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// Run a read-only closure against the current document.
    pub async fn read<R>(&self, f: impl FnOnce(&StoreDocument) -> R) -> AppResult<R> {
        let mut cached = self.cached.lock().await;
        let doc = self.ensure_loaded(&mut cached).await?;
        Ok(f(doc))
    }

    /// Apply a mutation and persist it before returning.
    ///
    /// If the closure fails nothing is written.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut cached = self.cached.lock().await;
        let mut doc = self.ensure_loaded(&mut cached).await?.clone();

        let out = f(&mut doc)?;

        match self.persist_checked(&mut doc).await {
            Ok(()) => {
                *cached = Some(doc);
                Ok(out)
            }
            Err(e) => {
                *cached = None;
                Err(e)
            }
        }
    }

    async fn ensure_loaded<'a>(
        &self,
        cached: &'a mut Option<StoreDocument>,
    ) -> AppResult<&'a StoreDocument> {
        if cached.is_none() {
            *cached = Some(self.load_from_backend().await?);
        }
        cached
            .as_ref()
            .ok_or_else(|| AppError::internal("Store document missing after load"))
    }

    async fn load_from_backend(&self) -> AppResult<StoreDocument> {
        let Some(bytes) = self.kv.get(&keys::document()).await? else {
            info!("No persisted store document; seeding");
            return self.reseed(1).await;
        };

        let mut doc = match serde_json::from_slice::<StoreDocument>(&bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "Persisted store document is unreadable; reseeding");
                let previous = self.persisted_revision().await?.unwrap_or(0);
                return self.reseed(previous + 1).await;
            }
        };

        if doc.meta.version != SCHEMA_VERSION {
            warn!(
                found = doc.meta.version,
                expected = SCHEMA_VERSION,
                "Store schema version mismatch; reseeding"
            );
            return self.reseed(doc.meta.revision + 1).await;
        }

        if reconcile(&mut doc, &seed_collections()?) {
            doc.meta.revision += 1;
            self.write(&doc).await?;
            info!(revision = doc.meta.revision, "Store document reconciled with seed");
        }

        Ok(doc)
    }

    async fn reseed(&self, revision: u64) -> AppResult<StoreDocument> {
        let mut doc = StoreDocument::seeded(self.clock.now())?;
        doc.meta.revision = revision;
        self.write(&doc).await?;
        Ok(doc)
    }

    /// Revision of the persisted document, if one exists and its meta block
    /// is readable.
    async fn persisted_revision(&self) -> AppResult<Option<u64>> {
        let Some(bytes) = self.kv.get(&keys::document()).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_slice::<PersistedMeta>(&bytes)
            .ok()
            .map(|p| p.meta.revision))
    }

    async fn persist_checked(&self, doc: &mut StoreDocument) -> AppResult<()> {
        if let Some(persisted) = self.persisted_revision().await?
            && persisted != doc.meta.revision
        {
            warn!(
                persisted,
                loaded = doc.meta.revision,
                "Store document changed since it was loaded"
            );
            return Err(AppError::conflict(format!(
                "Store document was modified elsewhere (revision {persisted}, expected {})",
                doc.meta.revision
            )));
        }

        doc.meta.revision += 1;
        self.write(doc).await
    }

    async fn write(&self, doc: &StoreDocument) -> AppResult<()> {
        set_json(self.kv.as_ref(), &keys::document(), doc).await?;
        debug!(revision = doc.meta.revision, "Persisted store document");
        Ok(())
    }
}
