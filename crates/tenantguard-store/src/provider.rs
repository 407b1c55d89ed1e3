//! Key-value manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tenantguard_core::config::{StoreBackend, StoreConfig};
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::KeyValueStore;

use crate::file::FileKvStore;
use crate::memory::MemoryKvStore;

/// Wraps the configured key-value backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct KvStoreManager {
    /// The inner backend.
    inner: Arc<dyn KeyValueStore>,
}

impl KvStoreManager {
    /// Create a manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.backend {
            StoreBackend::File => {
                info!(data_dir = %config.data_dir, "Initializing file key-value store");
                Arc::new(FileKvStore::new(&config.data_dir).await?)
            }
            StoreBackend::Memory => {
                info!("Initializing in-memory key-value store");
                Arc::new(MemoryKvStore::new())
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// A shared handle to the inner backend.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl KeyValueStore for KvStoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key).await
    }
}
