//! In-memory key-value store using a concurrent map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use tenantguard_core::result::AppResult;
use tenantguard_core::traits::KeyValueStore;

/// Process-scoped key-value store. Contents vanish when the process exits.
///
/// Clones share the same map, so a test can hand one clone to the backend
/// and inspect or corrupt raw values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
