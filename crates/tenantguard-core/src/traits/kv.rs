//! Key-value persistence trait for pluggable storage backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the byte-string key-value backend underneath the document store.
///
/// The store, the live session token, and the login-attempt counter are each
/// kept under their own key. Implementations decide durability: the
/// in-memory backend lives as long as the process, the file backend
/// survives restarts. Tests supply an isolated instance per run.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get the raw bytes stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> AppResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
