//! Key-value store backed by a directory, one file per key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use tenantguard_core::error::{AppError, ErrorKind};
use tenantguard_core::result::AppResult;
use tenantguard_core::traits::KeyValueStore;

/// Directory-backed key-value store.
///
/// Each key maps to `<root>/<key>.json`. Writes go to a sibling temp file
/// and are renamed into place so a reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    /// Directory holding one file per key.
    root: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create data directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The directory this store writes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path.
    ///
    /// Keys are restricted to ASCII alphanumerics, `.`, `_` and `-` so a key
    /// can never escape the root directory.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(AppError::validation(format!("Invalid storage key: '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read key: {key}"),
                e,
            )),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        let path = self.resolve(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write key: {key}"),
                e,
            )
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit key: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = value.len(), "Wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete key: {key}"),
                e,
            )),
        }
    }
}
