//! Document store configuration.

use serde::{Deserialize, Serialize};

/// Which key-value backend persists the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-scoped map; nothing survives a restart.
    Memory,
    /// One file per key under `data_dir`.
    #[default]
    File,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::File => write!(f, "file"),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key-value backend.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory used by the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}
