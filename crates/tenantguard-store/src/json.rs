//! JSON helpers over a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use tenantguard_core::result::AppResult;
use tenantguard_core::traits::KeyValueStore;

/// Read and deserialize a JSON value.
///
/// Missing keys yield `Ok(None)`; malformed JSON is an error the caller
/// decides how to handle.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> AppResult<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value.
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes).await
}
