//! Shared load/save plumbing for the JSON-array keys.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::StoreError;
use crate::storage::StorageGateway;

/// Read and decode `key`. Missing keys yield an empty collection; read and
/// parse failures also yield an empty collection plus a description.
pub(crate) async fn load<T: DeserializeOwned>(
    gateway: &dyn StorageGateway,
    key: &'static str,
) -> (Vec<T>, Option<String>) {
    match gateway.get(key).await {
        Ok(None) => {
            tracing::debug!(key, "no persisted collection");
            (Vec::new(), None)
        }
        Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                tracing::debug!(key, count = items.len(), "loaded collection");
                (items, None)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable collection");
                (Vec::new(), Some(format!("failed to parse {}: {}", key, e)))
            }
        },
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read collection");
            (Vec::new(), Some(format!("failed to read {}: {}", key, e)))
        }
    }
}

pub(crate) fn encode<T: Serialize>(key: &'static str, items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string(items).map_err(|source| StoreError::Encode { key, source })
}

pub(crate) async fn write(
    gateway: &dyn StorageGateway,
    key: &'static str,
    json: &str,
) -> Result<(), StoreError> {
    gateway.set(key, json).await.map_err(|source| {
        tracing::error!(key, error = %source, "failed to save collection");
        StoreError::Write { key, source }
    })?;
    tracing::debug!(key, bytes = json.len(), "saved collection");
    Ok(())
}

pub(crate) async fn remove(gateway: &dyn StorageGateway, key: &'static str) -> Result<(), StoreError> {
    gateway.remove(key).await.map_err(|source| {
        tracing::error!(key, error = %source, "failed to remove collection");
        StoreError::Write { key, source }
    })
}
