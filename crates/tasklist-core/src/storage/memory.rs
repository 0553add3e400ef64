use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{StorageError, StorageGateway};

/// In-process gateway. Clones share the same map, so two stores built over
/// clones of one `MemoryStorage` see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Raw value without going through the async interface.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("userLists").await.unwrap(), None);
        // Removing a missing key is not an error
        storage.remove("userLists").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("customGroups", "[]").await.unwrap();
        assert_eq!(other.get("customGroups").await.unwrap().as_deref(), Some("[]"));

        other.remove("customGroups").await.unwrap();
        assert!(!storage.contains_key("customGroups"));
        assert!(storage.is_empty());
    }
}
