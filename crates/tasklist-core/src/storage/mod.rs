//! Storage Gateway - the only I/O boundary.
//!
//! A string key/value store with no schema awareness. Callers serialize
//! their own values. Every operation touches exactly one key; there are no
//! transactions spanning keys.

mod file;
mod memory;
#[cfg(test)]
pub(crate) mod flaky;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Async key/value persistence.
///
/// A missing key is never an error: `get` returns `Ok(None)` and `remove`
/// returns `Ok(())`. Two writes to the same key issued without awaiting the
/// first have no ordering guarantee.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
