//! Fault-injecting gateway for exercising the read/write error policies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{MemoryStorage, StorageError, StorageGateway};

#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyStorage {
    pub inner: MemoryStorage,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    write_delay: Arc<parking_lot::Mutex<Option<Duration>>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Hold every `set` for `delay` before it lands.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }
}

#[async_trait]
impl StorageGateway for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected read failure".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected write failure".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected write failure".into()));
        }
        self.inner.remove(key).await
    }
}
