use crate::storage::StorageError;

/// Outcome of a store operation that could not be completed.
///
/// Plain reloads never fail: a store that cannot read its key starts empty
/// and reports the problem through `last_load_error()`. `Load` is only
/// returned by operations that must see the persisted state before acting.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The in-memory change was applied but could not be persisted.
    #[error("failed to save {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    /// The persisted collection could not be read; nothing was changed.
    #[error("failed to load {key}: {reason}")]
    Load { key: &'static str, reason: String },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("task text must not be empty")]
    EmptyText,

    #[error("list not found: {0}")]
    ListNotFound(String),
}

impl StoreError {
    /// True for failures the UI should surface as "failed to save".
    pub fn is_save_failure(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Encode { .. })
    }
}
