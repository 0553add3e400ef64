pub mod config;
pub mod constants;
pub mod models;
pub mod runtime;
pub mod search;
pub mod storage;
pub mod store;
pub mod tasks;
pub mod tracing_setup;

// Re-export the handles most callers need at crate root
pub use config::CoreConfig;
pub use models::{Group, ListStats, ListTheme, SortOrder, Task, TaskList};
pub use runtime::CoreRuntime;
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageGateway};
pub use store::{GroupStore, ListSession, ListStore, OnboardingFlag, StoreError};
