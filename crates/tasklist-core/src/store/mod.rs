mod collection;
pub mod error;
pub mod group_store;
pub mod list_store;
pub mod onboarding;
pub mod reconcile;
pub mod session;

pub use error::StoreError;

/// Held for the whole of an in-memory change plus its write-back, and for reloads.
pub(crate) type WriteGuard<'a> = tokio::sync::MutexGuard<'a, ()>;
pub use group_store::GroupStore;
pub use list_store::ListStore;
pub use onboarding::{OnboardingFlag, OnboardingState};
pub use reconcile::{delete_list_cascade, repair_group_references, CascadeReport};
pub use session::ListSession;
