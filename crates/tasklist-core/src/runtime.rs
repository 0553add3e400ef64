use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::CoreConfig;
use crate::storage::{FileStorage, StorageGateway};
use crate::store::{
    delete_list_cascade, repair_group_references, CascadeReport, GroupStore, ListSession, ListStore,
    OnboardingFlag, StoreError,
};

/// Everything a UI needs, built once at startup and handed to screens.
///
/// Clones share the same stores.
#[derive(Clone)]
pub struct CoreRuntime {
    gateway: Arc<dyn StorageGateway>,
    lists: ListStore,
    groups: GroupStore,
    onboarding: OnboardingFlag,
}

impl CoreRuntime {
    /// Open file-backed storage under `config.data_dir` and load every store.
    pub async fn open(config: &CoreConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)
            .await
            .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
        tracing::info!(data_dir = %config.data_dir.display(), "opening task lists");
        Ok(Self::with_gateway(Arc::new(storage)).await)
    }

    /// Load every store over an existing gateway and repair dangling group
    /// references left by an interrupted delete.
    pub async fn with_gateway(gateway: Arc<dyn StorageGateway>) -> Self {
        let lists = ListStore::open(gateway.clone()).await;
        let groups = GroupStore::open(gateway.clone()).await;
        let onboarding = OnboardingFlag::new(gateway.clone());

        if let Err(e) = repair_group_references(&lists, &groups).await {
            tracing::warn!(error = %e, "group reference repair failed");
        }

        Self {
            gateway,
            lists,
            groups,
            onboarding,
        }
    }

    pub fn gateway(&self) -> Arc<dyn StorageGateway> {
        self.gateway.clone()
    }

    pub fn lists(&self) -> &ListStore {
        &self.lists
    }

    pub fn groups(&self) -> &GroupStore {
        &self.groups
    }

    pub fn onboarding(&self) -> &OnboardingFlag {
        &self.onboarding
    }

    /// Open a detail-screen session on an existing list.
    pub fn open_list(&self, list_id: &str) -> Result<ListSession, StoreError> {
        ListSession::open(&self.lists, list_id)
    }

    /// Confirmed "delete list" action: removes the list and its group references.
    pub async fn delete_list(&self, list_id: &str) -> Result<CascadeReport, StoreError> {
        delete_list_cascade(&self.lists, &self.groups, list_id).await
    }

    /// Reload both collections, e.g. when the overview screen regains focus.
    pub async fn refresh(&self) {
        self.lists.load_all().await;
        self.groups.load_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_file_backed_runtime_round_trip() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path().join("data"));

        let runtime = CoreRuntime::open(&config).await.unwrap();
        assert!(runtime.lists().is_empty());
        assert!(!runtime.onboarding().has_completed().await);

        let mut session = ListSession::new_list(runtime.lists(), Some("Groceries"));
        session.add_task("Milk").unwrap();
        session.commit().await.unwrap();
        runtime.groups().create_group("Home").await.unwrap();
        runtime.onboarding().mark_completed().await.unwrap();

        let reopened = CoreRuntime::open(&config).await.unwrap();
        assert_eq!(reopened.lists().len(), 1);
        assert_eq!(reopened.groups().len(), 1);
        assert!(reopened.onboarding().has_completed().await);
        assert!(dir.path().join("data").join("userLists.json").exists());
    }

    #[tokio::test]
    async fn test_delete_list_cascades_through_runtime() {
        let storage = MemoryStorage::new();
        let runtime = CoreRuntime::with_gateway(Arc::new(storage.clone())).await;

        let list = runtime.lists().create_list(Some("Trip"));
        runtime.lists().upsert(list.clone()).await.unwrap();
        let group = runtime.groups().create_group("Travel").await.unwrap();
        runtime.groups().assign_list(&group.id, &list.id).await.unwrap();

        let report = runtime.delete_list(&list.id).await.unwrap();
        assert!(report.list_removed);
        assert_eq!(report.group_refs_removed, 1);
        assert!(runtime.open_list(&list.id).is_err());
    }

    #[tokio::test]
    async fn test_startup_repairs_dangling_refs() {
        let storage = MemoryStorage::new();
        let groups = GroupStore::new(Arc::new(storage.clone()));
        let group = groups.create_group("Orphans").await.unwrap();
        groups.assign_list(&group.id, "deleted-list").await.unwrap();

        let runtime = CoreRuntime::with_gateway(Arc::new(storage.clone())).await;
        assert!(runtime.groups().get(&group.id).unwrap().lists.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_picks_up_external_writes() {
        let storage = MemoryStorage::new();
        let runtime = CoreRuntime::with_gateway(Arc::new(storage.clone())).await;

        let elsewhere = ListStore::new(Arc::new(storage.clone()));
        elsewhere.upsert(elsewhere.create_list(Some("From widget"))).await.unwrap();

        assert!(runtime.lists().is_empty());
        runtime.refresh().await;
        assert_eq!(runtime.lists().len(), 1);
    }
}
