//! List Store: the canonical collection of user lists under `userLists`.
//!
//! One `ListStore` is built at startup and cloned into every screen that
//! needs it; clones share state. In-memory edits are applied first and then
//! written back as a full collection (optimistic, local-first). A failed
//! write surfaces as `StoreError::Write` without rolling back the edit, so
//! repeating the action re-issues the same write.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use super::{collection, StoreError, WriteGuard};
use crate::constants::keys::USER_LISTS;
use crate::models::list::normalize_title;
use crate::models::{ListTheme, SortOrder, TaskList};
use crate::storage::StorageGateway;
use crate::tasks;

struct ListStoreInner {
    gateway: Arc<dyn StorageGateway>,
    lists: RwLock<Vec<TaskList>>,
    last_load_error: Mutex<Option<String>>,
    /// Serializes snapshot+write so the newest state is always the one persisted last.
    write_lock: tokio::sync::Mutex<()>,
    revision: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct ListStore {
    inner: Arc<ListStoreInner>,
}

impl ListStore {
    /// Empty store over `gateway`. Call `load_all` before reading.
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(ListStoreInner {
                gateway,
                lists: RwLock::new(Vec::new()),
                last_load_error: Mutex::new(None),
                write_lock: tokio::sync::Mutex::new(()),
                revision,
            }),
        }
    }

    /// Build and load in one step.
    pub async fn open(gateway: Arc<dyn StorageGateway>) -> Self {
        let store = Self::new(gateway);
        store.load_all().await;
        store
    }

    // ===== Loading =====

    /// Re-read `userLists`, replacing the in-memory collection.
    ///
    /// Absent, unreadable or corrupt data all load as an empty collection;
    /// the latter two are recorded in `last_load_error()`. Screens call this
    /// on focus to observe writes made through another store instance.
    /// Waits for any in-flight write so an acknowledged edit is never dropped.
    pub async fn load_all(&self) -> Vec<TaskList> {
        let _guard = self.inner.write_lock.lock().await;
        let (lists, error) = collection::load::<TaskList>(self.inner.gateway.as_ref(), USER_LISTS).await;
        *self.inner.last_load_error.lock() = error;
        *self.inner.lists.write() = lists.clone();
        self.bump_revision();
        lists
    }

    pub fn last_load_error(&self) -> Option<String> {
        self.inner.last_load_error.lock().clone()
    }

    // ===== Queries =====

    pub fn lists(&self) -> Vec<TaskList> {
        self.inner.lists.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<TaskList> {
        self.inner.lists.read().iter().find(|l| l.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lists.read().iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.lists.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lists.read().is_empty()
    }

    /// Revision counter bumped after every in-memory change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    // ===== Mutations =====

    /// A fresh, unsaved list. Nothing is stored until it is passed to `upsert`.
    pub fn create_list(&self, title: Option<&str>) -> TaskList {
        TaskList::new(title)
    }

    /// Replace the list with the same id in place, or append it if new; then persist.
    ///
    /// Tasks repeating an earlier task's id are dropped.
    pub async fn upsert(&self, mut list: TaskList) -> Result<(), StoreError> {
        let before = list.tasks.len();
        list.tasks = tasks::dedupe_by_id(list.tasks);
        if list.tasks.len() != before {
            tracing::warn!(list_id = %list.id, dropped = before - list.tasks.len(), "dropped duplicate task ids");
        }

        let guard = self.inner.write_lock.lock().await;
        {
            let mut lists = self.inner.lists.write();
            match lists.iter_mut().find(|l| l.id == list.id) {
                Some(existing) => *existing = list,
                None => lists.push(list),
            }
        }
        self.bump_revision();
        self.save_locked(&guard).await
    }

    /// Remove the list with `id` and persist. Unknown ids are a no-op.
    ///
    /// Group references are not touched here; use
    /// `reconcile::delete_list_cascade` to keep groups consistent.
    pub async fn delete_list(&self, id: &str) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        if !self.remove_locked(&guard, id) {
            return Ok(());
        }
        self.save_locked(&guard).await
    }

    pub async fn rename_list(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let title = normalize_title(title);
        self.update_list(id, |list| list.title = title).await
    }

    pub async fn set_theme(&self, id: &str, theme: Option<ListTheme>) -> Result<(), StoreError> {
        self.update_list(id, |list| list.theme = theme).await
    }

    pub async fn set_sort_order(&self, id: &str, order: SortOrder) -> Result<(), StoreError> {
        self.update_list(id, |list| list.sort_order = order).await
    }

    /// Remove the persisted key and empty the in-memory collection.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.inner.write_lock.lock().await;
        self.inner.lists.write().clear();
        self.bump_revision();
        collection::remove(self.inner.gateway.as_ref(), USER_LISTS).await?;
        tracing::info!("cleared all lists");
        Ok(())
    }

    /// Write the whole in-memory collection to `userLists`.
    pub async fn save_all(&self) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        self.save_locked(&guard).await
    }

    // ===== Crate-internal helpers =====

    pub(crate) async fn lock_writes(&self) -> WriteGuard<'_> {
        self.inner.write_lock.lock().await
    }

    /// Reload for callers that must act on the persisted state. On a read or
    /// parse failure the in-memory collection is left as it was.
    pub(crate) async fn reload_locked(&self, _guard: &WriteGuard<'_>) -> Result<(), StoreError> {
        let (lists, error) = collection::load::<TaskList>(self.inner.gateway.as_ref(), USER_LISTS).await;
        if let Some(reason) = error {
            return Err(StoreError::Load {
                key: USER_LISTS,
                reason,
            });
        }
        *self.inner.last_load_error.lock() = None;
        *self.inner.lists.write() = lists;
        self.bump_revision();
        Ok(())
    }

    pub(crate) async fn save_locked(&self, _guard: &WriteGuard<'_>) -> Result<(), StoreError> {
        let json = {
            let lists = self.inner.lists.read();
            collection::encode(USER_LISTS, &lists)?
        };
        collection::write(self.inner.gateway.as_ref(), USER_LISTS, &json).await
    }

    /// Drop `id` from memory without persisting. Returns whether it existed.
    pub(crate) fn remove_locked(&self, _guard: &WriteGuard<'_>, id: &str) -> bool {
        let removed = {
            let mut lists = self.inner.lists.write();
            let before = lists.len();
            lists.retain(|l| l.id != id);
            lists.len() != before
        };
        if removed {
            self.bump_revision();
        }
        removed
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.inner.lists.read().iter().map(|l| l.id.clone()).collect()
    }

    async fn update_list(&self, id: &str, update: impl FnOnce(&mut TaskList)) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        let found = {
            let mut lists = self.inner.lists.write();
            match lists.iter_mut().find(|l| l.id == id) {
                Some(list) => {
                    update(list);
                    true
                }
                None => false,
            }
        };
        if !found {
            return Ok(());
        }
        self.bump_revision();
        self.save_locked(&guard).await
    }

    fn bump_revision(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}
