//! Group Store: user groups under `customGroups`.
//!
//! Same sharing and persistence model as `ListStore`. Creation appends and
//! persists in one step. A list id appears in at most one group; assigning
//! it to a group removes it from any other.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use super::{collection, StoreError, WriteGuard};
use crate::constants::keys::CUSTOM_GROUPS;
use crate::models::Group;
use crate::storage::StorageGateway;

struct GroupStoreInner {
    gateway: Arc<dyn StorageGateway>,
    groups: RwLock<Vec<Group>>,
    last_load_error: Mutex<Option<String>>,
    write_lock: tokio::sync::Mutex<()>,
    revision: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct GroupStore {
    inner: Arc<GroupStoreInner>,
}

impl GroupStore {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(GroupStoreInner {
                gateway,
                groups: RwLock::new(Vec::new()),
                last_load_error: Mutex::new(None),
                write_lock: tokio::sync::Mutex::new(()),
                revision,
            }),
        }
    }

    pub async fn open(gateway: Arc<dyn StorageGateway>) -> Self {
        let store = Self::new(gateway);
        store.load_all().await;
        store
    }

    /// Re-read `customGroups`; failures load as empty (see `last_load_error`).
    pub async fn load_all(&self) -> Vec<Group> {
        let _guard = self.inner.write_lock.lock().await;
        let (groups, error) = collection::load::<Group>(self.inner.gateway.as_ref(), CUSTOM_GROUPS).await;
        *self.inner.last_load_error.lock() = error;
        *self.inner.groups.write() = groups.clone();
        self.bump_revision();
        groups
    }

    pub fn last_load_error(&self) -> Option<String> {
        self.inner.last_load_error.lock().clone()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.inner.groups.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<Group> {
        self.inner.groups.read().iter().find(|g| g.id == id).cloned()
    }

    /// The group currently holding `list_id`, if any.
    pub fn group_for_list(&self, list_id: &str) -> Option<Group> {
        self.inner
            .groups
            .read()
            .iter()
            .find(|g| g.contains_list(list_id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.groups.read().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Append a new group and persist the collection.
    ///
    /// On a failed write the group stays in memory and `StoreError::Write`
    /// is returned.
    pub async fn create_group(&self, name: &str) -> Result<Group, StoreError> {
        let group = Group::new(name);
        let guard = self.inner.write_lock.lock().await;
        self.inner.groups.write().push(group.clone());
        self.bump_revision();
        tracing::debug!(group_id = %group.id, "created group");
        self.save_locked(&guard).await?;
        Ok(group)
    }

    pub async fn delete_group(&self, id: &str) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        let removed = {
            let mut groups = self.inner.groups.write();
            let before = groups.len();
            groups.retain(|g| g.id != id);
            groups.len() != before
        };
        if !removed {
            return Ok(());
        }
        self.bump_revision();
        self.save_locked(&guard).await
    }

    /// Rename a group. Blank names are ignored.
    pub async fn rename_group(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        let guard = self.inner.write_lock.lock().await;
        let renamed = {
            let mut groups = self.inner.groups.write();
            match groups.iter_mut().find(|g| g.id == id) {
                Some(group) => {
                    group.name = name.to_string();
                    true
                }
                None => false,
            }
        };
        if !renamed {
            return Ok(());
        }
        self.bump_revision();
        self.save_locked(&guard).await
    }

    /// Put `list_id` in `group_id`, taking it out of any other group.
    /// Unknown group ids are a no-op.
    pub async fn assign_list(&self, group_id: &str, list_id: &str) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        let changed = {
            let mut groups = self.inner.groups.write();
            if !groups.iter().any(|g| g.id == group_id) {
                false
            } else {
                let mut changed = false;
                for group in groups.iter_mut() {
                    if group.id == group_id {
                        if !group.contains_list(list_id) {
                            group.lists.push(list_id.to_string());
                            changed = true;
                        }
                    } else if group.remove_list(list_id) {
                        changed = true;
                    }
                }
                changed
            }
        };
        if !changed {
            return Ok(());
        }
        self.bump_revision();
        self.save_locked(&guard).await
    }

    /// Take `list_id` out of every group.
    pub async fn unassign_list(&self, list_id: &str) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        if self.remove_list_refs(&guard, |id| id == list_id) == 0 {
            return Ok(());
        }
        self.save_locked(&guard).await
    }

    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.inner.write_lock.lock().await;
        self.inner.groups.write().clear();
        self.bump_revision();
        collection::remove(self.inner.gateway.as_ref(), CUSTOM_GROUPS).await?;
        tracing::info!("cleared all groups");
        Ok(())
    }

    pub async fn save_all(&self) -> Result<(), StoreError> {
        let guard = self.inner.write_lock.lock().await;
        self.save_locked(&guard).await
    }

    // ===== Crate-internal helpers =====

    pub(crate) async fn lock_writes(&self) -> WriteGuard<'_> {
        self.inner.write_lock.lock().await
    }

    /// Like `ListStore::reload_locked`: a failed read leaves memory untouched.
    pub(crate) async fn reload_locked(&self, _guard: &WriteGuard<'_>) -> Result<(), StoreError> {
        let (groups, error) = collection::load::<Group>(self.inner.gateway.as_ref(), CUSTOM_GROUPS).await;
        if let Some(reason) = error {
            return Err(StoreError::Load {
                key: CUSTOM_GROUPS,
                reason,
            });
        }
        *self.inner.last_load_error.lock() = None;
        *self.inner.groups.write() = groups;
        self.bump_revision();
        Ok(())
    }

    pub(crate) async fn save_locked(&self, _guard: &WriteGuard<'_>) -> Result<(), StoreError> {
        let json = {
            let groups = self.inner.groups.read();
            collection::encode(CUSTOM_GROUPS, &groups)?
        };
        collection::write(self.inner.gateway.as_ref(), CUSTOM_GROUPS, &json).await
    }

    /// Strip every list reference matching `predicate` from memory without
    /// persisting. Returns the number of references removed.
    pub(crate) fn remove_list_refs(&self, _guard: &WriteGuard<'_>, predicate: impl Fn(&str) -> bool) -> usize {
        let removed: usize = {
            let mut groups = self.inner.groups.write();
            groups
                .iter_mut()
                .map(|group| {
                    let before = group.lists.len();
                    group.lists.retain(|id| !predicate(id.as_str()));
                    before - group.lists.len()
                })
                .sum()
        };
        if removed > 0 {
            self.bump_revision();
        }
        removed
    }

    fn bump_revision(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}
