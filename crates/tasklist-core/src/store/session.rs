//! Screen-held copy of one list.
//!
//! A detail screen receives a list's id, title and tasks, edits that copy
//! with the Task Mutation Engine, and writes it back through
//! `ListStore::upsert`. Nothing reaches storage until `commit`.

use tokio::task::JoinHandle;

use super::{ListStore, StoreError};
use crate::models::list::normalize_title;
use crate::models::{now, ListStats, ListTheme, SortOrder, Task, TaskList};
use crate::tasks::{self, Partition};

pub struct ListSession {
    store: ListStore,
    list: TaskList,
    dirty: bool,
}

impl ListSession {
    /// Copy an existing list out of the store.
    pub fn open(store: &ListStore, list_id: &str) -> Result<Self, StoreError> {
        let list = store
            .get(list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        Ok(Self {
            store: store.clone(),
            list,
            dirty: false,
        })
    }

    /// Start a brand-new list. It is persisted on the first `commit`.
    pub fn new_list(store: &ListStore, title: Option<&str>) -> Self {
        Self {
            store: store.clone(),
            list: store.create_list(title),
            dirty: true,
        }
    }

    /// Rebuild a session from navigation parameters. Fields the parameters
    /// do not carry (theme, sort order, creation time) come from the store
    /// when it knows the list. Repeated task ids keep their first occurrence.
    pub fn from_params(store: &ListStore, id: &str, title: &str, tasks: Vec<Task>) -> Self {
        let mut list = store.get(id).unwrap_or_else(|| TaskList {
            id: id.to_string(),
            title: String::new(),
            tasks: Vec::new(),
            created_at: now(),
            theme: None,
            sort_order: SortOrder::default(),
        });
        list.title = normalize_title(title);
        list.tasks = tasks::dedupe_by_id(tasks);
        Self {
            store: store.clone(),
            list,
            dirty: false,
        }
    }

    // ===== Accessors =====

    pub fn id(&self) -> &str {
        &self.list.id
    }

    pub fn title(&self) -> &str {
        &self.list.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.list.tasks
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// True when there are local edits not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn stats(&self) -> ListStats {
        self.list.stats()
    }

    /// Tasks in the list's chosen sort order, split for display.
    pub fn sections(&self) -> Partition {
        tasks::partition(&tasks::sort_tasks(&self.list.tasks, self.list.sort_order))
    }

    // ===== Local edits =====

    pub fn set_title(&mut self, title: &str) {
        self.list.title = normalize_title(title);
        self.dirty = true;
    }

    pub fn set_theme(&mut self, theme: Option<ListTheme>) {
        self.list.theme = theme;
        self.dirty = true;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.list.sort_order = order;
        self.dirty = true;
    }

    /// Blank text is rejected here, before anything reaches the store.
    pub fn add_task(&mut self, text: &str) -> Result<&Task, StoreError> {
        if tasks::validate_text(text).is_none() {
            return Err(StoreError::EmptyText);
        }
        self.apply(|current| tasks::add_task(current, text));
        Ok(&self.list.tasks[0])
    }

    pub fn toggle_task(&mut self, task_id: &str) {
        self.apply(|current| tasks::toggle_task(current, task_id));
    }

    pub fn toggle_important(&mut self, task_id: &str) {
        self.apply(|current| tasks::toggle_important(current, task_id));
    }

    pub fn edit_task(&mut self, task_id: &str, text: &str) {
        self.apply(|current| tasks::edit_task(current, task_id, text));
    }

    /// Caller has already obtained the user's confirmation.
    pub fn delete_task(&mut self, task_id: &str) {
        self.apply(|current| tasks::delete_task(current, task_id));
    }

    pub fn move_task(&mut self, task_id: &str, to_index: usize) {
        self.apply(|current| tasks::move_task(current, task_id, to_index));
    }

    // ===== Persistence =====

    /// Upsert the copy into the store and wait for the write.
    ///
    /// The session stays dirty when the write fails so the user can retry.
    pub async fn commit(&mut self) -> Result<(), StoreError> {
        self.store.upsert(self.list.clone()).await?;
        self.dirty = false;
        Ok(())
    }

    /// Commit from a screen that is going away. The write runs to completion
    /// on its own task; nothing refers back to the session afterwards.
    pub fn commit_detached(self) -> JoinHandle<Result<(), StoreError>> {
        let ListSession { store, list, .. } = self;
        tokio::spawn(async move {
            let list_id = list.id.clone();
            let result = store.upsert(list).await;
            if let Err(e) = &result {
                tracing::error!(list_id = %list_id, error = %e, "detached commit failed");
            }
            result
        })
    }

    fn apply(&mut self, op: impl FnOnce(&[Task]) -> Vec<Task>) {
        let next = op(&self.list.tasks);
        if next != self.list.tasks {
            self.list.tasks = next;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::flaky::FlakyStorage;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn texts(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_groceries_flow_persists() {
        let storage = MemoryStorage::new();
        let store = ListStore::new(Arc::new(storage.clone()));

        let mut session = ListSession::new_list(&store, Some("Groceries"));
        session.add_task("Milk").unwrap();
        session.add_task("Eggs").unwrap();
        assert_eq!(texts(session.tasks()), vec!["Eggs", "Milk"]);

        let milk = session.tasks()[1].id.clone();
        session.toggle_task(&milk);
        let sections = session.sections();
        assert_eq!(texts(&sections.completed), vec!["Milk"]);
        assert_eq!(texts(&sections.uncompleted), vec!["Eggs"]);

        session.commit().await.unwrap();
        assert!(!session.is_dirty());

        let reloaded = ListStore::open(Arc::new(storage.clone())).await;
        let saved = reloaded.get(session.id()).unwrap();
        assert_eq!(saved.title, "Groceries");
        assert_eq!(texts(&saved.tasks), vec!["Eggs", "Milk"]);
        assert!(saved.tasks[1].completed);
    }

    #[tokio::test]
    async fn test_blank_task_rejected_without_write() {
        let storage = MemoryStorage::new();
        let store = ListStore::new(Arc::new(storage.clone()));
        let mut session = ListSession::new_list(&store, None);

        assert!(matches!(session.add_task("   "), Err(StoreError::EmptyText)));
        assert!(session.tasks().is_empty());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_open_missing_list() {
        let store = ListStore::new(Arc::new(MemoryStorage::new()));
        assert!(matches!(
            ListSession::open(&store, "nope"),
            Err(StoreError::ListNotFound(id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_edits_do_not_leak_before_commit() {
        let storage = MemoryStorage::new();
        let store = ListStore::new(Arc::new(storage.clone()));
        let list = store.create_list(Some("Chores"));
        store.upsert(list.clone()).await.unwrap();

        let mut session = ListSession::open(&store, &list.id).unwrap();
        assert!(!session.is_dirty());
        session.add_task("Dishes").unwrap();
        session.set_title("House chores");

        assert!(store.get(&list.id).unwrap().tasks.is_empty());
        session.commit().await.unwrap();
        let saved = store.get(&list.id).unwrap();
        assert_eq!(saved.title, "House chores");
        assert_eq!(texts(&saved.tasks), vec!["Dishes"]);
        // Still one list: commit replaced in place
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_noop_edits_stay_clean() {
        let store = ListStore::new(Arc::new(MemoryStorage::new()));
        let list = store.create_list(None);
        store.upsert(list.clone()).await.unwrap();

        let mut session = ListSession::open(&store, &list.id).unwrap();
        session.toggle_task("missing");
        session.delete_task("missing");
        session.move_task("missing", 0);
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_failed_commit_stays_dirty() {
        let storage = FlakyStorage::new();
        let store = ListStore::new(Arc::new(storage.clone()));
        let mut session = ListSession::new_list(&store, Some("Trip"));
        session.add_task("Passport").unwrap();

        storage.fail_writes(true);
        assert!(session.commit().await.unwrap_err().is_save_failure());
        assert!(session.is_dirty());

        storage.fail_writes(false);
        session.commit().await.unwrap();
        assert!(!session.is_dirty());
        assert!(storage.inner.contains_key("userLists"));
    }

    #[tokio::test]
    async fn test_detached_commit_completes_after_drop() {
        let storage = MemoryStorage::new();
        let store = ListStore::new(Arc::new(storage.clone()));
        let mut session = ListSession::new_list(&store, Some("Later"));
        session.add_task("Finish me").unwrap();
        let id = session.id().to_string();

        let handle = session.commit_detached();
        handle.await.unwrap().unwrap();

        let reloaded = ListStore::open(Arc::new(storage.clone())).await;
        assert_eq!(texts(&reloaded.get(&id).unwrap().tasks), vec!["Finish me"]);
    }

    #[tokio::test]
    async fn test_from_params_keeps_stored_fields() {
        let store = ListStore::new(Arc::new(MemoryStorage::new()));
        let mut list = store.create_list(Some("Reading"));
        list.sort_order = SortOrder::Alphabetical;
        store.upsert(list.clone()).await.unwrap();

        let tasks = tasks::add_task(&[], "Dune");
        let session = ListSession::from_params(&store, &list.id, "Reading", tasks.clone());
        assert_eq!(session.list().sort_order, SortOrder::Alphabetical);
        assert_eq!(session.list().created_at, list.created_at);
        assert_eq!(session.tasks(), tasks.as_slice());

        let fresh = ListSession::from_params(&store, "new-id", "", Vec::new());
        assert_eq!(fresh.title(), "Untitled list");
    }

    #[tokio::test]
    async fn test_from_params_drops_repeated_task_ids() {
        let store = ListStore::new(Arc::new(MemoryStorage::new()));
        let mut tasks = tasks::add_task(&[], "Dune");
        let mut repeat = tasks[0].clone();
        repeat.completed = true;
        tasks.push(repeat);

        let session = ListSession::from_params(&store, "reading", "Reading", tasks);
        assert_eq!(texts(session.tasks()), vec!["Dune"]);
        assert!(!session.tasks()[0].completed);
    }
}
