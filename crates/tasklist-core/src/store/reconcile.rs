//! Cross-store consistency between `userLists` and `customGroups`.
//!
//! The two keys are written separately, so a crash between writes can
//! leave groups pointing at deleted lists. `delete_list_cascade` performs
//! both halves of a list deletion; `repair_group_references` cleans up
//! after an interrupted one.

use std::collections::HashSet;

use super::{GroupStore, ListStore, StoreError};

/// What a cascading delete changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub list_removed: bool,
    pub group_refs_removed: usize,
}

/// Delete a list and every group reference to it.
///
/// Both stores are reloaded first so the deletion applies to the latest
/// persisted state, then `userLists` and `customGroups` are written. Both
/// writes are attempted even if the first fails; the first error is returned.
///
/// If either reload fails the delete is abandoned with `StoreError::Load`
/// and the in-memory lists are left as they were.
pub async fn delete_list_cascade(
    lists: &ListStore,
    groups: &GroupStore,
    list_id: &str,
) -> Result<CascadeReport, StoreError> {
    let lists_guard = lists.lock_writes().await;
    let groups_guard = groups.lock_writes().await;

    if let Err(e) = lists.reload_locked(&lists_guard).await {
        tracing::warn!(list_id, error = %e, "list delete abandoned");
        return Err(e);
    }
    if let Err(e) = groups.reload_locked(&groups_guard).await {
        tracing::warn!(list_id, error = %e, "list delete abandoned");
        return Err(e);
    }

    let report = CascadeReport {
        list_removed: lists.remove_locked(&lists_guard, list_id),
        group_refs_removed: groups.remove_list_refs(&groups_guard, |id| id == list_id),
    };

    let lists_result = if report.list_removed {
        lists.save_locked(&lists_guard).await
    } else {
        Ok(())
    };
    let groups_result = if report.group_refs_removed > 0 {
        groups.save_locked(&groups_guard).await
    } else {
        Ok(())
    };

    tracing::info!(
        list_id,
        list_removed = report.list_removed,
        group_refs_removed = report.group_refs_removed,
        "cascading list delete"
    );

    lists_result?;
    groups_result?;
    Ok(report)
}

/// Drop group references to lists that no longer exist and persist groups
/// if anything changed. Returns the number of references removed.
///
/// Skipped when the lists failed to load, since an empty collection would
/// then look like every list had been deleted.
pub async fn repair_group_references(lists: &ListStore, groups: &GroupStore) -> Result<usize, StoreError> {
    let lists_guard = lists.lock_writes().await;
    if let Some(error) = lists.last_load_error() {
        tracing::warn!(%error, "skipping group repair: lists did not load");
        return Ok(0);
    }
    let known: HashSet<String> = lists.ids().into_iter().collect();

    let groups_guard = groups.lock_writes().await;
    let removed = groups.remove_list_refs(&groups_guard, |id| !known.contains(id));
    if removed > 0 {
        tracing::info!(removed, "removed dangling group references");
        groups.save_locked(&groups_guard).await?;
    }
    drop(lists_guard);
    Ok(removed)
}
