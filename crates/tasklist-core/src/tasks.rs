//! Task Mutation Engine.
//!
//! Pure functions over a list's task sequence. Every operation returns a new
//! `Vec<Task>` and leaves its input untouched; an unknown task id is a
//! silent no-op. Confirmation for destructive operations happens before
//! these are called.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::{now, SortOrder, Task};

/// Completed / uncompleted split used for display grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub completed: Vec<Task>,
    pub uncompleted: Vec<Task>,
}

/// Trimmed task text, or `None` when nothing is left.
pub fn validate_text(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

/// Prepend a new uncompleted task. Blank text leaves the sequence unchanged.
pub fn add_task(tasks: &[Task], text: &str) -> Vec<Task> {
    let Some(text) = validate_text(text) else {
        return tasks.to_vec();
    };
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(Task::new(text));
    next.extend_from_slice(tasks);
    next
}

/// Flip `completed`, stamping `completed_at` on the way in and clearing it on the way out.
pub fn toggle_task(tasks: &[Task], task_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| {
        task.completed = !task.completed;
        task.completed_at = if task.completed { Some(now()) } else { None };
    })
}

pub fn toggle_important(tasks: &[Task], task_id: &str) -> Vec<Task> {
    map_task(tasks, task_id, |task| task.important = !task.important)
}

/// Replace a task's text. Blank text is ignored.
pub fn edit_task(tasks: &[Task], task_id: &str, text: &str) -> Vec<Task> {
    let Some(text) = validate_text(text) else {
        return tasks.to_vec();
    };
    map_task(tasks, task_id, |task| task.text = text.to_string())
}

pub fn delete_task(tasks: &[Task], task_id: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != task_id).cloned().collect()
}

/// Move a task to `to_index` (clamped to the last slot).
pub fn move_task(tasks: &[Task], task_id: &str, to_index: usize) -> Vec<Task> {
    let mut next = tasks.to_vec();
    let Some(from) = next.iter().position(|t| t.id == task_id) else {
        return next;
    };
    let task = next.remove(from);
    let to = to_index.min(next.len());
    next.insert(to, task);
    next
}

/// Stable split into completed and uncompleted tasks.
pub fn partition(tasks: &[Task]) -> Partition {
    let (completed, uncompleted): (Vec<Task>, Vec<Task>) =
        tasks.iter().cloned().partition(|t| t.completed);
    Partition {
        completed,
        uncompleted,
    }
}

/// Display order for `order`. All sorts are stable.
pub fn sort_tasks(tasks: &[Task], order: SortOrder) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match order {
        SortOrder::Manual => {}
        SortOrder::Alphabetical => sorted.sort_by_cached_key(|t| t.text.to_lowercase()),
        SortOrder::Importance => sorted.sort_by_key(|t| !t.important),
        SortOrder::CreationDate => sorted.sort_by_key(|t| Reverse(t.created_at)),
    }
    sorted
}

/// Drop tasks whose id already appeared earlier in the sequence.
pub fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

fn map_task(tasks: &[Task], task_id: &str, update: impl FnOnce(&mut Task)) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(task) = next.iter_mut().find(|t| t.id == task_id) {
        update(task);
    }
    next
}
