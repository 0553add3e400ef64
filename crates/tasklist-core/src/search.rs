//! Task search across lists.
//!
//! Query semantics:
//! - '+' splits the query into terms that must ALL appear in the task text
//! - matching is ASCII case-insensitive
//! - an empty query matches nothing

use crate::models::{Task, TaskList};

/// A task matched by `search_tasks`, with the list it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskHit {
    pub list_id: String,
    pub list_title: String,
    pub task: Task,
}

/// Split a query into lowercase terms, dropping empty ones.
///
/// "milk + eggs" -> ["milk", "eggs"]; "++" -> []
pub fn parse_terms(query: &str) -> Vec<String> {
    query
        .split('+')
        .map(|term| term.trim().to_ascii_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_ascii_lowercase().contains(term)
}

/// Every task, in list order then task order, whose text contains all query terms.
pub fn search_tasks(lists: &[TaskList], query: &str) -> Vec<TaskHit> {
    let terms = parse_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    lists
        .iter()
        .flat_map(|list| {
            list.tasks
                .iter()
                .filter(|task| terms.iter().all(|term| contains_term(&task.text, term)))
                .map(move |task| TaskHit {
                    list_id: list.id.clone(),
                    list_title: list.title.clone(),
                    task: task.clone(),
                })
        })
        .collect()
}
