use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, now, Task};
use crate::constants::{DARK_THEME_COLORS, DEFAULT_LIST_TITLE};

fn default_title() -> String {
    DEFAULT_LIST_TITLE.to_string()
}

/// Title as stored: trimmed, with blank input replaced by the default title.
pub fn normalize_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        default_title()
    } else {
        title.to_string()
    }
}

/// Background chosen in the theme picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListTheme {
    Color { color: String },
    Photo { uri: String },
}

impl ListTheme {
    /// Whether text drawn over this background should be light.
    pub fn is_dark(&self) -> bool {
        match self {
            ListTheme::Color { color } => DARK_THEME_COLORS
                .iter()
                .any(|dark| dark.eq_ignore_ascii_case(color)),
            ListTheme::Photo { .. } => true,
        }
    }
}

/// How a list's tasks are displayed. See `tasks::sort_tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Manual,
    Alphabetical,
    Importance,
    CreationDate,
}

/// A user-created list. `tasks` order is significant (newest first on add).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ListTheme>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl TaskList {
    pub fn new(title: Option<&str>) -> Self {
        Self {
            id: generate_id(),
            title: title.map(normalize_title).unwrap_or_else(default_title),
            tasks: Vec::new(),
            created_at: now(),
            theme: None,
            sort_order: SortOrder::default(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn stats(&self) -> ListStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        ListStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
            important: self.tasks.iter().filter(|t| t.important).count(),
        }
    }
}

/// Counters shown on list cards and in the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub important: usize,
}

impl ListStats {
    /// Completed fraction in `[0.0, 1.0]`; an empty list reports 0.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
