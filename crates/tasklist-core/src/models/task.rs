use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, now};

/// A single to-do item. Owned by exactly one `TaskList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Set when the task transitions to completed, cleared when it transitions back.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub important: bool,
}

impl Task {
    /// New uncompleted task. `text` is stored as given; validation happens in `tasks::add_task`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
            created_at: now(),
            completed_at: None,
            important: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_open() {
        let task = Task::new("Milk");
        assert_eq!(task.text, "Milk");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(!task.important);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let task = Task::new("Eggs");
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("createdAt").is_some());
        // completedAt is written as an explicit null while open
        assert_eq!(json.get("completedAt"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"id":"1","text":"Untitled list","completed":false}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "1");
        assert!(task.completed_at.is_none());
        assert!(!task.important);
    }
}
