use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, now};
use crate::constants::DEFAULT_GROUP_ITEM_COUNT;

fn default_item_count() -> u32 {
    DEFAULT_GROUP_ITEM_COUNT
}

/// A named bucket referencing lists by id. Groups never own lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Display counter fixed at creation. Use `list_count()` for the real membership size.
    #[serde(rename = "itemCount", default = "default_item_count")]
    pub item_count: u32,
    #[serde(default)]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub lists: Vec<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            item_count: DEFAULT_GROUP_ITEM_COUNT,
            created: now(),
            lists: Vec::new(),
        }
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn contains_list(&self, list_id: &str) -> bool {
        self.lists.iter().any(|id| id == list_id)
    }

    /// Drop `list_id` from this group. Returns whether anything was removed.
    pub fn remove_list(&mut self, list_id: &str) -> bool {
        let before = self.lists.len();
        self.lists.retain(|id| id != list_id);
        self.lists.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group() {
        let group = Group::new("Work");
        assert_eq!(group.name, "Work");
        assert_eq!(group.item_count, 1);
        assert_eq!(group.list_count(), 0);
    }

    #[test]
    fn test_wire_shape() {
        let group = Group::new("Home");
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["itemCount"], 1);
        assert!(json.get("created").is_some());
        assert_eq!(json["lists"], serde_json::json!([]));
    }

    #[test]
    fn test_remove_list() {
        let mut group = Group::new("Errands");
        group.lists = vec!["a".to_string(), "b".to_string()];
        assert!(group.remove_list("a"));
        assert!(!group.remove_list("a"));
        assert_eq!(group.lists, vec!["b".to_string()]);
        // Stored counter is not derived from membership
        assert_eq!(group.item_count, 1);
    }
}
