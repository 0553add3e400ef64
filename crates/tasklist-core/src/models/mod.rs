pub mod group;
pub mod list;
pub mod task;

pub use group::Group;
pub use list::{ListStats, ListTheme, SortOrder, TaskList};
pub use task::Task;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fresh identifier for a list, task or group.
///
/// UUID v4 rather than the wall clock, so entities created in a tight loop
/// never collide.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time, used for every `createdAt` / `completedAt` stamp.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
