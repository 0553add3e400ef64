//! Application-wide constants
//!
//! Storage keys and defaults shared by the stores. The key strings are part
//! of the on-device layout and must not change.

// Storage keys
pub mod keys {
    /// JSON array of every user-created list
    pub const USER_LISTS: &str = "userLists";
    /// JSON array of every user-created group
    pub const CUSTOM_GROUPS: &str = "customGroups";
    /// Literal `"true"` once onboarding is done, absent otherwise
    pub const ONBOARDING_COMPLETED: &str = "onboardingCompleted";
}

// List defaults
pub const DEFAULT_LIST_TITLE: &str = "Untitled list";

// Group defaults
/// Display counter assigned to a freshly created group (one "Untitled list").
pub const DEFAULT_GROUP_ITEM_COUNT: u32 = 1;

/// Value written by `OnboardingFlag::mark_completed`
pub const ONBOARDING_DONE_VALUE: &str = "true";

/// Background colors that need light foreground text.
pub const DARK_THEME_COLORS: [&str; 5] = ["#6366F1", "#8B5CF6", "#EC4899", "#EF4444", "#6B7280"];
