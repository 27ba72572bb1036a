use serde::{Deserialize, Serialize};

use crate::id::CategoryId;

/// Color assigned to categories created without an explicit one.
pub const DEFAULT_COLOR: &str = "#6366F1";

/// Icon name assigned to categories created without an explicit one.
pub const DEFAULT_ICON: &str = "Folder";

/// A user-defined grouping for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier of the category.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Hex color rendered by UI surfaces.
    pub color: String,
    /// Icon name rendered by UI surfaces.
    pub icon: String,
    /// Denormalized count of tasks referencing this category.
    #[serde(default)]
    pub task_count: usize,
}

impl Category {
    /// Create a category with a fresh identifier and the standard defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: DEFAULT_COLOR.to_owned(),
            icon: DEFAULT_ICON.to_owned(),
            task_count: 0,
        }
    }
}
