use taskdeck_core::id::CategoryId;
use taskdeck_core::{Category, Priority, Task};
use time::Date;

/// Patch for the optional due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Set the due date to the provided day.
    Set(Date),
    /// Remove the due date entirely.
    Clear,
}

/// Partial task update shared by the CLI and TUI edit paths.
///
/// `None` fields leave the task untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Overwrite the title.
    pub title: Option<String>,
    /// Overwrite the description (empty string clears it).
    pub description: Option<String>,
    /// Move the task into another category.
    pub category: Option<CategoryId>,
    /// Overwrite the priority.
    pub priority: Option<Priority>,
    /// Set or clear the due date.
    pub due_date: Option<DueDatePatch>,
}

impl TaskPatch {
    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Write the populated fields onto the task. Timestamps are the caller's
    /// responsibility.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category_id = category;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        match self.due_date {
            Some(DueDatePatch::Set(date)) => task.due_date = Some(date),
            Some(DueDatePatch::Clear) => task.due_date = None,
            None => {}
        }
    }
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    /// Overwrite the display name.
    pub name: Option<String>,
    /// Overwrite the hex color.
    pub color: Option<String>,
    /// Overwrite the icon name.
    pub icon: Option<String>,
}

impl CategoryPatch {
    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }

    /// Write the populated fields onto the category.
    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
    }
}
