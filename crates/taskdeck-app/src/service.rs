use anyhow::{Result, anyhow};
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::{Category, Priority, Task, TaskFilter, TextMatcher, stats};
use time::{Date, OffsetDateTime};

use crate::config::DefaultsConfig;
use crate::store::RecordStore;
use crate::task_patch::{CategoryPatch, TaskPatch};

/// Title applied when a task is created without one.
const DEFAULT_TASK_TITLE: &str = "New Task";
/// Name applied when a category is created without one.
const DEFAULT_CATEGORY_NAME: &str = "New Category";

/// Service façade that encapsulates all task-related side effects.
pub struct TaskService<S> {
    store: S,
    defaults: DefaultsConfig,
}

impl<S> TaskService<S> {
    pub const fn new(store: S, defaults: DefaultsConfig) -> Self
    where
        S: RecordStore,
    {
        Self { store, defaults }
    }

    pub const fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }
}

impl<S: RecordStore> TaskService<S> {
    /// Create a task, filling unset fields from the configured defaults.
    ///
    /// # Errors
    /// Returns an error if the category reference is unknown or the store write fails.
    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let CreateTaskInput {
            title,
            description,
            category,
            priority,
            due_date,
        } = input;

        let category_id = match category {
            Some(id) => self.require_category(id)?.id,
            None => self.default_category()?.id,
        };
        let title = title
            .map(|title| title.trim().to_owned())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TASK_TITLE.to_owned());

        let mut task = Task::new(title, category_id, OffsetDateTime::now_utc());
        task.priority = priority.unwrap_or(self.defaults.priority);
        if let Some(description) = description {
            task.description = description;
        }
        task.due_date = due_date;

        self.store.create_task(&task).map_err(Into::into)?;
        Ok(task)
    }

    /// Apply a partial update to an existing task.
    ///
    /// # Errors
    /// Returns an error if the task or a patched category reference is unknown.
    pub fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> Result<Task> {
        if let Some(category_id) = patch.category {
            self.require_category(category_id)?;
        }

        let mut task = self.require_task(task_id)?;
        patch.apply_to(&mut task);
        task.updated_at = OffsetDateTime::now_utc();
        self.store.update_task(&task).map_err(Into::into)?;
        Ok(task)
    }

    /// Flip the completed flag and refresh `updated_at`.
    ///
    /// # Errors
    /// Returns an error if the task is unknown or the store write fails.
    pub fn toggle_complete(&self, task_id: TaskId) -> Result<Task> {
        let mut task = self.require_task(task_id)?;
        task.completed = !task.completed;
        task.updated_at = OffsetDateTime::now_utc();
        self.store.update_task(&task).map_err(Into::into)?;
        Ok(task)
    }

    /// Delete a single task.
    ///
    /// # Errors
    /// Returns an error if the task is unknown or the store write fails.
    pub fn delete_task(&self, task_id: TaskId) -> Result<()> {
        if self.store.delete_task(task_id).map_err(Into::into)? {
            Ok(())
        } else {
            Err(anyhow!("Task not found: {task_id}"))
        }
    }

    /// Delete many tasks at once, skipping unknown ids.
    ///
    /// # Errors
    /// Returns an error if a store write fails.
    pub fn delete_tasks(&self, task_ids: &[TaskId]) -> Result<usize> {
        self.store.delete_tasks(task_ids).map_err(Into::into)
    }

    /// Case-insensitive substring search over title and description.
    ///
    /// A blank query returns the unfiltered list.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub fn search_tasks(&self, query: &str) -> Result<Vec<Task>> {
        let tasks = self.list_tasks()?;
        Ok(match TextMatcher::new(query) {
            Some(matcher) => tasks
                .into_iter()
                .filter(|task| matcher.matches(task))
                .collect(),
            None => tasks,
        })
    }

    /// List every task.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks().map_err(Into::into)
    }

    /// List tasks matching the filter.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub fn list_filtered(&self, filter: &TaskFilter, today: Date) -> Result<Vec<Task>> {
        Ok(filter.apply(&self.list_tasks()?, today))
    }

    /// Fetch a single task.
    ///
    /// # Errors
    /// Returns an error if the task is unknown or the store read fails.
    pub fn get_task(&self, task_id: TaskId) -> Result<Task> {
        self.require_task(task_id)
    }

    /// List every category.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories().map_err(Into::into)
    }

    /// Create a category, filling unset fields with the standard defaults.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn create_category(&self, input: CreateCategoryInput) -> Result<Category> {
        let CreateCategoryInput { name, color, icon } = input;
        let name = name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_NAME.to_owned());

        let mut category = Category::new(name);
        if let Some(color) = color {
            category.color = color;
        }
        if let Some(icon) = icon {
            category.icon = icon;
        }

        self.store.create_category(&category).map_err(Into::into)?;
        Ok(category)
    }

    /// Apply a partial update to an existing category.
    ///
    /// # Errors
    /// Returns an error if the category is unknown or the store write fails.
    pub fn update_category(&self, category_id: CategoryId, patch: CategoryPatch) -> Result<Category> {
        let mut category = self.require_category(category_id)?;
        patch.apply_to(&mut category);
        self.store.update_category(&category).map_err(Into::into)?;
        Ok(category)
    }

    /// Delete a category. Tasks keep their reference; the backend owns consistency.
    ///
    /// # Errors
    /// Returns an error if the category is unknown or the store write fails.
    pub fn delete_category(&self, category_id: CategoryId) -> Result<()> {
        if self.store.delete_category(category_id).map_err(Into::into)? {
            Ok(())
        } else {
            Err(anyhow!("Category not found: {category_id}"))
        }
    }

    /// Recompute and write back the denormalized task count of every category.
    ///
    /// # Errors
    /// Returns an error if a store call fails.
    pub fn refresh_category_counts(&self) -> Result<()> {
        let tasks = self.list_tasks()?;
        let per_category = stats::per_category(&tasks);
        for category in self.list_categories()? {
            let count = per_category
                .get(&category.id)
                .map_or(0, |entry| entry.total);
            self.store
                .set_category_task_count(category.id, count)
                .map_err(Into::into)?;
        }
        Ok(())
    }

    /// Resolve the configured default category by name, case-insensitively.
    ///
    /// # Errors
    /// Returns an error if no category carries the configured name.
    pub fn default_category(&self) -> Result<Category> {
        let wanted = self.defaults.category.to_lowercase();
        self.list_categories()?
            .into_iter()
            .find(|category| category.name.to_lowercase() == wanted)
            .ok_or_else(|| {
                anyhow!(
                    "Default category '{}' is not defined",
                    self.defaults.category
                )
            })
    }

    fn require_task(&self, task_id: TaskId) -> Result<Task> {
        self.store
            .get_task(task_id)
            .map_err(Into::into)?
            .ok_or_else(|| anyhow!("Task not found: {task_id}"))
    }

    fn require_category(&self, category_id: CategoryId) -> Result<Category> {
        self.store
            .get_category(category_id)
            .map_err(Into::into)?
            .ok_or_else(|| anyhow!("Category not found: {category_id}"))
    }
}

pub struct CreateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub priority: Option<Priority>,
    pub due_date: Option<Date>,
}

pub struct CreateCategoryInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
