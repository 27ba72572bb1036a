//! Record storage abstraction shared by the service, repository, and UI surfaces.

use anyhow::Error;
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::{Category, Task};
use taskdeck_store_http::HttpStore;
use time::OffsetDateTime;

/// Minimal storage abstraction required by [`TaskService`](crate::service::TaskService)
/// and [`TaskRepository`](crate::task_repository::TaskRepository).
pub trait RecordStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Load every task record.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error>;

    /// Load tasks whose `updated_at` is at or after the given timestamp.
    ///
    /// # Errors
    /// Returns a store-specific error when the query fails.
    fn list_tasks_modified_since(&self, since: OffsetDateTime) -> Result<Vec<Task>, Self::Error>;

    /// Fetch a single task, or `None` when the id is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the lookup fails.
    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;

    /// Persist a new task record.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn create_task(&self, task: &Task) -> Result<(), Self::Error>;

    /// Overwrite an existing task record.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn update_task(&self, task: &Task) -> Result<(), Self::Error>;

    /// Delete a task, reporting whether the record existed.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error>;

    /// Delete many tasks, skipping unknown ids.
    ///
    /// The default implementation iterates over [`delete_task`](Self::delete_task)
    /// and counts the records that actually existed.
    ///
    /// # Errors
    /// Propagates the first error from the underlying store.
    fn delete_tasks(&self, ids: &[TaskId]) -> Result<usize, Self::Error> {
        let mut deleted = 0;
        for &id in ids {
            if self.delete_task(id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Load every category record.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn list_categories(&self) -> Result<Vec<Category>, Self::Error>;

    /// Fetch a single category, or `None` when the id is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the lookup fails.
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error>;

    /// Persist a new category record.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn create_category(&self, category: &Category) -> Result<(), Self::Error>;

    /// Overwrite an existing category record.
    ///
    /// # Errors
    /// Returns a store-specific error when the record cannot be written.
    fn update_category(&self, category: &Category) -> Result<(), Self::Error>;

    /// Delete a category, reporting whether the record existed.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn delete_category(&self, id: CategoryId) -> Result<bool, Self::Error>;

    /// Write the denormalized task count for a category. Unknown ids are ignored.
    ///
    /// The default implementation round-trips through
    /// [`get_category`](Self::get_category) and
    /// [`update_category`](Self::update_category), writing only when the count
    /// actually changed.
    ///
    /// # Errors
    /// Propagates errors from the underlying store.
    fn set_category_task_count(&self, id: CategoryId, count: usize) -> Result<(), Self::Error> {
        let Some(mut category) = self.get_category(id)? else {
            return Ok(());
        };
        if category.task_count != count {
            category.task_count = count;
            self.update_category(&category)?;
        }
        Ok(())
    }
}

impl RecordStore for HttpStore {
    type Error = taskdeck_store_http::HttpStoreError;

    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        Self::list_tasks(self)
    }

    fn list_tasks_modified_since(&self, since: OffsetDateTime) -> Result<Vec<Task>, Self::Error> {
        Self::list_tasks_modified_since(self, since)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Self::get_task(self, id)
    }

    fn create_task(&self, task: &Task) -> Result<(), Self::Error> {
        Self::create_task(self, task)
    }

    fn update_task(&self, task: &Task) -> Result<(), Self::Error> {
        Self::update_task(self, task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        Self::delete_task(self, id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        Self::list_categories(self)
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error> {
        Self::get_category(self, id)
    }

    fn create_category(&self, category: &Category) -> Result<(), Self::Error> {
        Self::create_category(self, category)
    }

    fn update_category(&self, category: &Category) -> Result<(), Self::Error> {
        Self::update_category(self, category)
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, Self::Error> {
        Self::delete_category(self, id)
    }
}

impl<S> RecordStore for &S
where
    S: RecordStore + ?Sized,
{
    type Error = S::Error;

    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        (*self).list_tasks()
    }

    fn list_tasks_modified_since(&self, since: OffsetDateTime) -> Result<Vec<Task>, Self::Error> {
        (*self).list_tasks_modified_since(since)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        (*self).get_task(id)
    }

    fn create_task(&self, task: &Task) -> Result<(), Self::Error> {
        (*self).create_task(task)
    }

    fn update_task(&self, task: &Task) -> Result<(), Self::Error> {
        (*self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        (*self).delete_task(id)
    }

    fn delete_tasks(&self, ids: &[TaskId]) -> Result<usize, Self::Error> {
        (*self).delete_tasks(ids)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        (*self).list_categories()
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error> {
        (*self).get_category(id)
    }

    fn create_category(&self, category: &Category) -> Result<(), Self::Error> {
        (*self).create_category(category)
    }

    fn update_category(&self, category: &Category) -> Result<(), Self::Error> {
        (*self).update_category(category)
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, Self::Error> {
        (*self).delete_category(id)
    }

    fn set_category_task_count(&self, id: CategoryId, count: usize) -> Result<(), Self::Error> {
        (*self).set_category_task_count(id, count)
    }
}

impl<S> RecordStore for std::sync::Arc<S>
where
    S: RecordStore,
{
    type Error = S::Error;

    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).list_tasks()
    }

    fn list_tasks_modified_since(&self, since: OffsetDateTime) -> Result<Vec<Task>, Self::Error> {
        (**self).list_tasks_modified_since(since)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        (**self).get_task(id)
    }

    fn create_task(&self, task: &Task) -> Result<(), Self::Error> {
        (**self).create_task(task)
    }

    fn update_task(&self, task: &Task) -> Result<(), Self::Error> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        (**self).delete_task(id)
    }

    fn delete_tasks(&self, ids: &[TaskId]) -> Result<usize, Self::Error> {
        (**self).delete_tasks(ids)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        (**self).list_categories()
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error> {
        (**self).get_category(id)
    }

    fn create_category(&self, category: &Category) -> Result<(), Self::Error> {
        (**self).create_category(category)
    }

    fn update_category(&self, category: &Category) -> Result<(), Self::Error> {
        (**self).update_category(category)
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, Self::Error> {
        (**self).delete_category(id)
    }

    fn set_category_task_count(&self, id: CategoryId, count: usize) -> Result<(), Self::Error> {
        (**self).set_category_task_count(id, count)
    }
}
