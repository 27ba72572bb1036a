//! Shared task cache utilities reused by the CLI and TUI.

use std::cmp::Ordering;
use std::collections::HashMap;

use taskdeck_core::id::TaskId;
use taskdeck_core::{Task, TaskFilter};
use time::{Date, OffsetDateTime};

use crate::store::RecordStore;

/// Cached task records and their id index.
#[derive(Debug, Default, Clone)]
pub struct TaskCache {
    /// Tasks sorted by `updated_at` descending, id ascending as tiebreak.
    pub tasks: Vec<Task>,
    /// Mapping from task id to index into [`tasks`](Self::tasks).
    pub task_index: HashMap<TaskId, usize>,
}

impl TaskCache {
    /// Load every task from the store and build the index.
    ///
    /// # Errors
    ///
    /// Propagates store-specific read failures.
    pub fn load<S>(store: &S) -> Result<Self, S::Error>
    where
        S: RecordStore,
    {
        Ok(Self::from_tasks(store.list_tasks()?))
    }

    /// Build a cache from already-fetched records.
    #[must_use]
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        Self::sort_tasks(&mut tasks);
        let mut cache = Self {
            tasks,
            task_index: HashMap::new(),
        };
        cache.rebuild_index();
        cache
    }

    fn sort_tasks(tasks: &mut [Task]) {
        tasks.sort_by(Self::compare_tasks);
    }

    fn compare_tasks(a: &Task, b: &Task) -> Ordering {
        b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id))
    }

    /// Upsert records, replacing cached entries with matching ids.
    pub fn upsert_tasks(&mut self, tasks: Vec<Task>) {
        if tasks.is_empty() {
            return;
        }

        for task in tasks {
            if let Some(&idx) = self.task_index.get(&task.id) {
                self.tasks[idx] = task;
            } else {
                self.tasks.push(task);
            }
        }

        Self::sort_tasks(&mut self.tasks);
        self.rebuild_index();
    }

    /// Drop records with the given ids.
    pub fn remove_tasks(&mut self, ids: &[TaskId]) {
        if ids.is_empty() {
            return;
        }
        self.tasks.retain(|task| !ids.contains(&task.id));
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.task_index.clear();
        for (idx, task) in self.tasks.iter().enumerate() {
            self.task_index.insert(task.id, idx);
        }
    }

    /// Fetch a cached task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.task_index.get(&id).and_then(|&idx| self.tasks.get(idx))
    }

    /// Return tasks matching the provided filter, preserving recency order.
    #[must_use]
    pub fn filtered(&self, filter: &TaskFilter, today: Date) -> Vec<Task> {
        filter.apply(&self.tasks, today)
    }

    /// Timestamp of the most recently updated record, if any.
    #[must_use]
    pub fn newest_updated_at(&self) -> Option<OffsetDateTime> {
        self.tasks.first().map(|task| task.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use taskdeck_core::id::CategoryId;
    use taskdeck_core::Priority;

    use super::*;

    fn fixed_task_id(n: u8) -> TaskId {
        TaskId::from_str(&format!("00000000-0000-0000-0000-0000000000{n:02}"))
            .unwrap_or_else(|err| panic!("must parse task id: {err}"))
    }

    fn ts(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(secs)
            .unwrap_or_else(|err| panic!("must convert unix timestamp: {err}"))
    }

    fn task(id: TaskId, secs: i64, title: &str) -> Task {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            category_id: CategoryId::new(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            created_at: ts(secs),
            updated_at: ts(secs),
        }
    }

    #[test]
    fn from_tasks_sorts_by_latest_update() {
        let first = fixed_task_id(1);
        let second = fixed_task_id(2);
        let third = fixed_task_id(3);

        let cache = TaskCache::from_tasks(vec![
            task(first, 10, "first"),
            task(second, 30, "second"),
            task(third, 20, "third"),
        ]);

        let ids: Vec<TaskId> = cache.tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![second, third, first]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id_order() {
        let first = fixed_task_id(1);
        let second = fixed_task_id(2);

        let cache = TaskCache::from_tasks(vec![task(second, 10, "b"), task(first, 10, "a")]);
        let ids: Vec<TaskId> = cache.tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn upsert_replaces_existing_entries() {
        let first = fixed_task_id(40);
        let second = fixed_task_id(41);
        let mut cache = TaskCache::from_tasks(vec![task(first, 5, "first"), task(second, 6, "second")]);

        cache.upsert_tasks(vec![task(first, 10, "first-updated")]);

        assert_eq!(cache.tasks.len(), 2);
        let updated = cache.get(first).unwrap_or_else(|| panic!("must keep task"));
        assert_eq!(updated.title, "first-updated");
        assert_eq!(cache.tasks[0].id, first);
    }

    #[test]
    fn upsert_inserts_unknown_entries() {
        let known = fixed_task_id(50);
        let fresh = fixed_task_id(51);
        let mut cache = TaskCache::from_tasks(vec![task(known, 5, "known")]);

        cache.upsert_tasks(vec![task(fresh, 9, "fresh")]);

        assert_eq!(cache.tasks.len(), 2);
        assert_eq!(cache.tasks[0].id, fresh);
        assert_eq!(cache.task_index.len(), 2);
    }

    #[test]
    fn remove_drops_records_and_reindexes() {
        let first = fixed_task_id(60);
        let second = fixed_task_id(61);
        let mut cache = TaskCache::from_tasks(vec![task(first, 5, "first"), task(second, 6, "second")]);

        cache.remove_tasks(&[first]);

        assert!(cache.get(first).is_none());
        assert_eq!(cache.task_index.get(&second), Some(&0));
    }

    #[test]
    fn filtered_applies_task_filter() {
        let todo = fixed_task_id(30);
        let done = fixed_task_id(31);
        let mut completed = task(done, 10, "done task");
        completed.completed = true;

        let cache = TaskCache::from_tasks(vec![task(todo, 5, "todo task"), completed]);

        let filter = TaskFilter {
            text: Some("done".into()),
            ..TaskFilter::default()
        };
        let today = ts(20).date();

        let filtered = cache.filtered(&filter, today);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, done);
    }

    #[test]
    fn newest_updated_at_tracks_head_of_cache() {
        assert_eq!(TaskCache::default().newest_updated_at(), None);

        let cache = TaskCache::from_tasks(vec![
            task(fixed_task_id(1), 10, "old"),
            task(fixed_task_id(2), 99, "new"),
        ]);
        assert_eq!(cache.newest_updated_at(), Some(ts(99)));
    }
}
