//! Task repository with caching for efficient record access.

use anyhow::{Result, anyhow};
use std::sync::{Arc, RwLock};
use taskdeck_core::{Task, TaskFilter, id::TaskId};
use time::{Date, Duration, OffsetDateTime};
use tracing::debug;

use crate::store::RecordStore;
use crate::task_cache::TaskCache;

/// Cached records are served as-is for this long before the store is consulted again.
const STALE_AFTER: Duration = Duration::seconds(2);

/// Repository that caches task records and provides efficient access.
pub struct TaskRepository<S> {
    store: Arc<S>,
    cache: Arc<RwLock<CacheState>>,
}

struct CacheState {
    cache: TaskCache,
    /// Newest `updated_at` seen so far; lower bound for incremental fetches.
    last_refresh: Option<OffsetDateTime>,
    /// When the store was last consulted.
    checked_at: Option<OffsetDateTime>,
}

impl<S: RecordStore> TaskRepository<S> {
    /// Create a new repository wrapping the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(CacheState {
                cache: TaskCache::default(),
                last_refresh: None,
                checked_at: None,
            })),
        }
    }

    /// Refresh the cache if it's stale.
    ///
    /// # Errors
    /// Returns an error if loading tasks from the store fails.
    pub fn refresh_if_stale(&self) -> Result<()> {
        self.refresh_at(OffsetDateTime::now_utc())
    }

    fn refresh_at(&self, now: OffsetDateTime) -> Result<()> {
        enum RefreshPlan {
            Fresh,
            Full,
            Incremental(OffsetDateTime),
        }

        let plan = {
            let state = self.cache.read().map_err(|_| anyhow!("Failed to lock cache"))?;
            if state
                .checked_at
                .is_some_and(|checked| now - checked < STALE_AFTER)
            {
                RefreshPlan::Fresh
            } else {
                state
                    .last_refresh
                    .map_or(RefreshPlan::Full, RefreshPlan::Incremental)
            }
        };

        match plan {
            RefreshPlan::Fresh => {}
            RefreshPlan::Full => {
                debug!("Loading full task cache");
                let cache = TaskCache::load(&*self.store).map_err(Into::into)?;
                let mut state = self.cache.write().map_err(|_| anyhow!("Failed to lock cache"))?;
                let latest_ts = cache
                    .newest_updated_at()
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH);
                state.cache = cache;
                state.last_refresh = Some(latest_ts);
                state.checked_at = Some(now);
            }
            RefreshPlan::Incremental(last_refresh) => {
                debug!(%last_refresh, "Fetching tasks modified since last refresh");
                let modified = self
                    .store
                    .list_tasks_modified_since(last_refresh)
                    .map_err(Into::into)?;
                let mut state = self.cache.write().map_err(|_| anyhow!("Failed to lock cache"))?;
                state.checked_at = Some(now);
                if modified.is_empty() {
                    return Ok(());
                }
                let latest_seen = modified
                    .iter()
                    .map(|task| task.updated_at)
                    .max()
                    .unwrap_or(last_refresh);
                state.cache.upsert_tasks(modified);
                let previous = state.last_refresh.unwrap_or(last_refresh);
                state.last_refresh = Some(previous.max(latest_seen));
            }
        }
        Ok(())
    }

    /// List all tasks, optionally filtered.
    ///
    /// # Errors
    /// Returns an error if refreshing the cache fails.
    pub fn list(&self, filter: Option<&TaskFilter>, today: Date) -> Result<Vec<Task>> {
        self.refresh_if_stale()?;

        let state = self.cache.read().map_err(|_| anyhow!("Failed to lock cache"))?;

        Ok(filter.map_or_else(
            || state.cache.tasks.clone(),
            |f| state.cache.filtered(f, today),
        ))
    }

    /// Get a single task by ID.
    ///
    /// # Errors
    /// Returns an error if the task is not found or refreshing fails.
    pub fn get(&self, task_id: TaskId) -> Result<Task> {
        self.refresh_if_stale()?;

        let state = self.cache.read().map_err(|_| anyhow!("Failed to lock cache"))?;

        state
            .cache
            .get(task_id)
            .cloned()
            .ok_or_else(|| anyhow!("Task not found: {task_id}"))
    }

    /// Patch a mutated task into the cache without waiting for a refresh.
    ///
    /// # Errors
    /// Returns an error if the cache lock cannot be acquired.
    pub fn upsert(&self, task: Task) -> Result<()> {
        let mut state = self.cache.write().map_err(|_| anyhow!("Failed to lock cache"))?;
        state.cache.upsert_tasks(vec![task]);
        drop(state);
        Ok(())
    }

    /// Drop deleted tasks from the cache.
    ///
    /// # Errors
    /// Returns an error if the cache lock cannot be acquired.
    pub fn remove(&self, task_ids: &[TaskId]) -> Result<()> {
        let mut state = self.cache.write().map_err(|_| anyhow!("Failed to lock cache"))?;
        state.cache.remove_tasks(task_ids);
        drop(state);
        Ok(())
    }

    /// Clear the cache, forcing a full reload on next access.
    ///
    /// # Errors
    /// Returns an error if the cache lock cannot be acquired.
    pub fn clear_cache(&self) -> Result<()> {
        let mut state = self.cache.write().map_err(|_| anyhow!("Failed to lock cache"))?;

        state.cache = TaskCache::default();
        state.last_refresh = None;
        state.checked_at = None;
        drop(state);
        Ok(())
    }
}
