use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};
use taskdeck_app::{RecordStore, TaskRepository, TaskService};
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::stats::weekly_activity;
use taskdeck_core::{Category, DayActivity, Task, TaskFilter, UserStats};
use time::OffsetDateTime;

use super::constants::UI_MESSAGE_TTL_SECS;
use super::editor::{CategoryFormState, InputState, TaskFormState};

/// Pane that reacts to navigation keys while no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    /// Category sidebar on the left.
    Categories,
    /// Task list in the middle column.
    Tasks,
}

/// Modal overlay drawn on top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Overlay {
    None,
    /// Task create/edit form.
    TaskForm,
    /// Category create form.
    CategoryForm,
    /// Delete confirmation prompt.
    ConfirmDelete,
    /// Free-text search prompt.
    Search,
    /// Read-only task detail viewer.
    Detail,
}

#[derive(Debug, Clone)]
pub(super) struct ConfirmDeleteState {
    pub(super) task_id: TaskId,
    pub(super) title: String,
}

#[derive(Debug, Clone)]
pub(super) struct DetailViewerState {
    pub(super) task_id: TaskId,
    pub(super) scroll_offset: u16,
}

pub(super) struct Ui<S: RecordStore> {
    pub(super) service: TaskService<S>,
    pub(super) repository: TaskRepository<S>,
    /// Tasks matching the active filter, newest first.
    pub(super) tasks: Vec<Task>,
    pub(super) categories: Vec<Category>,
    pub(super) stats: UserStats,
    pub(super) weekly: Vec<DayActivity>,
    pub(super) filter: TaskFilter,
    pub(super) focus: Focus,
    pub(super) overlay: Overlay,
    /// Index into `tasks`.
    pub(super) task_cursor: usize,
    /// Index into the sidebar; 0 selects "All", category N sits at N + 1.
    pub(super) category_cursor: usize,
    pub(super) task_form: Option<TaskFormState>,
    pub(super) category_form: Option<CategoryFormState>,
    pub(super) confirm_delete: Option<ConfirmDeleteState>,
    pub(super) search: Option<InputState>,
    pub(super) detail: Option<DetailViewerState>,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
    /// Latch so a flaky backend produces one error message, not one per tick.
    pub(super) refresh_failed: bool,
}

impl<S: RecordStore> Ui<S> {
    pub(super) const FILTER_HEIGHT: u16 = 3;
    pub(super) const MAIN_MIN_HEIGHT: u16 = 8;
    pub(super) const STATUS_HEIGHT: u16 = 3;
    pub(super) const SIDEBAR_PERCENT: u16 = 24;
    pub(super) const TASKS_PERCENT: u16 = 44;
    pub(super) const STATS_PERCENT: u16 = 32;

    pub(super) fn new(service: TaskService<S>, repository: TaskRepository<S>) -> Self {
        let today = OffsetDateTime::now_utc().date();
        let mut ui = Self {
            service,
            repository,
            tasks: Vec::new(),
            categories: Vec::new(),
            stats: UserStats::from_tasks(&[], today),
            weekly: weekly_activity(&[], today),
            filter: TaskFilter::new(),
            focus: Focus::Tasks,
            overlay: Overlay::None,
            task_cursor: 0,
            category_cursor: 0,
            task_form: None,
            category_form: None,
            confirm_delete: None,
            search: None,
            detail: None,
            message: None,
            should_quit: false,
            refresh_failed: false,
        };
        ui.refresh_tasks();
        ui.refresh_categories();
        ui
    }

    /// Pull the latest snapshot from the repository and recompute stats,
    /// keeping the selection on `preferred` when it is still visible.
    ///
    /// Failures keep the previous data and surface once as a status message.
    pub(super) fn refresh_tasks_with(&mut self, preferred: Option<TaskId>) {
        let today = OffsetDateTime::now_utc().date();
        match self.repository.list(None, today) {
            Ok(all) => {
                self.stats = UserStats::from_tasks(&all, today);
                self.weekly = weekly_activity(&all, today);
                self.tasks = if self.filter.is_empty() {
                    all
                } else {
                    self.filter.apply(&all, today)
                };
                self.task_cursor = preferred
                    .and_then(|id| self.tasks.iter().position(|task| task.id == id))
                    .unwrap_or_else(|| self.task_cursor.min(self.tasks.len().saturating_sub(1)));
                self.refresh_failed = false;
            }
            Err(err) => {
                if !self.refresh_failed {
                    self.error(format!("Failed to load tasks: {err}"));
                }
                self.refresh_failed = true;
            }
        }
    }

    pub(super) fn refresh_tasks(&mut self) {
        let keep = self.selected_task().map(|task| task.id);
        self.refresh_tasks_with(keep);
    }

    pub(super) fn refresh_categories(&mut self) {
        match self.service.list_categories() {
            Ok(categories) => {
                self.categories = categories;
                if self.category_cursor > self.categories.len() {
                    self.category_cursor = self.categories.len();
                }
            }
            Err(err) => self.error(format!("Failed to load categories: {err}")),
        }
    }

    /// Recompute denormalized per-category task counts after a mutation.
    pub(super) fn refresh_counts(&mut self) {
        if let Err(err) = self.service.refresh_category_counts() {
            self.error(format!("Failed to refresh category counts: {err}"));
            return;
        }
        self.refresh_categories();
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.task_cursor)
    }

    /// Category picked in the sidebar, `None` for the "All" entry.
    pub(super) fn selected_category_id(&self) -> Option<CategoryId> {
        if self.category_cursor == 0 {
            return None;
        }
        self.categories
            .get(self.category_cursor - 1)
            .map(|category| category.id)
    }

    pub(super) fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    /// Narrow the task list to the category picked in the sidebar.
    pub(super) fn apply_category_selection(&mut self) {
        self.filter.category = self.selected_category_id();
        self.refresh_tasks();
    }

    pub(super) fn pane_border(&self, pane: Focus) -> Style {
        if self.focus == pane && self.overlay == Overlay::None {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Self::FILTER_HEIGHT),
                Constraint::Min(Self::MAIN_MIN_HEIGHT),
                Constraint::Length(Self::STATUS_HEIGHT),
            ])
            .split(f.area());

        self.draw_filter_bar(f, chunks[0]);
        self.draw_main(f, chunks[1]);
        self.draw_status(f, chunks[2]);

        // Draw overlays on top if active
        match self.overlay {
            Overlay::TaskForm => self.draw_task_form_popup(f),
            Overlay::CategoryForm => self.draw_category_form_popup(f),
            Overlay::ConfirmDelete => self.draw_confirm_popup(f),
            Overlay::Search => self.draw_search_popup(f),
            Overlay::Detail => self.draw_detail_popup(f),
            Overlay::None => {}
        }
    }

    fn draw_main(&self, f: &mut Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(Self::SIDEBAR_PERCENT),
                Constraint::Percentage(Self::TASKS_PERCENT),
                Constraint::Percentage(Self::STATS_PERCENT),
            ])
            .split(area);

        self.draw_sidebar(f, columns[0]);
        self.draw_task_list(f, columns[1]);
        self.draw_stats(f, columns[2]);
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
        self.refresh_tasks();
    }
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
