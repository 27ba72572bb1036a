use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use taskdeck_app::RecordStore;
use taskdeck_core::{DueBucket, Priority, StatusFilter, TaskFilter};

use super::super::view::{ConfirmDeleteState, DetailViewerState, Focus, Overlay, Ui};

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.overlay {
            Overlay::None => self.handle_browse_key(key),
            Overlay::TaskForm => self.handle_task_form_key(key),
            Overlay::CategoryForm => self.handle_category_form_key(key),
            Overlay::ConfirmDelete => self.handle_confirm_key(key),
            Overlay::Search => self.handle_search_key(key),
            Overlay::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j' | 'J') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k' | 'K') => self.select_prev(),
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h' | 'H' | 'l' | 'L') => self.toggle_focus(),
            KeyCode::Enter => match self.focus {
                Focus::Categories => self.apply_category_selection(),
                Focus::Tasks => self.open_detail(),
            },
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('n' | 'N') => self.open_create_form(),
            KeyCode::Char('e' | 'E') => self.open_edit_form(),
            KeyCode::Char('d' | 'D') => self.request_delete(),
            KeyCode::Char('/') => self.open_search(),
            KeyCode::Char('p' | 'P') => self.cycle_priority_filter(),
            KeyCode::Char('u' | 'U') => self.cycle_due_filter(),
            KeyCode::Char('s' | 'S') => self.cycle_status_filter(),
            KeyCode::Char('c' | 'C') => self.clear_filters(),
            KeyCode::Char('r' | 'R') => self.refresh_from_store(),
            _ => {}
        }
    }

    fn select_next(&mut self) {
        match self.focus {
            Focus::Tasks => {
                if self.task_cursor + 1 < self.tasks.len() {
                    self.task_cursor += 1;
                }
            }
            Focus::Categories => {
                if self.category_cursor < self.categories.len() {
                    self.category_cursor += 1;
                }
            }
        }
    }

    const fn select_prev(&mut self) {
        match self.focus {
            Focus::Tasks => self.task_cursor = self.task_cursor.saturating_sub(1),
            Focus::Categories => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
            }
        }
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Categories => Focus::Tasks,
            Focus::Tasks => Focus::Categories,
        };
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            self.error("No task is selected");
            return;
        };
        let id = task.id;
        match self.service.toggle_complete(id) {
            Ok(task) => {
                let note = if task.completed {
                    format!("Completed '{}'", task.title)
                } else {
                    format!("Reopened '{}'", task.title)
                };
                if let Err(err) = self.repository.upsert(task) {
                    self.error(format!("Failed to update the local snapshot: {err}"));
                    return;
                }
                self.refresh_tasks_with(Some(id));
                self.info(note);
            }
            Err(err) => self.error(format!("Failed to toggle the task: {err}")),
        }
    }

    fn request_delete(&mut self) {
        if self.focus != Focus::Tasks {
            return;
        }
        let Some(task) = self.selected_task() else {
            self.error("No task is selected");
            return;
        };
        self.confirm_delete = Some(ConfirmDeleteState {
            task_id: task.id,
            title: task.title.clone(),
        });
        self.overlay = Overlay::ConfirmDelete;
    }

    /// Drop the cached snapshot and pull fresh data from the backend.
    fn refresh_from_store(&mut self) {
        if let Err(err) = self.repository.clear_cache() {
            self.error(format!("Failed to reset the local snapshot: {err}"));
            return;
        }
        self.refresh_tasks();
        self.refresh_categories();
        if !self.refresh_failed {
            self.info("Reloaded from the backend");
        }
    }

    fn cycle_priority_filter(&mut self) {
        self.filter.priority = match self.filter.priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        };
        self.refresh_tasks();
    }

    fn cycle_due_filter(&mut self) {
        self.filter.due = match self.filter.due {
            None => Some(DueBucket::Today),
            Some(DueBucket::Today) => Some(DueBucket::Overdue),
            Some(DueBucket::Overdue) => Some(DueBucket::Upcoming),
            Some(DueBucket::Upcoming) => None,
        };
        self.refresh_tasks();
    }

    fn cycle_status_filter(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(StatusFilter::Pending),
            Some(StatusFilter::Pending) => Some(StatusFilter::Completed),
            Some(StatusFilter::Completed) => None,
        };
        self.refresh_tasks();
    }

    fn clear_filters(&mut self) {
        self.filter = TaskFilter::new();
        self.category_cursor = 0;
        self.refresh_tasks();
    }

    pub(in crate::tui) fn open_detail(&mut self) {
        let Some(task) = self.selected_task() else {
            self.error("No task is selected");
            return;
        };
        self.detail = Some(DetailViewerState {
            task_id: task.id,
            scroll_offset: 0,
        });
        self.overlay = Overlay::Detail;
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | 'Q') => self.close_detail(),
            KeyCode::Down | KeyCode::Char('j' | 'J') => self.detail_scroll_down(1),
            KeyCode::Up | KeyCode::Char('k' | 'K') => self.detail_scroll_up(1),
            KeyCode::PageDown => self.detail_scroll_down(10),
            KeyCode::PageUp => self.detail_scroll_up(10),
            _ => {}
        }
    }

    const fn close_detail(&mut self) {
        self.detail = None;
        self.overlay = Overlay::None;
    }

    const fn detail_scroll_down(&mut self, lines: u16) {
        if let Some(viewer) = &mut self.detail {
            viewer.scroll_offset = viewer.scroll_offset.saturating_add(lines);
        }
    }

    const fn detail_scroll_up(&mut self, lines: u16) {
        if let Some(viewer) = &mut self.detail {
            viewer.scroll_offset = viewer.scroll_offset.saturating_sub(lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Error;
    use crossterm::event::KeyModifiers;
    use taskdeck_app::{DefaultsConfig, TaskRepository, TaskService};
    use taskdeck_core::id::{CategoryId, TaskId};
    use taskdeck_core::{Category, Task};
    use time::OffsetDateTime;

    use super::*;
    use crate::tui::view::MessageLevel;

    #[derive(Clone)]
    struct EmptyStore;

    impl RecordStore for EmptyStore {
        type Error = Error;

        fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
            Ok(Vec::new())
        }

        fn list_tasks_modified_since(
            &self,
            _since: OffsetDateTime,
        ) -> Result<Vec<Task>, Self::Error> {
            Ok(Vec::new())
        }

        fn get_task(&self, _id: TaskId) -> Result<Option<Task>, Self::Error> {
            Ok(None)
        }

        fn create_task(&self, _task: &Task) -> Result<(), Self::Error> {
            Ok(())
        }

        fn update_task(&self, _task: &Task) -> Result<(), Self::Error> {
            Ok(())
        }

        fn delete_task(&self, _id: TaskId) -> Result<bool, Self::Error> {
            Ok(false)
        }

        fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
            Ok(Vec::new())
        }

        fn get_category(&self, _id: CategoryId) -> Result<Option<Category>, Self::Error> {
            Ok(None)
        }

        fn create_category(&self, _category: &Category) -> Result<(), Self::Error> {
            Ok(())
        }

        fn update_category(&self, _category: &Category) -> Result<(), Self::Error> {
            Ok(())
        }

        fn delete_category(&self, _id: CategoryId) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }

    fn test_ui() -> Ui<EmptyStore> {
        let service = TaskService::new(EmptyStore, DefaultsConfig::default());
        let repository = TaskRepository::new(Arc::new(EmptyStore));
        Ui::new(service, repository)
    }

    fn seed_task(ui: &mut Ui<EmptyStore>) -> TaskId {
        let task = Task::new("task", Category::new("inbox").id, OffsetDateTime::UNIX_EPOCH);
        let id = task.id;
        ui.tasks = vec![task];
        ui.task_cursor = 0;
        id
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quits_on_q_key() {
        let mut ui = test_ui();
        ui.handle_key(key(KeyCode::Char('q')));
        assert!(ui.should_quit);
    }

    #[test]
    fn ignores_key_release_events() {
        let mut ui = test_ui();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        ui.handle_key(release);
        assert!(!ui.should_quit);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut ui = test_ui();
        let now = OffsetDateTime::UNIX_EPOCH;
        let category = Category::new("inbox");
        ui.tasks = vec![
            Task::new("one", category.id, now),
            Task::new("two", category.id, now),
        ];

        ui.handle_key(key(KeyCode::Down));
        assert_eq!(ui.task_cursor, 1);
        ui.handle_key(key(KeyCode::Down));
        assert_eq!(ui.task_cursor, 1);
        ui.handle_key(key(KeyCode::Up));
        ui.handle_key(key(KeyCode::Up));
        assert_eq!(ui.task_cursor, 0);
    }

    #[test]
    fn tab_switches_the_focused_pane() {
        let mut ui = test_ui();
        assert_eq!(ui.focus, Focus::Tasks);
        ui.handle_key(key(KeyCode::Tab));
        assert_eq!(ui.focus, Focus::Categories);
        ui.handle_key(key(KeyCode::Tab));
        assert_eq!(ui.focus, Focus::Tasks);
    }

    #[test]
    fn detail_viewer_opens_scrolls_and_closes() {
        let mut ui = test_ui();
        let id = seed_task(&mut ui);

        ui.handle_key(key(KeyCode::Enter));
        assert_eq!(ui.overlay, Overlay::Detail);
        assert_eq!(ui.detail.as_ref().map(|viewer| viewer.task_id), Some(id));

        ui.handle_key(key(KeyCode::PageDown));
        assert_eq!(
            ui.detail.as_ref().map(|viewer| viewer.scroll_offset),
            Some(10),
        );
        ui.handle_key(key(KeyCode::Up));
        assert_eq!(
            ui.detail.as_ref().map(|viewer| viewer.scroll_offset),
            Some(9),
        );

        ui.handle_key(key(KeyCode::Esc));
        assert_eq!(ui.overlay, Overlay::None);
        assert!(ui.detail.is_none());
        assert!(!ui.should_quit);
    }

    #[test]
    fn priority_filter_cycles_through_all_levels() {
        let mut ui = test_ui();
        ui.handle_key(key(KeyCode::Char('p')));
        assert_eq!(ui.filter.priority, Some(Priority::Low));
        ui.handle_key(key(KeyCode::Char('p')));
        assert_eq!(ui.filter.priority, Some(Priority::Medium));
        ui.handle_key(key(KeyCode::Char('p')));
        assert_eq!(ui.filter.priority, Some(Priority::High));
        ui.handle_key(key(KeyCode::Char('p')));
        assert_eq!(ui.filter.priority, None);
    }

    #[test]
    fn due_and_status_filters_cycle_back_to_none() {
        let mut ui = test_ui();
        ui.handle_key(key(KeyCode::Char('u')));
        assert_eq!(ui.filter.due, Some(DueBucket::Today));
        ui.handle_key(key(KeyCode::Char('u')));
        ui.handle_key(key(KeyCode::Char('u')));
        ui.handle_key(key(KeyCode::Char('u')));
        assert_eq!(ui.filter.due, None);

        ui.handle_key(key(KeyCode::Char('s')));
        assert_eq!(ui.filter.status, Some(StatusFilter::Pending));
        ui.handle_key(key(KeyCode::Char('s')));
        assert_eq!(ui.filter.status, Some(StatusFilter::Completed));
        ui.handle_key(key(KeyCode::Char('s')));
        assert_eq!(ui.filter.status, None);
    }

    #[test]
    fn clear_key_resets_filters_and_category() {
        let mut ui = test_ui();
        ui.handle_key(key(KeyCode::Char('p')));
        ui.handle_key(key(KeyCode::Char('s')));
        ui.category_cursor = 1;

        ui.handle_key(key(KeyCode::Char('c')));
        assert!(ui.filter.is_empty());
        assert_eq!(ui.category_cursor, 0);
    }

    #[test]
    fn toggle_without_selection_reports_an_error() {
        let mut ui = test_ui();
        ui.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(
            ui.message.as_ref().map(|msg| msg.text.as_str()),
            Some("No task is selected"),
        );
        assert_eq!(
            ui.message.as_ref().map(|msg| msg.level),
            Some(MessageLevel::Error),
        );
    }

    #[test]
    fn delete_key_asks_for_confirmation() {
        let mut ui = test_ui();
        let id = seed_task(&mut ui);
        ui.handle_key(key(KeyCode::Char('d')));
        assert_eq!(ui.overlay, Overlay::ConfirmDelete);
        assert_eq!(
            ui.confirm_delete.as_ref().map(|confirm| confirm.task_id),
            Some(id),
        );
    }
}
