use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_app::{DefaultsConfig, RecordStore, TaskRepository, TaskService};
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::{Category, Priority, Task};
use time::OffsetDateTime;

use super::view::{Focus, MessageLevel, Overlay, Ui};

#[derive(Clone, Default)]
struct MockStore {
    inner: Arc<MockStoreInner>,
}

#[derive(Default)]
struct MockStoreInner {
    tasks: Mutex<Vec<Task>>,
    categories: Mutex<Vec<Category>>,
}

impl RecordStore for MockStore {
    type Error = anyhow::Error;

    fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(guard(&self.inner.tasks).clone())
    }

    fn list_tasks_modified_since(&self, since: OffsetDateTime) -> Result<Vec<Task>, Self::Error> {
        Ok(guard(&self.inner.tasks)
            .iter()
            .filter(|task| task.updated_at >= since)
            .cloned()
            .collect())
    }

    fn get_task(&self, task_id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(guard(&self.inner.tasks)
            .iter()
            .find(|task| task.id == task_id)
            .cloned())
    }

    fn create_task(&self, task: &Task) -> Result<(), Self::Error> {
        guard(&self.inner.tasks).push(task.clone());
        Ok(())
    }

    fn update_task(&self, task: &Task) -> Result<(), Self::Error> {
        let mut tasks = guard(&self.inner.tasks);
        let slot = tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| anyhow!("unknown task {}", task.id))?;
        *slot = task.clone();
        Ok(())
    }

    fn delete_task(&self, task_id: TaskId) -> Result<bool, Self::Error> {
        let mut tasks = guard(&self.inner.tasks);
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        Ok(tasks.len() < before)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        Ok(guard(&self.inner.categories).clone())
    }

    fn get_category(&self, category_id: CategoryId) -> Result<Option<Category>, Self::Error> {
        Ok(guard(&self.inner.categories)
            .iter()
            .find(|category| category.id == category_id)
            .cloned())
    }

    fn create_category(&self, category: &Category) -> Result<(), Self::Error> {
        guard(&self.inner.categories).push(category.clone());
        Ok(())
    }

    fn update_category(&self, category: &Category) -> Result<(), Self::Error> {
        let mut categories = guard(&self.inner.categories);
        let slot = categories
            .iter_mut()
            .find(|stored| stored.id == category.id)
            .ok_or_else(|| anyhow!("unknown category {}", category.id))?;
        *slot = category.clone();
        Ok(())
    }

    fn delete_category(&self, category_id: CategoryId) -> Result<bool, Self::Error> {
        let mut categories = guard(&self.inner.categories);
        let before = categories.len();
        categories.retain(|category| category.id != category_id);
        Ok(categories.len() < before)
    }
}

impl MockStore {
    fn tasks(&self) -> Vec<Task> {
        guard(&self.inner.tasks).clone()
    }

    fn push_category(&self, name: &str) -> CategoryId {
        let category = Category::new(name);
        let id = category.id;
        guard(&self.inner.categories).push(category);
        id
    }

    fn push_task(&self, title: &str, category_id: CategoryId) -> TaskId {
        let task = Task::new(title, category_id, OffsetDateTime::now_utc());
        let id = task.id;
        guard(&self.inner.tasks).push(task);
        id
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ui_with_store() -> (Ui<MockStore>, MockStore) {
    let store = MockStore::default();
    store.push_category("personal");
    let service = TaskService::new(store.clone(), DefaultsConfig::default());
    let repository = TaskRepository::new(Arc::new(store.clone()));
    (Ui::new(service, repository), store)
}

fn press(ui: &mut Ui<MockStore>, code: KeyCode) {
    ui.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(ui: &mut Ui<MockStore>, text: &str) {
    for ch in text.chars() {
        press(ui, KeyCode::Char(ch));
    }
}

fn message_text(ui: &Ui<MockStore>) -> Option<&str> {
    ui.message.as_ref().map(|msg| msg.text.as_str())
}

#[test]
fn startup_loads_tasks_and_categories() {
    let store = MockStore::default();
    let personal = store.push_category("personal");
    store.push_task("existing", personal);

    let service = TaskService::new(store.clone(), DefaultsConfig::default());
    let repository = TaskRepository::new(Arc::new(store));
    let ui = Ui::new(service, repository);

    assert_eq!(ui.tasks.len(), 1);
    assert_eq!(ui.categories.len(), 1);
    assert_eq!(ui.stats.total_tasks, 1);
    assert!(ui.message.is_none());
}

#[test]
fn quick_add_flow_creates_a_task() {
    let (mut ui, store) = ui_with_store();

    press(&mut ui, KeyCode::Char('n'));
    assert_eq!(ui.overlay, Overlay::TaskForm);

    type_text(&mut ui, "Water plants");
    press(&mut ui, KeyCode::Enter);

    assert_eq!(ui.overlay, Overlay::None);
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Water plants");
    assert_eq!(tasks[0].priority, Priority::Medium);
    assert_eq!(ui.tasks.len(), 1);
    assert_eq!(message_text(&ui), Some("Created 'Water plants'"));
    assert_eq!(ui.stats.total_tasks, 1);
}

#[test]
fn form_with_bad_due_date_reopens_with_an_error() {
    let (mut ui, store) = ui_with_store();

    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "Trip");
    press(&mut ui, KeyCode::Tab);
    press(&mut ui, KeyCode::Tab);
    type_text(&mut ui, "someday");
    press(&mut ui, KeyCode::Enter);

    // The form stays open so the input can be fixed.
    assert_eq!(ui.overlay, Overlay::TaskForm);
    assert!(store.tasks().is_empty());
    assert_eq!(
        ui.message.as_ref().map(|msg| msg.level),
        Some(MessageLevel::Error),
    );
}

#[test]
fn escape_discards_the_form() {
    let (mut ui, store) = ui_with_store();

    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "never saved");
    press(&mut ui, KeyCode::Esc);

    assert_eq!(ui.overlay, Overlay::None);
    assert!(ui.task_form.is_none());
    assert!(store.tasks().is_empty());
}

#[test]
fn edit_flow_prefills_and_patches() {
    let (mut ui, store) = ui_with_store();
    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "Draft report");
    press(&mut ui, KeyCode::Enter);

    press(&mut ui, KeyCode::Char('e'));
    assert_eq!(ui.overlay, Overlay::TaskForm);
    assert_eq!(
        ui.task_form.as_ref().map(|form| form.title.value()),
        Some("Draft report"),
    );

    type_text(&mut ui, " v2");
    press(&mut ui, KeyCode::Enter);

    assert_eq!(store.tasks()[0].title, "Draft report v2");
    assert_eq!(message_text(&ui), Some("Updated 'Draft report v2'"));
}

#[test]
fn space_toggles_completion_and_updates_stats() {
    let (mut ui, store) = ui_with_store();
    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "Task");
    press(&mut ui, KeyCode::Enter);

    press(&mut ui, KeyCode::Char(' '));
    assert!(store.tasks()[0].completed);
    assert_eq!(ui.stats.completed_tasks, 1);
    assert_eq!(ui.stats.completion_rate, 100);
    assert_eq!(ui.stats.today_completed, 1);
    assert_eq!(ui.stats.streak, 1);
    assert_eq!(message_text(&ui), Some("Completed 'Task'"));

    press(&mut ui, KeyCode::Char(' '));
    assert!(!store.tasks()[0].completed);
    assert_eq!(ui.stats.completed_tasks, 0);
    assert_eq!(message_text(&ui), Some("Reopened 'Task'"));
}

#[test]
fn delete_flow_requires_confirmation() {
    let (mut ui, store) = ui_with_store();
    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "Doomed");
    press(&mut ui, KeyCode::Enter);

    press(&mut ui, KeyCode::Char('d'));
    assert_eq!(ui.overlay, Overlay::ConfirmDelete);

    // Declining keeps the task.
    press(&mut ui, KeyCode::Esc);
    assert_eq!(store.tasks().len(), 1);

    press(&mut ui, KeyCode::Char('d'));
    press(&mut ui, KeyCode::Char('y'));
    assert!(store.tasks().is_empty());
    assert!(ui.tasks.is_empty());
    assert_eq!(message_text(&ui), Some("Deleted 'Doomed'"));
}

#[test]
fn search_flow_narrows_and_clears() {
    let (mut ui, _store) = ui_with_store();
    for title in ["Buy milk", "Clean desk"] {
        press(&mut ui, KeyCode::Char('n'));
        type_text(&mut ui, title);
        press(&mut ui, KeyCode::Enter);
    }
    assert_eq!(ui.tasks.len(), 2);

    press(&mut ui, KeyCode::Char('/'));
    assert_eq!(ui.overlay, Overlay::Search);
    type_text(&mut ui, "milk");
    press(&mut ui, KeyCode::Enter);

    assert_eq!(ui.tasks.len(), 1);
    assert_eq!(ui.tasks[0].title, "Buy milk");
    assert_eq!(ui.filter.text.as_deref(), Some("milk"));

    // Reopening shows the current query; clearing it restores the full list.
    press(&mut ui, KeyCode::Char('/'));
    assert_eq!(
        ui.search.as_ref().map(super::editor::InputState::value),
        Some("milk"),
    );
    for _ in 0..4 {
        press(&mut ui, KeyCode::Backspace);
    }
    press(&mut ui, KeyCode::Enter);

    assert_eq!(ui.filter.text, None);
    assert_eq!(ui.tasks.len(), 2);
}

#[test]
fn sidebar_selection_scopes_the_task_list() {
    let (mut ui, store) = ui_with_store();
    let work = store.push_category("Work");
    store.push_task("personal errand", ui.categories[0].id);
    store.push_task("work item", work);
    ui.refresh_categories();
    press(&mut ui, KeyCode::Char('r'));
    assert_eq!(ui.tasks.len(), 2);

    press(&mut ui, KeyCode::Tab);
    assert_eq!(ui.focus, Focus::Categories);
    press(&mut ui, KeyCode::Down);
    press(&mut ui, KeyCode::Down);
    press(&mut ui, KeyCode::Enter);

    assert_eq!(ui.filter.category, Some(work));
    assert_eq!(ui.tasks.len(), 1);
    assert_eq!(ui.tasks[0].title, "work item");

    // The "All" entry drops the category scope.
    press(&mut ui, KeyCode::Up);
    press(&mut ui, KeyCode::Up);
    press(&mut ui, KeyCode::Enter);
    assert_eq!(ui.filter.category, None);
    assert_eq!(ui.tasks.len(), 2);
}

#[test]
fn category_form_creates_from_the_sidebar() {
    let (mut ui, _store) = ui_with_store();

    press(&mut ui, KeyCode::Tab);
    press(&mut ui, KeyCode::Char('n'));
    assert_eq!(ui.overlay, Overlay::CategoryForm);

    type_text(&mut ui, "Health");
    press(&mut ui, KeyCode::Enter);

    assert_eq!(ui.overlay, Overlay::None);
    assert!(ui.categories.iter().any(|category| category.name == "Health"));
    assert_eq!(message_text(&ui), Some("Created category 'Health'"));
}

#[test]
fn new_task_defaults_to_the_sidebar_category() {
    let (mut ui, store) = ui_with_store();
    let work = store.push_category("Work");
    ui.refresh_categories();

    press(&mut ui, KeyCode::Tab);
    press(&mut ui, KeyCode::Down);
    press(&mut ui, KeyCode::Down);
    press(&mut ui, KeyCode::Enter);
    press(&mut ui, KeyCode::Tab);

    press(&mut ui, KeyCode::Char('n'));
    type_text(&mut ui, "scoped");
    press(&mut ui, KeyCode::Enter);

    let task = store
        .tasks()
        .into_iter()
        .find(|task| task.title == "scoped")
        .unwrap_or_else(|| panic!("task should be created"));
    assert_eq!(task.category_id, work);
}

#[test]
fn filter_summary_renders_active_dimensions() {
    let (mut ui, _store) = ui_with_store();
    assert_eq!(ui.filter_summary(), "none");

    press(&mut ui, KeyCode::Char('p'));
    press(&mut ui, KeyCode::Char('s'));
    let summary = ui.filter_summary();
    assert!(summary.contains("priority:low"));
    assert!(summary.contains("status:pending"));
}

#[test]
fn failed_refresh_reports_once_and_recovers_state() {
    struct FailingStore;

    impl RecordStore for FailingStore {
        type Error = anyhow::Error;

        fn list_tasks(&self) -> Result<Vec<Task>, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn list_tasks_modified_since(
            &self,
            _since: OffsetDateTime,
        ) -> Result<Vec<Task>, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn get_task(&self, _id: TaskId) -> Result<Option<Task>, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn create_task(&self, _task: &Task) -> Result<(), Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn update_task(&self, _task: &Task) -> Result<(), Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn delete_task(&self, _id: TaskId) -> Result<bool, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn get_category(&self, _id: CategoryId) -> Result<Option<Category>, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn create_category(&self, _category: &Category) -> Result<(), Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn update_category(&self, _category: &Category) -> Result<(), Self::Error> {
            Err(anyhow!("backend unreachable"))
        }

        fn delete_category(&self, _id: CategoryId) -> Result<bool, Self::Error> {
            Err(anyhow!("backend unreachable"))
        }
    }

    let service = TaskService::new(FailingStore, DefaultsConfig::default());
    let repository = TaskRepository::new(Arc::new(FailingStore));
    let mut ui = Ui::new(service, repository);

    // The UI falls back to empty data instead of propagating the failure.
    assert!(ui.tasks.is_empty());
    assert!(ui.refresh_failed);
    assert_eq!(ui.stats.total_tasks, 0);

    // Subsequent ticks must not re-raise the same toast.
    ui.message = None;
    ui.refresh_tasks();
    assert!(ui.message.is_none());
}
