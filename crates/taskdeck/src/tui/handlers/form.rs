use crossterm::event::{KeyCode, KeyEvent};
use taskdeck_app::RecordStore;

use super::super::editor::{CategoryFormState, FormField, FormTarget, InputState, TaskFormState};
use super::super::view::{Focus, Overlay, Ui};

impl<S: RecordStore> Ui<S> {
    /// Open the create form for whichever pane has focus.
    pub(in crate::tui) fn open_create_form(&mut self) {
        match self.focus {
            Focus::Categories => {
                self.category_form = Some(CategoryFormState::default());
                self.overlay = Overlay::CategoryForm;
            }
            Focus::Tasks => {
                let priority = self.service.defaults().priority;
                let category_index = self.default_category_index();
                self.task_form = Some(TaskFormState::create(priority, category_index));
                self.overlay = Overlay::TaskForm;
            }
        }
    }

    /// Category preselected in a fresh form: the sidebar pick when one is
    /// active, otherwise the configured default category.
    fn default_category_index(&self) -> usize {
        if self.category_cursor > 0 {
            return self.category_cursor - 1;
        }
        let wanted = self.service.defaults().category.as_str();
        self.categories
            .iter()
            .position(|category| category.name.eq_ignore_ascii_case(wanted))
            .unwrap_or(0)
    }

    pub(in crate::tui) fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task() else {
            self.error("No task is selected");
            return;
        };
        let category_index = self
            .categories
            .iter()
            .position(|category| category.id == task.category_id)
            .unwrap_or(0);
        self.task_form = Some(TaskFormState::edit(task, category_index));
        self.overlay = Overlay::TaskForm;
    }

    pub(in crate::tui) fn open_search(&mut self) {
        let current = self.filter.text.clone().unwrap_or_default();
        self.search = Some(InputState::with_value(current));
        self.overlay = Overlay::Search;
    }

    pub(in crate::tui) fn handle_task_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.task_form = None;
                self.overlay = Overlay::None;
                return;
            }
            KeyCode::Enter => {
                self.submit_task_form();
                return;
            }
            _ => {}
        }

        let category_count = self.categories.len();
        let Some(form) = self.task_form.as_mut() else {
            self.overlay = Overlay::None;
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            code => match form.field {
                FormField::Priority => match code {
                    KeyCode::Left => form.shift_priority(false),
                    KeyCode::Right | KeyCode::Char(' ') => form.shift_priority(true),
                    _ => {}
                },
                FormField::Category => match code {
                    KeyCode::Left => form.shift_category(false, category_count),
                    KeyCode::Right | KeyCode::Char(' ') => {
                        form.shift_category(true, category_count);
                    }
                    _ => {}
                },
                FormField::Title | FormField::Description | FormField::Due => {
                    if let Some(input) = form.input_mut() {
                        edit_input(input, code);
                    }
                }
            },
        }
    }

    fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.take() else {
            self.overlay = Overlay::None;
            return;
        };
        self.overlay = Overlay::None;

        match form.target {
            FormTarget::Create => match form.create_input(&self.categories) {
                Ok(input) => match self.service.create_task(input) {
                    Ok(task) => {
                        let note = format!("Created '{}'", task.title);
                        let id = task.id;
                        if let Err(err) = self.repository.upsert(task) {
                            self.error(format!("Failed to update the local snapshot: {err}"));
                            return;
                        }
                        self.refresh_tasks_with(Some(id));
                        self.info(note);
                        self.refresh_counts();
                    }
                    Err(err) => self.error(format!("Failed to create the task: {err}")),
                },
                Err(err) => self.reopen_task_form(form, err.to_string()),
            },
            FormTarget::Edit(task_id) => match form.edit_patch(&self.categories) {
                Ok(patch) => match self.service.update_task(task_id, patch) {
                    Ok(task) => {
                        let note = format!("Updated '{}'", task.title);
                        if let Err(err) = self.repository.upsert(task) {
                            self.error(format!("Failed to update the local snapshot: {err}"));
                            return;
                        }
                        self.refresh_tasks_with(Some(task_id));
                        self.info(note);
                        self.refresh_counts();
                    }
                    Err(err) => self.error(format!("Failed to update the task: {err}")),
                },
                Err(err) => self.reopen_task_form(form, err.to_string()),
            },
        }
    }

    /// Put the form back with an error so the user can fix the input.
    fn reopen_task_form(&mut self, form: TaskFormState, problem: String) {
        self.error(problem);
        self.task_form = Some(form);
        self.overlay = Overlay::TaskForm;
    }

    pub(in crate::tui) fn handle_category_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.category_form = None;
                self.overlay = Overlay::None;
                return;
            }
            KeyCode::Enter => {
                self.submit_category_form();
                return;
            }
            _ => {}
        }

        if let Some(form) = self.category_form.as_mut() {
            edit_input(&mut form.name, key.code);
        }
    }

    fn submit_category_form(&mut self) {
        let Some(form) = self.category_form.take() else {
            self.overlay = Overlay::None;
            return;
        };
        self.overlay = Overlay::None;

        match self.service.create_category(form.into_input()) {
            Ok(category) => {
                self.info(format!("Created category '{}'", category.name));
                self.refresh_categories();
            }
            Err(err) => self.error(format!("Failed to create the category: {err}")),
        }
    }

    pub(in crate::tui) fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.delete_confirmed(),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.overlay = Overlay::None;
            }
            _ => {}
        }
    }

    fn delete_confirmed(&mut self) {
        self.overlay = Overlay::None;
        let Some(confirm) = self.confirm_delete.take() else {
            return;
        };
        match self.service.delete_task(confirm.task_id) {
            Ok(()) => {
                if let Err(err) = self.repository.remove(&[confirm.task_id]) {
                    self.error(format!("Failed to update the local snapshot: {err}"));
                    return;
                }
                self.refresh_tasks();
                self.info(format!("Deleted '{}'", confirm.title));
                self.refresh_counts();
            }
            Err(err) => self.error(format!("Failed to delete the task: {err}")),
        }
    }

    pub(in crate::tui) fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search = None;
                self.overlay = Overlay::None;
                return;
            }
            KeyCode::Enter => {
                self.apply_search();
                return;
            }
            _ => {}
        }

        if let Some(input) = self.search.as_mut() {
            edit_input(input, key.code);
        }
    }

    fn apply_search(&mut self) {
        let Some(input) = self.search.take() else {
            self.overlay = Overlay::None;
            return;
        };
        self.overlay = Overlay::None;

        let text = input.into_value();
        let trimmed = text.trim();
        self.filter.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        };
        self.refresh_tasks();
    }
}

fn edit_input(input: &mut InputState, code: KeyCode) {
    match code {
        KeyCode::Char(ch) => input.insert(ch),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
