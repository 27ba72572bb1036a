use taskdeck_app::{
    CreateCategoryInput, CreateTaskInput, DueDatePatch, FilterBuildResult, TaskPatch,
    parse_due_date,
};
use taskdeck_core::id::TaskId;
use taskdeck_core::{Category, Priority, Task};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

/// Single-line text field with a grapheme-aware cursor.
///
/// The cursor is a byte offset into `value` and always sits on a grapheme
/// boundary, so multi-byte input edits cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct InputState {
    value: String,
    cursor: usize,
}

impl InputState {
    pub(super) fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub(super) fn value(&self) -> &str {
        &self.value
    }

    pub(super) fn into_value(self) -> String {
        self.value
    }

    pub(super) fn insert(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Remove the grapheme immediately before the cursor.
    pub(super) fn backspace(&mut self) {
        if let Some((start, _)) = self.value[..self.cursor].grapheme_indices(true).last() {
            self.value.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Remove the grapheme under the cursor.
    pub(super) fn delete(&mut self) {
        let len = self.value[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(0, str::len);
        if len > 0 {
            self.value.drain(self.cursor..self.cursor + len);
        }
    }

    pub(super) fn move_left(&mut self) {
        if let Some((start, _)) = self.value[..self.cursor].grapheme_indices(true).last() {
            self.cursor = start;
        }
    }

    pub(super) fn move_right(&mut self) {
        let len = self.value[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(0, str::len);
        self.cursor += len;
    }

    pub(super) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(super) fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Split the value for rendering: text before the cursor, the grapheme
    /// under it, and the remainder.
    pub(super) fn split_at_cursor(&self) -> (&str, &str, &str) {
        let before = &self.value[..self.cursor];
        let rest = &self.value[self.cursor..];
        let under = rest.graphemes(true).next().map_or(0, str::len);
        (before, &rest[..under], &rest[under..])
    }
}

/// Whether a task form creates a new task or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormTarget {
    Create,
    Edit(TaskId),
}

/// Field currently receiving input inside the task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormField {
    Title,
    Description,
    Due,
    Priority,
    Category,
}

impl FormField {
    pub(super) const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Due,
            Self::Due => Self::Priority,
            Self::Priority => Self::Category,
            Self::Category => Self::Title,
        }
    }

    pub(super) const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Category,
            Self::Description => Self::Title,
            Self::Due => Self::Description,
            Self::Priority => Self::Due,
            Self::Category => Self::Priority,
        }
    }
}

/// Editable state behind the task create/edit popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TaskFormState {
    pub(super) target: FormTarget,
    pub(super) title: InputState,
    pub(super) description: InputState,
    /// Due date as typed, `yyyy-mm-dd` or blank.
    pub(super) due: InputState,
    pub(super) priority: Priority,
    /// Index into the category list shown by the form.
    pub(super) category_index: usize,
    pub(super) field: FormField,
}

impl TaskFormState {
    pub(super) fn create(priority: Priority, category_index: usize) -> Self {
        Self {
            target: FormTarget::Create,
            title: InputState::default(),
            description: InputState::default(),
            due: InputState::default(),
            priority,
            category_index,
            field: FormField::Title,
        }
    }

    pub(super) fn edit(task: &Task, category_index: usize) -> Self {
        Self {
            target: FormTarget::Edit(task.id),
            title: InputState::with_value(task.title.clone()),
            description: InputState::with_value(task.description.clone()),
            due: InputState::with_value(task.due_date.map(|d| d.to_string()).unwrap_or_default()),
            priority: task.priority,
            category_index,
            field: FormField::Title,
        }
    }

    /// The text field under the form cursor, if the focused field is one.
    pub(super) fn input_mut(&mut self) -> Option<&mut InputState> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Due => Some(&mut self.due),
            FormField::Priority | FormField::Category => None,
        }
    }

    pub(super) fn focus_next(&mut self) {
        self.field = self.field.next();
    }

    pub(super) fn focus_prev(&mut self) {
        self.field = self.field.prev();
    }

    pub(super) fn shift_priority(&mut self, forward: bool) {
        let idx = Priority::ALL
            .iter()
            .position(|p| *p == self.priority)
            .unwrap_or(0);
        let len = Priority::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.priority = Priority::ALL[next];
    }

    pub(super) fn shift_category(&mut self, forward: bool, category_count: usize) {
        if category_count == 0 {
            return;
        }
        self.category_index = if forward {
            (self.category_index + 1) % category_count
        } else {
            (self.category_index + category_count - 1) % category_count
        };
    }

    /// Build a create input from the form fields.
    ///
    /// # Errors
    /// Returns an error when the due field holds something other than a
    /// blank value or a `yyyy-mm-dd` day.
    pub(super) fn create_input(
        &self,
        categories: &[Category],
    ) -> FilterBuildResult<CreateTaskInput> {
        let due_date = self.parse_due()?;
        Ok(CreateTaskInput {
            title: non_blank(self.title.value()),
            description: non_blank(self.description.value()),
            category: categories.get(self.category_index).map(|c| c.id),
            priority: Some(self.priority),
            due_date,
        })
    }

    /// Build an update patch from the form fields.
    ///
    /// A blank title leaves the stored title untouched; a blank due field
    /// clears any stored due date.
    ///
    /// # Errors
    /// Returns an error when the due field holds an unparsable date.
    pub(super) fn edit_patch(&self, categories: &[Category]) -> FilterBuildResult<TaskPatch> {
        let due_date = match self.parse_due()? {
            Some(date) => DueDatePatch::Set(date),
            None => DueDatePatch::Clear,
        };
        Ok(TaskPatch {
            title: non_blank(self.title.value()),
            description: Some(self.description.value().to_owned()),
            category: categories.get(self.category_index).map(|c| c.id),
            priority: Some(self.priority),
            due_date: Some(due_date),
        })
    }

    fn parse_due(&self) -> FilterBuildResult<Option<Date>> {
        let raw = self.due.value().trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_date(raw).map(Some)
    }
}

/// Editable state behind the category create popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct CategoryFormState {
    pub(super) name: InputState,
}

impl CategoryFormState {
    pub(super) fn into_input(self) -> CreateCategoryInput {
        CreateCategoryInput {
            name: non_blank(&self.name.into_value()),
            color: None,
            icon: None,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
