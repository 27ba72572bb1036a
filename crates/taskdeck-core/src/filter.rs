use serde::{Deserialize, Serialize};
use time::Date;

use crate::id::CategoryId;
use crate::priority::Priority;
use crate::text_matcher::TextMatcher;
use crate::Task;

/// Due-date bucket relative to the viewer's current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueBucket {
    /// Due exactly on the current day.
    Today,
    /// Due before the current day and still open.
    Overdue,
    /// Due after the current day.
    Upcoming,
}

impl DueBucket {
    /// All buckets in display order.
    pub const ALL: [Self; 3] = [Self::Today, Self::Overdue, Self::Upcoming];

    /// Wire and CLI token for the bucket.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
        }
    }

    /// Whether the task's due date lands in this bucket on the given day.
    ///
    /// Tasks without a due date never land in a bucket.
    #[must_use]
    pub fn contains(self, task: &Task, today: Date) -> bool {
        let Some(due) = task.due_date else {
            return false;
        };
        match self {
            Self::Today => due == today,
            Self::Overdue => due < today && !task.completed,
            Self::Upcoming => due > today,
        }
    }
}

/// Completion dimension of a task filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Only completed tasks.
    Completed,
    /// Only open tasks.
    Pending,
}

impl StatusFilter {
    /// Both statuses in display order.
    pub const ALL: [Self; 2] = [Self::Completed, Self::Pending];

    /// Wire and CLI token for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    /// Whether the task's completion flag satisfies this status.
    #[must_use]
    pub const fn accepts(self, task: &Task) -> bool {
        match self {
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }
}

/// Presentation state of a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Past due and still open.
    Overdue,
    /// Due on the current day.
    DueToday,
    /// Due on another day, or past due but already completed.
    Scheduled(Date),
}

impl DueStatus {
    /// Classify a task's due date relative to the given day.
    ///
    /// Returns `None` when the task carries no due date.
    #[must_use]
    pub fn of(task: &Task, today: Date) -> Option<Self> {
        let due = task.due_date?;
        if due == today {
            return Some(Self::DueToday);
        }
        if due < today && !task.completed {
            return Some(Self::Overdue);
        }
        Some(Self::Scheduled(due))
    }
}

/// Conjunction of per-dimension task predicates.
///
/// Every populated dimension must accept a task for it to pass; an empty
/// filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to a single category.
    pub category: Option<CategoryId>,
    /// Restrict to a single priority level.
    pub priority: Option<Priority>,
    /// Restrict to a due-date bucket.
    pub due: Option<DueBucket>,
    /// Restrict by completion status.
    pub status: Option<StatusFilter>,
    /// Case-insensitive substring over title and description.
    pub text: Option<String>,
}

impl TaskFilter {
    /// Create a filter that passes every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no dimension is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.priority.is_none()
            && self.due.is_none()
            && self.status.is_none()
            && self.text.is_none()
    }

    /// Evaluate the filter against a single task.
    #[must_use]
    pub fn matches(&self, task: &Task, today: Date) -> bool {
        if self.category.is_some_and(|category| task.category_id != category) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if self.due.is_some_and(|bucket| !bucket.contains(task, today)) {
            return false;
        }
        if self.status.is_some_and(|status| !status.accepts(task)) {
            return false;
        }
        if let Some(matcher) = self.text.as_deref().and_then(TextMatcher::new) {
            if !matcher.matches(task) {
                return false;
            }
        }
        true
    }

    /// Apply the filter to a task list, preserving input order.
    #[must_use]
    pub fn apply(&self, tasks: &[Task], today: Date) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task, today))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, Month, OffsetDateTime};

    use super::*;
    use crate::id::TaskId;

    fn day(year: i32, month: u8, dom: u8) -> Date {
        let month = Month::try_from(month).unwrap_or_else(|err| panic!("month must be valid: {err}"));
        Date::from_calendar_date(year, month, dom)
            .unwrap_or_else(|err| panic!("date must be valid: {err}"))
    }

    fn task_due(due: Option<Date>, completed: bool) -> Task {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000)
            .unwrap_or_else(|err| panic!("timestamp must be valid: {err}"));
        Task {
            id: TaskId::new(),
            title: "Sample".into(),
            description: String::new(),
            category_id: CategoryId::new(),
            priority: Priority::Medium,
            due_date: due,
            completed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_filter_passes_everything() {
        let today = day(2026, 8, 21);
        let filter = TaskFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&task_due(None, false), today));
        assert!(filter.matches(&task_due(Some(today), true), today));
    }

    #[test]
    fn due_buckets_partition_dated_tasks() {
        let today = day(2026, 8, 21);
        let yesterday = today - Duration::days(1);
        let tomorrow = today + Duration::days(1);

        let due_today = task_due(Some(today), false);
        let overdue = task_due(Some(yesterday), false);
        let upcoming = task_due(Some(tomorrow), false);

        assert!(DueBucket::Today.contains(&due_today, today));
        assert!(!DueBucket::Today.contains(&overdue, today));

        assert!(DueBucket::Overdue.contains(&overdue, today));
        assert!(!DueBucket::Overdue.contains(&due_today, today));
        assert!(!DueBucket::Overdue.contains(&upcoming, today));

        assert!(DueBucket::Upcoming.contains(&upcoming, today));
        assert!(!DueBucket::Upcoming.contains(&overdue, today));
    }

    #[test]
    fn completed_tasks_never_count_as_overdue() {
        let today = day(2026, 8, 21);
        let done_late = task_due(Some(today - Duration::days(3)), true);
        assert!(!DueBucket::Overdue.contains(&done_late, today));
    }

    #[test]
    fn tasks_without_due_dates_skip_every_bucket() {
        let today = day(2026, 8, 21);
        let undated = task_due(None, false);
        for bucket in DueBucket::ALL {
            assert!(!bucket.contains(&undated, today));
        }
    }

    #[test]
    fn status_filters_partition_the_list() {
        let today = day(2026, 8, 21);
        let tasks = vec![
            task_due(None, true),
            task_due(None, false),
            task_due(Some(today), true),
            task_due(Some(today), false),
        ];

        let mut completed = TaskFilter::new();
        completed.status = Some(StatusFilter::Completed);
        let mut pending = TaskFilter::new();
        pending.status = Some(StatusFilter::Pending);

        let done = completed.apply(&tasks, today);
        let open = pending.apply(&tasks, today);
        assert_eq!(done.len() + open.len(), tasks.len());
        assert!(done.iter().all(|task| task.completed));
        assert!(open.iter().all(|task| !task.completed));
    }

    #[test]
    fn dimensions_combine_as_conjunction() {
        let today = day(2026, 8, 21);
        let mut urgent = task_due(Some(today - Duration::days(1)), false);
        urgent.priority = Priority::High;
        let mut relaxed = task_due(Some(today - Duration::days(1)), false);
        relaxed.priority = Priority::Low;

        let mut filter = TaskFilter::new();
        filter.priority = Some(Priority::High);
        filter.due = Some(DueBucket::Overdue);

        assert!(filter.matches(&urgent, today));
        assert!(!filter.matches(&relaxed, today));
    }

    #[test]
    fn category_dimension_scopes_tasks() {
        let today = day(2026, 8, 21);
        let task = task_due(None, false);

        let mut same = TaskFilter::new();
        same.category = Some(task.category_id);
        assert!(same.matches(&task, today));

        let mut other = TaskFilter::new();
        other.category = Some(CategoryId::new());
        assert!(!other.matches(&task, today));
    }

    #[test]
    fn text_dimension_searches_title_and_description() {
        let today = day(2026, 8, 21);
        let mut task = task_due(None, false);
        task.title = "Renew passport".into();
        task.description = "Bring two photos".into();

        let mut filter = TaskFilter::new();
        filter.text = Some("PASSPORT".into());
        assert!(filter.matches(&task, today));

        filter.text = Some("photos".into());
        assert!(filter.matches(&task, today));

        filter.text = Some("visa".into());
        assert!(!filter.matches(&task, today));
    }

    #[test]
    fn blank_text_is_not_a_constraint() {
        let today = day(2026, 8, 21);
        let mut filter = TaskFilter::new();
        filter.text = Some("   ".into());
        assert!(filter.matches(&task_due(None, false), today));
    }

    #[test]
    fn apply_is_idempotent() {
        let today = day(2026, 8, 21);
        let tasks = vec![
            task_due(Some(today), false),
            task_due(Some(today - Duration::days(2)), false),
            task_due(Some(today + Duration::days(2)), true),
            task_due(None, true),
        ];

        let mut filter = TaskFilter::new();
        filter.due = Some(DueBucket::Overdue);
        filter.status = Some(StatusFilter::Pending);

        let once = filter.apply(&tasks, today);
        let twice = filter.apply(&once, today);
        assert_eq!(once, twice);
    }

    #[test]
    fn due_status_tracks_the_calendar() {
        let today = day(2026, 8, 21);

        assert_eq!(DueStatus::of(&task_due(None, false), today), None);
        assert_eq!(
            DueStatus::of(&task_due(Some(today), false), today),
            Some(DueStatus::DueToday)
        );
        assert_eq!(
            DueStatus::of(&task_due(Some(today - Duration::days(1)), false), today),
            Some(DueStatus::Overdue)
        );

        let future = today + Duration::days(7);
        assert_eq!(
            DueStatus::of(&task_due(Some(future), false), today),
            Some(DueStatus::Scheduled(future))
        );

        let past = today - Duration::days(7);
        assert_eq!(
            DueStatus::of(&task_due(Some(past), true), today),
            Some(DueStatus::Scheduled(past))
        );
    }
}
