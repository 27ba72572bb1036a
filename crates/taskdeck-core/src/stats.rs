use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Duration, Weekday};

use crate::id::CategoryId;
use crate::Task;

/// Maximum number of days the streak scan walks backwards.
pub const STREAK_LOOKBACK_DAYS: i64 = 30;

/// Number of days covered by the activity strip.
pub const ACTIVITY_DAYS: i64 = 7;

/// Aggregate completion metrics for a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of tasks overall.
    pub total_tasks: usize,
    /// Number of completed tasks.
    pub completed_tasks: usize,
    /// Tasks completed on the current day.
    pub today_completed: usize,
    /// Consecutive-day completion streak ending today.
    pub streak: u32,
    /// Completed share as a whole percentage.
    pub completion_rate: u8,
}

impl UserStats {
    /// Compute the dashboard metrics for the given day.
    #[must_use]
    pub fn from_tasks(tasks: &[Task], today: Date) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|task| task.completed).count();
        let today_completed = tasks.iter().filter(|task| task.completed_on(today)).count();
        Self {
            total_tasks,
            completed_tasks,
            today_completed,
            streak: current_streak(tasks, today),
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}

/// Share of completed tasks as a whole percentage, rounded half-up.
///
/// An empty list yields zero rather than a division error.
#[must_use]
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (200 * completed + total) / (2 * total);
    u8::try_from(rate.min(100)).unwrap_or(100)
}

/// Length of the consecutive-day completion streak ending today.
///
/// A quiet current day does not break the streak; the scan stops after
/// [`STREAK_LOOKBACK_DAYS`] days.
#[must_use]
pub fn current_streak(tasks: &[Task], today: Date) -> u32 {
    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let Some(day) = today.checked_sub(Duration::days(offset)) else {
            break;
        };
        if tasks.iter().any(|task| task.completed_on(day)) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Per-category completion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    /// Number of tasks in the category.
    pub total: usize,
    /// Number of completed tasks in the category.
    pub completed: usize,
}

/// Group completion counters by category.
#[must_use]
pub fn per_category(tasks: &[Task]) -> HashMap<CategoryId, CategoryStats> {
    let mut stats: HashMap<CategoryId, CategoryStats> = HashMap::new();
    for task in tasks {
        let entry = stats.entry(task.category_id).or_default();
        entry.total += 1;
        if task.completed {
            entry.completed += 1;
        }
    }
    stats
}

/// Completion tally for a single day of the activity strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    /// Calendar day the tally covers.
    #[serde(with = "crate::iso_date")]
    pub date: Date,
    /// Tasks completed on that day.
    pub completed: usize,
    /// Short weekday label, `Mon` through `Sun`.
    pub weekday: String,
}

/// Completion tallies for the [`ACTIVITY_DAYS`] days ending today, oldest first.
#[must_use]
pub fn weekly_activity(tasks: &[Task], today: Date) -> Vec<DayActivity> {
    (0..ACTIVITY_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub(Duration::days(offset)))
        .map(|day| DayActivity {
            date: day,
            completed: tasks.iter().filter(|task| task.completed_on(day)).count(),
            weekday: weekday_label(day.weekday()).to_string(),
        })
        .collect()
}

/// Short English label for a weekday.
#[must_use]
pub const fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
