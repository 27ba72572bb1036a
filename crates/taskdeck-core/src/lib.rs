//! Domain types & dashboard logic for taskdeck tasks and categories.

/// Category records and their defaults.
pub mod category;
/// Filter dimensions and due-date classification.
pub mod filter;
/// Identifier types.
pub mod id;
/// Task priority levels.
pub mod priority;
/// Completion metrics, streaks, and activity tallies.
pub mod stats;
/// Case-insensitive text search over task fields.
pub mod text_matcher;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

pub use crate::category::Category;
pub use crate::filter::{DueBucket, DueStatus, StatusFilter, TaskFilter};
pub use crate::id::{CategoryId, TaskId};
pub use crate::priority::{ParsePriorityError, Priority};
pub use crate::stats::{CategoryStats, DayActivity, UserStats};
pub use crate::text_matcher::TextMatcher;

/// Serde adapter for bare `yyyy-mm-dd` calendar days.
pub(crate) mod iso_date {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;
    use time::Date;

    pub(crate) const FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[year]-[month]-[day]");

    pub(crate) fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, FORMAT).map_err(D::Error::custom)
    }

    pub(crate) mod option {
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};
        use time::Date;

        use super::FORMAT;

        pub(crate) fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            date.map(|date| date.format(FORMAT))
                .transpose()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| Date::parse(&raw, FORMAT))
                .transpose()
                .map_err(D::Error::custom)
        }
    }
}

/// Parse a bare `yyyy-mm-dd` calendar day.
///
/// # Errors
/// Returns an error if the input does not match the format.
pub fn parse_iso_date(input: &str) -> Result<Date, time::error::Parse> {
    Date::parse(input.trim(), iso_date::FORMAT)
}

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Longer free-form description.
    #[serde(default)]
    pub description: String,
    /// Category the task belongs to.
    pub category_id: CategoryId,
    /// Urgency level.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date as a bare calendar day.
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Timestamp of the latest modification.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// Create an open task with the given title wired to a category.
    #[must_use]
    pub fn new(title: impl Into<String>, category_id: CategoryId, now: OffsetDateTime) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            category_id,
            priority: Priority::default(),
            due_date: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task was completed on the given calendar day.
    ///
    /// Completion day is approximated by the latest modification; toggling a
    /// task touches `updated_at`, so the two coincide in practice.
    #[must_use]
    pub fn completed_on(&self, day: Date) -> bool {
        self.completed && self.updated_at.date() == day
    }
}
