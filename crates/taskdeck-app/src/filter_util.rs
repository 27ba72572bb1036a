use taskdeck_core::id::CategoryId;
use taskdeck_core::{DueBucket, Priority, StatusFilter, TaskFilter, parse_iso_date};
use thiserror::Error;
use time::Date;

/// Error type returned while constructing task filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid priority: {token}")]
    InvalidPriority { token: String },
    #[error("invalid due bucket: {token}")]
    InvalidDueBucket { token: String },
    #[error("invalid status: {token}")]
    InvalidStatus { token: String },
    #[error("invalid category id: {token}")]
    InvalidCategory { token: String },
    #[error("invalid date: {token}")]
    InvalidDate {
        token: String,
        #[source]
        source: time::error::Parse,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`TaskFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    category: Option<CategoryId>,
    priority: Option<Priority>,
    due: Option<DueBucket>,
    status: Option<StatusFilter>,
    text: Option<String>,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the category dimension from a raw id token.
    ///
    /// # Errors
    /// Returns an error if the token is not a valid category id.
    pub fn with_category(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.category = token.map(parse_category_token).transpose()?;
        Ok(self)
    }

    /// Configure the priority dimension.
    ///
    /// # Errors
    /// Returns an error if the token is not a known priority name.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.priority = token.map(parse_priority_token).transpose()?;
        Ok(self)
    }

    /// Configure the due-date bucket dimension.
    ///
    /// # Errors
    /// Returns an error if the token is not a known due bucket name.
    pub fn with_due(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.due = token.map(parse_due_token).transpose()?;
        Ok(self)
    }

    /// Configure the completion status dimension.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status name.
    pub fn with_status(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.status = token.map(parse_status_token).transpose()?;
        Ok(self)
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        TaskFilter {
            category: self.category,
            priority: self.priority,
            due: self.due,
            status: self.status,
            text: self.text,
        }
    }
}

/// Convert a token into a [`CategoryId`].
///
/// # Errors
/// Returns an error if the token is not a valid UUID.
pub fn parse_category_token(token: &str) -> FilterBuildResult<CategoryId> {
    token
        .trim()
        .parse()
        .map_err(|_| FilterBuildError::InvalidCategory {
            token: token.trim().to_string(),
        })
}

/// Convert a token into a [`Priority`].
///
/// # Errors
/// Returns an error if the token does not match a priority name.
pub fn parse_priority_token(token: &str) -> FilterBuildResult<Priority> {
    token
        .parse()
        .map_err(|_| FilterBuildError::InvalidPriority {
            token: token.trim().to_string(),
        })
}

/// Convert a token into a [`DueBucket`].
///
/// # Errors
/// Returns an error if the token does not match a due bucket name.
pub fn parse_due_token(token: &str) -> FilterBuildResult<DueBucket> {
    match token.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(DueBucket::Today),
        "overdue" => Ok(DueBucket::Overdue),
        "upcoming" => Ok(DueBucket::Upcoming),
        _ => Err(FilterBuildError::InvalidDueBucket {
            token: token.trim().to_string(),
        }),
    }
}

/// Convert a token into a [`StatusFilter`].
///
/// # Errors
/// Returns an error if the token does not match a status name.
pub fn parse_status_token(token: &str) -> FilterBuildResult<StatusFilter> {
    match token.trim().to_ascii_lowercase().as_str() {
        "completed" | "done" => Ok(StatusFilter::Completed),
        "pending" | "open" => Ok(StatusFilter::Pending),
        _ => Err(FilterBuildError::InvalidStatus {
            token: token.trim().to_string(),
        }),
    }
}

/// Parse a calendar day in `yyyy-mm-dd` form.
///
/// # Errors
/// Returns an error if the input does not conform to the format.
pub fn parse_due_date(input: &str) -> FilterBuildResult<Date> {
    parse_iso_date(input).map_err(|source| FilterBuildError::InvalidDate {
        token: input.trim().to_string(),
        source,
    })
}
