//! HTTP-backed record storage for taskdeck.

/// Error types for store operations.
pub mod error;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use taskdeck_core::id::{CategoryId, TaskId};
use taskdeck_core::{Category, Task};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

pub use crate::error::HttpStoreError;

const TASK_COLLECTION: &str = "task";
const CATEGORY_COLLECTION: &str = "category";
const MODIFIED_SINCE_PARAM: &str = "updatedAt_gte";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage backed by the hosted record API under `/records/{type}`.
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Connect to the record backend at `base_url` with default options.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpStoreError> {
        Self::with_options(base_url, None, DEFAULT_TIMEOUT)
    }

    /// Connect with an optional bearer token and a request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_options(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HttpStoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        })
    }

    /// URL of a record collection.
    fn collection_url(&self, collection: &str) -> String {
        format!("{}/records/{collection}", self.base_url)
    }

    /// URL of a single record.
    fn record_url(&self, collection: &str, id: impl fmt::Display) -> String {
        format!("{}/records/{collection}/{id}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn fetch<T: DeserializeOwned>(response: Response) -> Result<T, HttpStoreError> {
        let response = Self::ensure_success(response)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn ensure_success(response: Response) -> Result<Response, HttpStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(HttpStoreError::Status {
            status,
            message: error_message(status, &body),
        })
    }

    /// Load every task record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub fn list_tasks(&self) -> Result<Vec<Task>, HttpStoreError> {
        let url = self.collection_url(TASK_COLLECTION);
        debug!(%url, "Listing tasks");
        let response = self.authorize(self.client.get(url)).send()?;
        Self::fetch(response)
    }

    /// Load tasks whose `updatedAt` is at or after `since`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub fn list_tasks_modified_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<Task>, HttpStoreError> {
        let url = self.collection_url(TASK_COLLECTION);
        let since = rfc3339_param(since)?;
        debug!(%url, %since, "Listing modified tasks");
        let request = self
            .client
            .get(url)
            .query(&[(MODIFIED_SINCE_PARAM, since.as_str())]);
        let response = self.authorize(request).send()?;
        Self::fetch(response)
    }

    /// Fetch a single task, or `None` when the backend has no such record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, HttpStoreError> {
        let url = self.record_url(TASK_COLLECTION, id);
        debug!(%id, "Fetching task");
        let response = self.authorize(self.client.get(url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::fetch(response)?))
    }

    /// Create a task record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects the record.
    pub fn create_task(&self, task: &Task) -> Result<(), HttpStoreError> {
        let url = self.collection_url(TASK_COLLECTION);
        let response = self.authorize(self.client.post(url).json(task)).send()?;
        Self::ensure_success(response)?;
        info!(task_id = %task.id, "Created task");
        Ok(())
    }

    /// Overwrite an existing task record.
    ///
    /// # Errors
    /// Returns [`HttpStoreError::NotFound`] when the backend has no such record,
    /// or another error if the request fails.
    pub fn update_task(&self, task: &Task) -> Result<(), HttpStoreError> {
        let url = self.record_url(TASK_COLLECTION, task.id);
        let response = self.authorize(self.client.patch(url).json(task)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(HttpStoreError::NotFound(format!("task {}", task.id)));
        }
        Self::ensure_success(response)?;
        info!(task_id = %task.id, "Updated task");
        Ok(())
    }

    /// Delete a task record, reporting whether it existed.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub fn delete_task(&self, id: TaskId) -> Result<bool, HttpStoreError> {
        let url = self.record_url(TASK_COLLECTION, id);
        let response = self.authorize(self.client.delete(url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::ensure_success(response)?;
        info!(task_id = %id, "Deleted task");
        Ok(true)
    }

    /// Load every category record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub fn list_categories(&self) -> Result<Vec<Category>, HttpStoreError> {
        let url = self.collection_url(CATEGORY_COLLECTION);
        debug!(%url, "Listing categories");
        let response = self.authorize(self.client.get(url)).send()?;
        Self::fetch(response)
    }

    /// Fetch a single category, or `None` when the backend has no such record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded.
    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>, HttpStoreError> {
        let url = self.record_url(CATEGORY_COLLECTION, id);
        debug!(%id, "Fetching category");
        let response = self.authorize(self.client.get(url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::fetch(response)?))
    }

    /// Create a category record.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects the record.
    pub fn create_category(&self, category: &Category) -> Result<(), HttpStoreError> {
        let url = self.collection_url(CATEGORY_COLLECTION);
        let response = self
            .authorize(self.client.post(url).json(category))
            .send()?;
        Self::ensure_success(response)?;
        info!(category_id = %category.id, "Created category");
        Ok(())
    }

    /// Overwrite an existing category record.
    ///
    /// # Errors
    /// Returns [`HttpStoreError::NotFound`] when the backend has no such record,
    /// or another error if the request fails.
    pub fn update_category(&self, category: &Category) -> Result<(), HttpStoreError> {
        let url = self.record_url(CATEGORY_COLLECTION, category.id);
        let response = self
            .authorize(self.client.patch(url).json(category))
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(HttpStoreError::NotFound(format!(
                "category {}",
                category.id
            )));
        }
        Self::ensure_success(response)?;
        info!(category_id = %category.id, "Updated category");
        Ok(())
    }

    /// Delete a category record, reporting whether it existed.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub fn delete_category(&self, id: CategoryId) -> Result<bool, HttpStoreError> {
        let url = self.record_url(CATEGORY_COLLECTION, id);
        let response = self.authorize(self.client.delete(url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::ensure_success(response)?;
        info!(category_id = %id, "Deleted category");
        Ok(true)
    }
}

/// Format a timestamp for a range query, normalized to UTC.
fn rfc3339_param(moment: OffsetDateTime) -> Result<String, HttpStoreError> {
    Ok(moment.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Extract the backend's error message from a response body, falling back to
/// the status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        })
}
