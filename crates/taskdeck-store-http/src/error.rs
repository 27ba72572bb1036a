//! Error types for taskdeck store operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during `HttpStore` operations.
#[derive(Error, Debug)]
pub enum HttpStoreError {
    /// Record was not found in the backend.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// Status line of the response.
        status: StatusCode,
        /// Message from the response body, or the canonical reason phrase.
        message: String,
    },

    /// HTTP transport failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to decode a response body.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failed to format a timestamp for a query parameter.
    #[error("Failed to encode query parameter: {0}")]
    Encode(#[from] time::error::Format),
}
