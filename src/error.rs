//! Error types shared by every operation.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by reference parsing, process execution and provisioning.
///
/// File fetches do not surface remote failures through this type; they
/// collapse them into `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference string is not an SSH URL, HTTPS URL or `owner/repo` slug.
    #[error("invalid repository reference: {0}")]
    InvalidReference(String),

    /// A path argument was empty or did not point at a usable location.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The external CLI is missing or not authenticated.
    #[error("{0}")]
    ToolingUnavailable(String),

    /// An external command exited non-zero or an HTTP request was not 2xx.
    #[error("{operation} failed: {detail}")]
    OperationFailed { operation: String, detail: String },

    /// An external command exceeded the configured timeout and was killed.
    #[error("{command} timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn failed(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::OperationFailed { operation: operation.into(), detail: detail.into() }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
