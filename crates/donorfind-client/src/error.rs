use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the donor API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status. `body` is the response text.
    #[error("{status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request was rejected before being sent.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status code, when the failure came from a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors accessing the auto-enrich ledger directory.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access ledger {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
