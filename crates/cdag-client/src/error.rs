//! Sync error types.

use cdag_core::DagError;
use thiserror::Error;

/// Generic text shown for failures the user cannot act on.
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

/// Errors from a backend round trip.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing local input; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Backend(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The response could not be applied to the graph.
    #[error("Graph error: {0}")]
    Graph(DagError),

    /// The graph changed while the request was in flight; the result was
    /// dropped.
    #[error("Graph changed while the request was in flight")]
    Stale,
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl From<DagError> for SyncError {
    fn from(err: DagError) -> Self {
        match err {
            DagError::ValidationError(msg) => Self::Validation(msg),
            other => Self::Graph(other),
        }
    }
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// True when the failure happened before any request was issued.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text for the user: validation and backend messages verbatim,
    /// everything else generic.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Backend(msg) => msg.clone(),
            Self::Graph(err) => err.to_string(),
            Self::Stale => "The graph changed. Please try again.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
