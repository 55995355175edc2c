//! Centralized error types for the graph core.

use thiserror::Error;

use crate::graph::model::Id;

/// Main error type for graph state operations.
#[derive(Error, Debug)]
pub enum DagError {
    #[error("Node not found: {0}")]
    NodeNotFound(Id),

    #[error("Edge not found: {0}")]
    EdgeNotFound(Id),

    #[error("Duplicate id: {0}")]
    DuplicateId(Id),

    #[error("Edge endpoint '{0}' does not reference an existing node")]
    DanglingEndpoint(Id),

    #[error("{0}")]
    ValidationError(String),
}

/// Result type for graph state operations.
pub type DagResult<T> = Result<T, DagError>;

impl DagError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// True for errors caused by missing or malformed user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}
