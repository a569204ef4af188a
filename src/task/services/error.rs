//! Service-level error taxonomy.

use crate::task::{domain::TaskDomainError, ports::TaskStoreError};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by task services.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// Caller input was malformed; raised before any store interaction.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// No record matched the identifier.
    #[error("Task {0} not found")]
    NotFound(String),

    /// The record exists but is in the wrong state for the operation.
    #[error("{0}")]
    PreconditionFailed(String),

    /// The structured store surface failed.
    #[error(transparent)]
    Store(TaskStoreError),

    /// A privileged store command was refused.
    #[error("{0}")]
    CommandRejected(String),

    /// A bounded store command exceeded its time allowance.
    #[error("Operation timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// A report template failed to render.
    #[error("report rendering failed: {0}")]
    Render(String),
}

impl From<TaskStoreError> for TaskServiceError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(reference) => Self::NotFound(reference),
            other => Self::Store(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
