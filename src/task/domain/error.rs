//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating caller-supplied task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The numeric task identifier is not a positive integer.
    #[error("invalid task ID {0}, expected a positive integer")]
    InvalidTaskNumber(i64),

    /// The task UUID could not be parsed.
    #[error("invalid task UUID '{0}'")]
    InvalidUuid(String),

    /// Neither a numeric ID nor a UUID was supplied.
    #[error("either task_id or uuid must be provided")]
    MissingIdentifier,

    /// A batch call supplied neither explicit IDs nor filter criteria.
    #[error("either task_ids or filters must be provided")]
    MissingSelection,

    /// A timestamp could not be parsed as ISO-8601.
    #[error("invalid timestamp '{0}', expected ISO-8601 such as 2025-08-22T18:00:00Z")]
    InvalidTimestamp(String),

    /// The status value is not part of the store enumeration.
    #[error(transparent)]
    Status(#[from] ParseTaskStatusError),

    /// The priority value is not one of `H`, `M`, or `L`.
    #[error(transparent)]
    Priority(#[from] ParsePriorityError),

    /// A restore was requested into a status a restore cannot produce.
    #[error("cannot restore a task into status '{0}'")]
    InvalidRestoreTarget(String),
}

/// Error returned while parsing task statuses from caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities from caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid priority '{0}', expected H, M, or L")]
pub struct ParsePriorityError(pub String);
