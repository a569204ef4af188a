//! Status, priority, and status-scope value types.

use super::{ParsePriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task status as enumerated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is open and carries a working-set number.
    Pending,
    /// Task has been marked done.
    Completed,
    /// Task has been soft-deleted and can still be restored or purged.
    Deleted,
    /// Task is hidden until its wait date passes.
    Waiting,
    /// Task is a recurrence template.
    Recurring,
}

impl TaskStatus {
    /// Returns the canonical store representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
            Self::Waiting => "waiting",
            Self::Recurring => "recurring",
        }
    }

    /// Returns `true` for statuses that keep a working-set number.
    #[must_use]
    pub const fn is_working_set(self) -> bool {
        matches!(self, Self::Pending | Self::Waiting | Self::Recurring)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            "waiting" => Ok(Self::Waiting),
            "recurring" => Ok(Self::Recurring),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// High priority (`H`).
    #[serde(rename = "H")]
    High,
    /// Medium priority (`M`).
    #[serde(rename = "M")]
    Medium,
    /// Low priority (`L`).
    #[serde(rename = "L")]
    Low,
}

impl Priority {
    /// Returns the single-letter store representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "H",
            Self::Medium => "M",
            Self::Low => "L",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(Self::High),
            "M" => Ok(Self::Medium),
            "L" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse store-level pre-filter applied before predicate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusScope {
    /// Every record the store holds.
    #[default]
    All,
    /// Only records with the given status.
    Only(TaskStatus),
}

impl StatusScope {
    /// Parses a caller status, accepting `all` for the unscoped view.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] for values outside the store
    /// enumeration.
    pub fn parse(value: &str) -> Result<Self, ParseTaskStatusError> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        TaskStatus::try_from(value).map(Self::Only)
    }

    /// Returns `true` when a record with `status` belongs to this scope.
    #[must_use]
    pub fn contains(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}
