//! Identifier types for store records.
//!
//! The store hands out two identifiers. The numeric ID is a working-set index
//! that is only meaningful while a task is pending and is renumbered whenever
//! the store compacts its pending list. The UUID is assigned once and survives
//! every status change, so it is the only identifier safe to keep across
//! calls.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Working-set task number, valid only while the task is pending or waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskNumber(u64);

impl TaskNumber {
    /// Creates a validated task number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskNumber`] when the value is not
    /// strictly positive.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u64::try_from(value)
            .ok()
            .filter(|number| *number > 0)
            .map(Self)
            .ok_or(TaskDomainError::InvalidTaskNumber(value))
    }

    /// Creates a task number from a store-provided value, treating zero as
    /// "no working-set number".
    #[must_use]
    pub const fn from_store(value: u64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifetime-stable task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskUuid(Uuid);

impl TaskUuid {
    /// Generates a fresh identifier for a task about to be created.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TaskUuid {
    type Err = TaskDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidUuid(value.to_owned()))
    }
}

impl fmt::Display for TaskUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Caller-supplied reference to a single task.
///
/// At least one identifier is always present. When both are present the UUID
/// is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskSelector {
    task_id: Option<TaskNumber>,
    uuid: Option<TaskUuid>,
}

impl TaskSelector {
    /// Builds a selector from raw caller input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingIdentifier`] when neither value is
    /// supplied, or the parse error for a malformed identifier.
    pub fn new(task_id: Option<i64>, uuid: Option<&str>) -> Result<Self, TaskDomainError> {
        let parsed_uuid = uuid
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::parse::<TaskUuid>)
            .transpose()?;
        let parsed_id = task_id.map(TaskNumber::new).transpose()?;
        if parsed_uuid.is_none() && parsed_id.is_none() {
            return Err(TaskDomainError::MissingIdentifier);
        }
        Ok(Self {
            task_id: parsed_id,
            uuid: parsed_uuid,
        })
    }

    /// Selects a task by working-set number only.
    #[must_use]
    pub const fn by_number(task_id: TaskNumber) -> Self {
        Self {
            task_id: Some(task_id),
            uuid: None,
        }
    }

    /// Selects a task by UUID only.
    #[must_use]
    pub const fn by_uuid(uuid: TaskUuid) -> Self {
        Self {
            task_id: None,
            uuid: Some(uuid),
        }
    }

    /// Returns the numeric identifier, if supplied.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskNumber> {
        self.task_id
    }

    /// Returns the UUID, if supplied.
    #[must_use]
    pub const fn uuid(&self) -> Option<TaskUuid> {
        self.uuid
    }
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.uuid, self.task_id) {
            (Some(uuid), _) => write!(f, "UUID {uuid}"),
            (None, Some(task_id)) => write!(f, "ID {task_id}"),
            (None, None) => write!(f, "<unspecified>"),
        }
    }
}
