//! Per-record bookkeeping for batch mutations.

use super::{TaskNumber, TaskRecord, TaskUuid};

/// One record the batch changed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSuccess {
    /// Working-set number the record had before the mutation.
    pub task_id: Option<TaskNumber>,
    /// Stable identifier of the record.
    pub uuid: Option<TaskUuid>,
    /// Human-readable outcome.
    pub message: String,
    /// Record as re-read after the mutation.
    pub task: TaskRecord,
}

/// One record the batch could not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Identifier the caller used, or the record reference.
    pub identifier: String,
    /// Error text, passed through from the failing layer.
    pub error: String,
}

/// Outcome of one batch call. Successes and failures are independent; a
/// failure never undoes a sibling's success.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    succeeded: Vec<BatchSuccess>,
    failed: Vec<BatchFailure>,
}

impl BatchResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a success.
    pub fn push_success(&mut self, success: BatchSuccess) {
        self.succeeded.push(success);
    }

    /// Records a failure.
    pub fn push_failure(&mut self, identifier: impl Into<String>, error: impl Into<String>) {
        self.failed.push(BatchFailure {
            identifier: identifier.into(),
            error: error.into(),
        });
    }

    /// Returns the successes in processing order.
    #[must_use]
    pub fn succeeded(&self) -> &[BatchSuccess] {
        &self.succeeded
    }

    /// Returns the failures in processing order.
    #[must_use]
    pub fn failed(&self) -> &[BatchFailure] {
        &self.failed
    }

    /// Number of successes.
    #[must_use]
    pub const fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failures.
    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// `true` only when nothing failed. Partial success is not success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
