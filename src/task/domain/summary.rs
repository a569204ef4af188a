//! Aggregate counts over the task collection.

use super::{Priority, TaskRecord, TaskStatus, timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Record counts per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    /// Pending records.
    pub pending: usize,
    /// Waiting records.
    pub waiting: usize,
    /// Completed records.
    pub completed: usize,
    /// Soft-deleted records.
    pub deleted: usize,
    /// All records.
    pub total: usize,
}

/// Pending-record counts per priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityCounts {
    /// High priority.
    #[serde(rename = "H")]
    pub high: usize,
    /// Medium priority.
    #[serde(rename = "M")]
    pub medium: usize,
    /// Low priority.
    #[serde(rename = "L")]
    pub low: usize,
    /// No priority set.
    #[serde(rename = "None")]
    pub unset: usize,
}

/// Summary statistics for the whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskSummary {
    /// Counts per status.
    pub status: StatusCounts,
    /// Counts per priority among pending tasks.
    pub priority: PriorityCounts,
    /// Pending tasks whose due date lies strictly before the evaluation
    /// instant.
    pub overdue: usize,
}

impl TaskSummary {
    /// Computes the summary over every record at instant `now`.
    #[must_use]
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a TaskRecord>, now: DateTime<Utc>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.status.total += 1;
            match record.status() {
                TaskStatus::Pending => summary.count_pending(record, &now),
                TaskStatus::Waiting => summary.status.waiting += 1,
                TaskStatus::Completed => summary.status.completed += 1,
                TaskStatus::Deleted => summary.status.deleted += 1,
                TaskStatus::Recurring => {}
            }
        }
        summary
    }

    fn count_pending(&mut self, record: &TaskRecord, now: &DateTime<Utc>) {
        self.status.pending += 1;
        match record.priority() {
            Some(Priority::High) => self.priority.high += 1,
            Some(Priority::Medium) => self.priority.medium += 1,
            Some(Priority::Low) => self.priority.low += 1,
            None => self.priority.unset += 1,
        }
        if record
            .due()
            .is_some_and(|due| timestamp::is_overdue(&due, now))
        {
            self.overdue += 1;
        }
    }
}
