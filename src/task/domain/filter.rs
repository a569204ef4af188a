//! Multi-predicate task selection.

use super::{Priority, StatusScope, TaskDomainError, TaskRecord, TaskStatus, timestamp};
use chrono::{DateTime, Utc};

/// Caller-supplied predicate bundle shared by every filtering entry point.
///
/// Predicates are AND-combined. Within `tags` the match is OR: a record
/// qualifies when it carries at least one of the listed tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    status: Option<TaskStatus>,
    project: Option<String>,
    tags: Vec<String>,
    priority: Option<Priority>,
    description_contains: Option<String>,
    due_before: Option<DateTime<Utc>>,
    due_after: Option<DateTime<Utc>>,
    limit: Option<usize>,
}

impl FilterSpec {
    /// Creates a filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the store scope to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requires an exact project match.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Requires at least one of `tags`.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Requires an exact priority match.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requires a case-insensitive description substring.
    #[must_use]
    pub fn with_description_containing(mut self, needle: impl Into<String>) -> Self {
        self.description_contains = Some(needle.into().to_lowercase());
        self
    }

    /// Keeps records due strictly before `bound`.
    #[must_use]
    pub const fn with_due_before(mut self, bound: DateTime<Utc>) -> Self {
        self.due_before = Some(bound);
        self
    }

    /// Keeps records due strictly after `bound`.
    #[must_use]
    pub const fn with_due_after(mut self, bound: DateTime<Utc>) -> Self {
        self.due_after = Some(bound);
        self
    }

    /// Parses and applies an ISO-8601 upper due bound.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimestamp`] for an unparseable bound.
    pub fn with_due_before_str(self, bound: &str) -> Result<Self, TaskDomainError> {
        timestamp::parse_input(bound).map(|parsed| self.with_due_before(parsed))
    }

    /// Parses and applies an ISO-8601 lower due bound.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimestamp`] for an unparseable bound.
    pub fn with_due_after_str(self, bound: &str) -> Result<Self, TaskDomainError> {
        timestamp::parse_input(bound).map(|parsed| self.with_due_after(parsed))
    }

    /// Caps the number of results. Zero means no cap.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { None } else { Some(limit) };
        self
    }

    /// Returns the store-level scope implied by the status predicate.
    #[must_use]
    pub fn scope(&self) -> StatusScope {
        self.status.map_or(StatusScope::All, StatusScope::Only)
    }

    /// Returns the result cap.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` when `record` satisfies every predicate.
    ///
    /// Due bounds are strict and are skipped for records with no due date.
    #[must_use]
    pub fn matches(&self, record: &TaskRecord) -> bool {
        if let Some(status) = self.status
            && record.status() != status
        {
            return false;
        }
        if let Some(project) = &self.project
            && record.project() != Some(project.as_str())
        {
            return false;
        }
        if let Some(priority) = self.priority
            && record.priority() != Some(priority)
        {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| record.tags().contains(tag)) {
            return false;
        }
        if let Some(needle) = &self.description_contains
            && !record.description().to_lowercase().contains(needle.as_str())
        {
            return false;
        }
        if let Some(due) = record.due() {
            if self.due_before.is_some_and(|bound| due >= bound) {
                return false;
            }
            if self.due_after.is_some_and(|bound| due <= bound) {
                return false;
            }
        }
        true
    }

    /// Selects the matching subset of `records`, preserving their order and
    /// truncating to the limit.
    #[must_use]
    pub fn evaluate(&self, records: impl IntoIterator<Item = TaskRecord>) -> Vec<TaskRecord> {
        let matching = records.into_iter().filter(|record| self.matches(record));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
