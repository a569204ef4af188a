//! Mutation descriptions applied by the batch engine.

use super::{Priority, TaskDomainError, TaskRecord, TaskStatus, timestamp};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Three-way update for an optional scalar field.
///
/// `Keep` (field absent from the request) and `Clear` (field present but
/// empty) are different requests and must stay distinct end to end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Leave the field untouched.
    #[default]
    Keep,
    /// Remove the field's value.
    Clear,
    /// Set the field to a new value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Interprets raw caller input: absent keeps, empty clears, anything else
    /// is parsed.
    ///
    /// # Errors
    ///
    /// Propagates the parser's error for non-empty input.
    pub fn from_input<E>(
        input: Option<&str>,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Self, E> {
        match input.map(str::trim) {
            None => Ok(Self::Keep),
            Some("") => Ok(Self::Clear),
            Some(value) => parse(value).map(Self::Set),
        }
    }

    /// Returns `true` when the update leaves the field untouched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn resolve(&self, current: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

/// Field-level changes for a modify mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldChanges {
    description: Option<String>,
    project: FieldUpdate<String>,
    priority: FieldUpdate<Priority>,
    due: FieldUpdate<DateTime<Utc>>,
    replace_tags: Option<BTreeSet<String>>,
    add_tags: BTreeSet<String>,
    remove_tags: BTreeSet<String>,
}

impl FieldChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description; blank input is ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        self.description = (!value.trim().is_empty()).then(|| value.trim().to_owned());
        self
    }

    /// Sets the project update.
    #[must_use]
    pub fn with_project(mut self, project: FieldUpdate<String>) -> Self {
        self.project = project;
        self
    }

    /// Sets the priority update.
    #[must_use]
    pub const fn with_priority(mut self, priority: FieldUpdate<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due update.
    #[must_use]
    pub const fn with_due(mut self, due: FieldUpdate<DateTime<Utc>>) -> Self {
        self.due = due;
        self
    }

    /// Replaces the whole tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.replace_tags = Some(tags.into_iter().collect());
        self
    }

    /// Adds tags (set union).
    #[must_use]
    pub fn adding_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.add_tags.extend(tags);
        self
    }

    /// Removes tags (set difference).
    #[must_use]
    pub fn removing_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.remove_tags.extend(tags);
        self
    }

    /// Parses raw `project`/`priority`/`due` caller input into updates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] for an invalid priority or timestamp.
    pub fn from_scalar_input(
        project: Option<&str>,
        priority: Option<&str>,
        due: Option<&str>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self::new()
            .with_project(FieldUpdate::from_input(project, |value| {
                Ok::<_, TaskDomainError>(value.to_owned())
            })?)
            .with_priority(FieldUpdate::from_input(priority, |value| {
                Priority::try_from(value).map_err(TaskDomainError::from)
            })?)
            .with_due(FieldUpdate::from_input(due, timestamp::parse_input)?))
    }

    /// Returns `true` when applying the changes would alter nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.project.is_keep()
            && self.priority.is_keep()
            && self.due.is_keep()
            && self.replace_tags.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }

    /// Applies the changes to a freshly read record.
    ///
    /// Tag replacement happens first, then union with `add_tags`, then
    /// difference with `remove_tags`.
    pub fn apply_to(&self, record: &mut TaskRecord) {
        if let Some(description) = &self.description {
            record.set_description(description.clone());
        }
        record.set_project(self.project.resolve(record.project().map(str::to_owned)));
        record.set_priority(self.priority.resolve(record.priority()));
        record.set_due(self.due.resolve(record.due()));
        if let Some(tags) = &self.replace_tags {
            record.replace_tags(tags.iter().cloned());
        }
        record.add_tags(&self.add_tags);
        record.remove_tags(&self.remove_tags);
    }
}

/// Status change applied through the store's lifecycle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTransition {
    /// Mark done.
    Complete,
    /// Soft-delete.
    Delete,
    /// Begin time tracking.
    Start,
    /// End time tracking.
    Stop,
    /// Return a completed task to pending.
    MarkPending,
}

impl StatusTransition {
    /// Past-tense verb used in result messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Complete => "completed",
            Self::Delete => "deleted",
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::MarkPending => "marked as pending",
        }
    }

    /// Status the record must currently have, if the transition has a
    /// precondition.
    #[must_use]
    pub const fn required_status(self) -> Option<TaskStatus> {
        match self {
            Self::MarkPending => Some(TaskStatus::Completed),
            Self::Complete | Self::Delete | Self::Start | Self::Stop => None,
        }
    }
}

/// One logical change applied across a resolved set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Field-level modification.
    Modify(FieldChanges),
    /// Status transition.
    Transition(StatusTransition),
}

impl Mutation {
    /// Past-tense verb used in result messages.
    #[must_use]
    pub const fn past_tense(&self) -> &'static str {
        match self {
            Self::Modify(_) => "modified",
            Self::Transition(transition) => transition.past_tense(),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Modify(_) => "modify",
            Self::Transition(StatusTransition::Complete) => "complete",
            Self::Transition(StatusTransition::Delete) => "delete",
            Self::Transition(StatusTransition::Start) => "start",
            Self::Transition(StatusTransition::Stop) => "stop",
            Self::Transition(StatusTransition::MarkPending) => "uncomplete",
        };
        f.write_str(verb)
    }
}
