//! Tool arguments and their conversion into domain values.
//!
//! Scalar update fields keep the absent / empty / present distinction:
//! `None` leaves a field alone, `Some("")` clears it.

use crate::task::domain::{
    FieldChanges, FilterSpec, Priority, StatusScope, TaskDomainError, TaskDraft, TaskSelector,
    TaskStatus, timestamp,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Arguments for `add_task`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddTaskParams {
    /// Task description.
    pub description: String,
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,
    /// Priority letter.
    #[serde(default)]
    pub priority: Option<String>,
    /// Initial tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Due time, ISO-8601.
    #[serde(default)]
    pub due: Option<String>,
}

impl AddTaskParams {
    /// Validates the arguments into a draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] for a blank description, unknown
    /// priority, or unparseable due time.
    pub fn into_draft(self) -> Result<TaskDraft, TaskDomainError> {
        let mut draft = TaskDraft::new(self.description)?;
        if let Some(project) = non_blank(self.project.as_deref()) {
            draft = draft.with_project(project);
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            draft = draft.with_priority(Priority::try_from(priority)?);
        }
        if let Some(tags) = self.tags {
            draft = draft.with_tags(tags);
        }
        if let Some(due) = non_blank(self.due.as_deref()) {
            draft = draft.with_due(timestamp::parse_input(due)?);
        }
        Ok(draft)
    }
}

/// Arguments for `list_tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksParams {
    /// Status scope; `pending` when absent, `all` for every status.
    #[serde(default)]
    pub status: Option<String>,
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,
    /// Tags, any of which must match.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Result cap; zero means no cap.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListTasksParams {
    /// Builds the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::Status`] for an unknown status.
    pub fn into_filter(self) -> Result<FilterSpec, TaskDomainError> {
        let status = self
            .status
            .as_deref()
            .unwrap_or(TaskStatus::Pending.as_str());
        let mut filter = apply_scope(FilterSpec::new(), status)?;
        if let Some(project) = non_blank(self.project.as_deref()) {
            filter = filter.with_project(project);
        }
        if let Some(tags) = self.tags {
            filter = filter.with_tags(tags);
        }
        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit);
        }
        Ok(filter)
    }
}

/// Arguments naming one task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskIdParams {
    /// Working-set number.
    #[serde(default)]
    pub task_id: Option<i64>,
    /// Stable identifier.
    #[serde(default)]
    pub uuid: Option<String>,
}

impl TaskIdParams {
    /// Builds the selector.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingIdentifier`] when both are absent.
    pub fn selector(&self) -> Result<TaskSelector, TaskDomainError> {
        TaskSelector::new(self.task_id, self.uuid.as_deref())
    }
}

/// Arguments for `modify_task`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModifyTaskParams {
    /// Working-set number.
    #[serde(default)]
    pub task_id: Option<i64>,
    /// Stable identifier.
    #[serde(default)]
    pub uuid: Option<String>,
    /// New description; blank is ignored.
    #[serde(default)]
    pub description: Option<String>,
    /// New project; empty clears.
    #[serde(default)]
    pub project: Option<String>,
    /// New priority; empty clears.
    #[serde(default)]
    pub priority: Option<String>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New due time; empty clears.
    #[serde(default)]
    pub due: Option<String>,
}

impl ModifyTaskParams {
    /// Builds the selector and the changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] for a missing identifier or malformed
    /// field value.
    pub fn into_parts(self) -> Result<(TaskSelector, FieldChanges), TaskDomainError> {
        let selector = TaskSelector::new(self.task_id, self.uuid.as_deref())?;
        let mut changes = FieldChanges::from_scalar_input(
            self.project.as_deref(),
            self.priority.as_deref(),
            self.due.as_deref(),
        )?;
        if let Some(description) = self.description {
            changes = changes.with_description(description);
        }
        if let Some(tags) = self.tags {
            changes = changes.with_tags(tags);
        }
        Ok((selector, changes))
    }
}

/// Arguments for `restore_task`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestoreTaskParams {
    /// Historical working-set number.
    #[serde(default)]
    pub task_id: Option<i64>,
    /// Stable identifier.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Status to restore into; `pending` when absent.
    #[serde(default)]
    pub status: Option<String>,
}

impl RestoreTaskParams {
    /// Builds the selector and target status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] for a missing identifier or unknown
    /// status.
    pub fn into_parts(self) -> Result<(TaskSelector, TaskStatus), TaskDomainError> {
        let selector = TaskSelector::new(self.task_id, self.uuid.as_deref())?;
        let target = match non_blank(self.status.as_deref()) {
            Some(status) => TaskStatus::try_from(status)?,
            None => TaskStatus::Pending,
        };
        Ok((selector, target))
    }
}

/// Arguments for `batch_*_by_ids`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchIdsParams {
    /// Working-set numbers, processed in order.
    pub task_ids: Vec<i64>,
    /// Optional number-to-UUID map upgrading entries to UUID lookup.
    #[serde(default)]
    pub task_uuids: Option<BTreeMap<String, String>>,
}

impl BatchIdsParams {
    /// Builds one selector per number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingSelection`] for an empty ID list,
    /// and [`TaskDomainError`] for a non-positive number or malformed UUID,
    /// before anything is touched.
    pub fn selectors(&self) -> Result<Vec<TaskSelector>, TaskDomainError> {
        if self.task_ids.is_empty() {
            return Err(TaskDomainError::MissingSelection);
        }
        selectors_for(&self.task_ids, self.task_uuids.as_ref())
    }
}

/// Filter arguments shared by every `by_filter` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchFilterParams {
    /// Status scope; every status when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,
    /// Tags, any of which must match.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Priority letter.
    #[serde(default)]
    pub priority: Option<String>,
    /// Case-insensitive description substring.
    #[serde(default)]
    pub description_contains: Option<String>,
    /// Exclusive upper due bound.
    #[serde(default)]
    pub due_before: Option<String>,
    /// Exclusive lower due bound.
    #[serde(default)]
    pub due_after: Option<String>,
    /// Result cap; zero means no cap.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl BatchFilterParams {
    /// Builds the filter, failing fast on malformed bounds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] for an unknown status or priority, or an
    /// unparseable due bound.
    pub fn into_filter(self) -> Result<FilterSpec, TaskDomainError> {
        let mut filter = FilterSpec::new();
        if let Some(status) = non_blank(self.status.as_deref()) {
            filter = apply_scope(filter, status)?;
        }
        if let Some(project) = non_blank(self.project.as_deref()) {
            filter = filter.with_project(project);
        }
        if let Some(tags) = self.tags {
            filter = filter.with_tags(tags);
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            filter = filter.with_priority(Priority::try_from(priority)?);
        }
        if let Some(needle) = non_blank(self.description_contains.as_deref()) {
            filter = filter.with_description_containing(needle);
        }
        if let Some(bound) = non_blank(self.due_before.as_deref()) {
            filter = filter.with_due_before_str(bound)?;
        }
        if let Some(bound) = non_blank(self.due_after.as_deref()) {
            filter = filter.with_due_after_str(bound)?;
        }
        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit);
        }
        Ok(filter)
    }
}

/// Arguments for `batch_modify_tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchModifyParams {
    /// Explicit working-set numbers; take precedence over `filters`.
    #[serde(default)]
    pub task_ids: Option<Vec<i64>>,
    /// Optional number-to-UUID map.
    #[serde(default)]
    pub task_uuids: Option<BTreeMap<String, String>>,
    /// Filter criteria.
    #[serde(default)]
    pub filters: Option<BatchFilterParams>,
    /// Project to set; empty clears.
    #[serde(default)]
    pub project: Option<String>,
    /// Priority to set; empty clears.
    #[serde(default)]
    pub priority: Option<String>,
    /// Tags to add.
    #[serde(default)]
    pub add_tags: Option<Vec<String>>,
    /// Tags to remove.
    #[serde(default)]
    pub remove_tags: Option<Vec<String>>,
    /// Due time to set; empty clears.
    #[serde(default)]
    pub due: Option<String>,
}

/// How a batch call picks its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSelection {
    /// Explicit identifiers.
    Selectors(Vec<TaskSelector>),
    /// Filter criteria.
    Filter(FilterSpec),
}

impl BatchModifyParams {
    /// Builds the selection and the changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingSelection`] when neither IDs nor
    /// filters are supplied, or the parse error for a malformed value.
    pub fn into_parts(self) -> Result<(BatchSelection, FieldChanges), TaskDomainError> {
        let selection = match (self.task_ids, self.filters) {
            (Some(task_ids), _) if !task_ids.is_empty() => BatchSelection::Selectors(
                selectors_for(&task_ids, self.task_uuids.as_ref())?,
            ),
            (_, Some(filters)) => BatchSelection::Filter(filters.into_filter()?),
            _ => return Err(TaskDomainError::MissingSelection),
        };
        let changes = FieldChanges::from_scalar_input(
            self.project.as_deref(),
            self.priority.as_deref(),
            self.due.as_deref(),
        )?
        .adding_tags(self.add_tags.unwrap_or_default())
        .removing_tags(self.remove_tags.unwrap_or_default());
        Ok((selection, changes))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn apply_scope(filter: FilterSpec, status: &str) -> Result<FilterSpec, TaskDomainError> {
    Ok(match StatusScope::parse(status)? {
        StatusScope::All => filter,
        StatusScope::Only(only) => filter.with_status(only),
    })
}

fn selectors_for(
    task_ids: &[i64],
    task_uuids: Option<&BTreeMap<String, String>>,
) -> Result<Vec<TaskSelector>, TaskDomainError> {
    task_ids
        .iter()
        .map(|task_id| {
            let uuid = task_uuids
                .and_then(|map| map.get(&task_id.to_string()))
                .map(String::as_str);
            TaskSelector::new(Some(*task_id), uuid)
        })
        .collect()
}
