//! Store port: the structured surface of the external task database.

use crate::task::domain::{RawTask, StatusScope, TaskDraft, TaskNumber, TaskRecord, TaskUuid};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Structured task store contract.
///
/// Every read returns raw records; callers wrap them with
/// [`TaskRecord::from_raw`]. The store is the only source of truth and
/// provides no multi-record transaction.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new pending task and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Rejected`] when the store refuses the task.
    async fn create(&self, draft: &TaskDraft) -> TaskStoreResult<RawTask>;

    /// Finds a task by UUID in any status.
    async fn find_by_uuid(&self, uuid: TaskUuid) -> TaskStoreResult<Option<RawTask>>;

    /// Finds a task by working-set number.
    ///
    /// Only pending and waiting tasks carry numbers, so completed and deleted
    /// tasks are never found this way.
    async fn find_by_number(&self, task_id: TaskNumber) -> TaskStoreResult<Option<RawTask>>;

    /// Lists records in the given scope, in store order.
    async fn list(&self, scope: StatusScope) -> TaskStoreResult<Vec<RawTask>>;

    /// Writes back a modified record, matched by UUID.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the UUID is unknown.
    async fn save(&self, record: &TaskRecord) -> TaskStoreResult<()>;

    /// Marks a task done.
    async fn done(&self, uuid: TaskUuid) -> TaskStoreResult<()>;

    /// Soft-deletes a task.
    async fn delete(&self, uuid: TaskUuid) -> TaskStoreResult<()>;

    /// Starts time tracking.
    async fn start(&self, uuid: TaskUuid) -> TaskStoreResult<()>;

    /// Stops time tracking.
    async fn stop(&self, uuid: TaskUuid) -> TaskStoreResult<()>;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// No task matched the identifier.
    #[error("task not found: {0}")]
    NotFound(String),

    /// The store refused the operation; carries the store's own text.
    #[error("{0}")]
    Rejected(String),

    /// The store could not be reached or returned unreadable data.
    #[error("store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
