//! Restore and purge of soft-deleted tasks.

use super::error::{TaskServiceError, TaskServiceResult};
use super::resolver::{IdentifierResolver, ResolutionConfidence};
use crate::task::{
    domain::{StatusScope, TaskDomainError, TaskRecord, TaskSelector, TaskStatus},
    ports::{CommandOutcome, PrivilegedCommands, TaskStore},
};
use std::sync::Arc;
use thiserror::Error;

/// Which command path brought a task back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePath {
    /// The direct status overwrite was accepted.
    DirectStatus,
    /// The overwrite was refused and `undelete` succeeded instead.
    Undelete,
}

/// A successfully restored task.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    /// The record as re-read after restoring.
    pub task: TaskRecord,
    /// Status the caller asked for.
    pub target: TaskStatus,
    /// How confidently the deleted record was identified.
    pub confidence: ResolutionConfidence,
    /// Command path that succeeded.
    pub path: RestorePath,
}

/// A successful purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    /// Deleted tasks counted before the purge ran.
    pub purged_count: usize,
}

/// A failed purge, carrying how many candidates were found first.
#[derive(Debug, Clone, Error)]
#[error("{cause}")]
pub struct PurgeFailure {
    /// Deleted tasks counted before the failure, when counting succeeded.
    pub found_deleted_count: Option<usize>,
    /// The underlying failure.
    pub cause: TaskServiceError,
}

/// Recovery operations over the privileged command surface.
#[derive(Clone)]
pub struct RecoveryService<S, P>
where
    S: TaskStore,
    P: PrivilegedCommands,
{
    store: Arc<S>,
    commands: Arc<P>,
    resolver: IdentifierResolver<S>,
}

impl<S, P> RecoveryService<S, P>
where
    S: TaskStore,
    P: PrivilegedCommands,
{
    /// Creates a recovery service.
    #[must_use]
    pub fn new(store: Arc<S>, commands: Arc<P>) -> Self {
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&store)),
            store,
            commands,
        }
    }

    /// Returns a deleted task to `target`.
    ///
    /// Tries a direct status overwrite first. If the store refuses it, runs
    /// `undelete` and, for a non-pending target, sets the status with a
    /// second write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for a `deleted` or
    /// `recurring` target, [`TaskServiceError::NotFound`] when no deleted
    /// record can be chosen, [`TaskServiceError::CommandRejected`] with the
    /// store's text when both paths fail, and [`TaskServiceError::Timeout`]
    /// when a command exceeds its bound.
    pub async fn restore(
        &self,
        selector: &TaskSelector,
        target: TaskStatus,
    ) -> TaskServiceResult<RestoreOutcome> {
        if matches!(target, TaskStatus::Deleted | TaskStatus::Recurring) {
            return Err(TaskDomainError::InvalidRestoreTarget(target.to_string()).into());
        }

        let resolution = self.resolver.resolve_deleted(selector).await?;
        let uuid = resolution
            .record
            .uuid()
            .ok_or_else(|| TaskServiceError::NotFound(resolution.record.reference()))?;

        let path = match self.commands.set_status(uuid, target).await {
            CommandOutcome::Applied => RestorePath::DirectStatus,
            CommandOutcome::TimedOut(after) => return Err(TaskServiceError::Timeout(after)),
            CommandOutcome::Rejected(reason) => {
                tracing::info!(uuid = %uuid, reason = %reason, "direct restore refused; trying undelete");
                match self.commands.undelete(uuid).await {
                    CommandOutcome::Applied => RestorePath::Undelete,
                    CommandOutcome::TimedOut(after) => {
                        return Err(TaskServiceError::Timeout(after));
                    }
                    CommandOutcome::Rejected(undelete_reason) => {
                        return Err(TaskServiceError::CommandRejected(format!(
                            "Failed to restore task: {undelete_reason}"
                        )));
                    }
                }
            }
        };

        let mut task = self.reread(&resolution.record).await?;
        if path == RestorePath::Undelete && task.status() != target {
            task.set_status(target);
            self.store.save(&task).await?;
            task = self.reread(&resolution.record).await?;
        }

        tracing::info!(uuid = %uuid, status = %target, path = ?path, "task restored");
        Ok(RestoreOutcome {
            task,
            target,
            confidence: resolution.confidence,
            path,
        })
    }

    /// Permanently erases every deleted task.
    ///
    /// Counts deleted tasks first. With nothing to purge the destructive
    /// command is not run at all.
    ///
    /// # Errors
    ///
    /// Returns [`PurgeFailure`] with the pre-counted total when the command
    /// is refused or times out.
    pub async fn purge(&self) -> Result<PurgeReport, PurgeFailure> {
        let found = self
            .store
            .list(StatusScope::Only(TaskStatus::Deleted))
            .await
            .map_err(|err| PurgeFailure {
                found_deleted_count: None,
                cause: err.into(),
            })?
            .len();
        if found == 0 {
            return Ok(PurgeReport { purged_count: 0 });
        }

        let cause = match self.commands.purge_deleted().await {
            CommandOutcome::Applied => {
                tracing::info!(purged = found, "deleted tasks purged");
                return Ok(PurgeReport {
                    purged_count: found,
                });
            }
            CommandOutcome::Rejected(reason) => {
                TaskServiceError::CommandRejected(format!("Purge command failed: {reason}"))
            }
            CommandOutcome::TimedOut(after) => TaskServiceError::Timeout(after),
        };
        tracing::warn!(found, error = %cause, "purge failed");
        Err(PurgeFailure {
            found_deleted_count: Some(found),
            cause,
        })
    }

    async fn reread(&self, record: &TaskRecord) -> TaskServiceResult<TaskRecord> {
        let uuid = record
            .uuid()
            .ok_or_else(|| TaskServiceError::NotFound(record.reference()))?;
        self.store
            .find_by_uuid(uuid)
            .await?
            .map(|raw| TaskRecord::from_raw(&raw))
            .ok_or_else(|| TaskServiceError::NotFound(uuid.to_string()))
    }
}
