//! Maps caller identifiers to exactly one stored record.

use super::error::{TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{StatusScope, TaskRecord, TaskSelector, TaskStatus},
    ports::TaskStore,
};
use serde::Serialize;
use std::sync::Arc;

/// How much the caller can trust a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionConfidence {
    /// The record matched the supplied UUID or number.
    Exact,
    /// No identifier matched; the most recently deleted record was chosen.
    ///
    /// This is a heuristic and may pick the wrong record when several tasks
    /// were deleted close together.
    MostRecentlyDeleted,
}

/// A resolved record together with how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved record.
    pub record: TaskRecord,
    /// Confidence of the match.
    pub confidence: ResolutionConfidence,
}

/// Identifier resolver.
///
/// UUID lookup is authoritative and works for every status. Number lookup
/// only reaches the working set, since the store renumbers tasks once they
/// leave it.
#[derive(Clone)]
pub struct IdentifierResolver<S>
where
    S: TaskStore,
{
    store: Arc<S>,
}

impl<S> IdentifierResolver<S>
where
    S: TaskStore,
{
    /// Creates a resolver over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves a selector to one record: UUID first, then number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when neither identifier matches.
    pub async fn resolve(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        if let Some(uuid) = selector.uuid()
            && let Some(raw) = self.store.find_by_uuid(uuid).await?
        {
            return Ok(TaskRecord::from_raw(&raw));
        }
        if let Some(task_id) = selector.task_id()
            && let Some(raw) = self.store.find_by_number(task_id).await?
        {
            return Ok(TaskRecord::from_raw(&raw));
        }
        Err(TaskServiceError::NotFound(format!("with {selector}")))
    }

    /// Resolves a selector against the deleted records only.
    ///
    /// Matches by UUID, then by historical number. When only a number was
    /// given and nothing matched, falls back to the most recently deleted
    /// record and reports [`ResolutionConfidence::MostRecentlyDeleted`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no deleted record can be
    /// chosen.
    pub async fn resolve_deleted(&self, selector: &TaskSelector) -> TaskServiceResult<Resolution> {
        let deleted: Vec<TaskRecord> = self
            .store
            .list(StatusScope::Only(TaskStatus::Deleted))
            .await?
            .iter()
            .map(TaskRecord::from_raw)
            .collect();

        let exact = selector
            .uuid()
            .and_then(|uuid| deleted.iter().find(|record| record.uuid() == Some(uuid)))
            .or_else(|| {
                selector.task_id().and_then(|task_id| {
                    deleted.iter().find(|record| record.id() == Some(task_id))
                })
            });
        if let Some(record) = exact {
            return Ok(Resolution {
                record: record.clone(),
                confidence: ResolutionConfidence::Exact,
            });
        }

        if selector.uuid().is_none() && selector.task_id().is_some() {
            let latest = deleted
                .into_iter()
                .max_by_key(|record| record.end().or_else(|| record.modified()));
            if let Some(record) = latest {
                tracing::warn!(
                    selector = %selector,
                    uuid = ?record.uuid(),
                    "no deleted task matched; using the most recently deleted one"
                );
                return Ok(Resolution {
                    record,
                    confidence: ResolutionConfidence::MostRecentlyDeleted,
                });
            }
        }

        Err(TaskServiceError::NotFound(format!("with {selector}")))
    }
}
