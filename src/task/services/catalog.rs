//! Project, tag, and summary metadata.

use super::error::TaskServiceResult;
use super::query::TaskQueryService;
use crate::task::{
    domain::{StatusScope, TaskSummary},
    ports::TaskStore,
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Aggregate views across all tasks.
#[derive(Clone)]
pub struct TaskCatalogService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    query: TaskQueryService<S>,
    clock: Arc<C>,
}

impl<S, C> TaskCatalogService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a catalog service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            query: TaskQueryService::new(store),
            clock,
        }
    }

    /// Returns every distinct project name, sorted.
    ///
    /// # Errors
    ///
    /// Returns the store error when tasks cannot be read.
    pub async fn projects(&self) -> TaskServiceResult<Vec<String>> {
        let records = self.query.scan(StatusScope::All).await?;
        let projects: BTreeSet<String> = records
            .iter()
            .filter_map(|record| record.project().map(str::to_owned))
            .collect();
        Ok(projects.into_iter().collect())
    }

    /// Returns every distinct tag, sorted.
    ///
    /// # Errors
    ///
    /// Returns the store error when tasks cannot be read.
    pub async fn tags(&self) -> TaskServiceResult<Vec<String>> {
        let records = self.query.scan(StatusScope::All).await?;
        let tags: BTreeSet<String> = records
            .iter()
            .flat_map(|record| record.tags().iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Counts tasks by status and priority and counts overdue tasks.
    ///
    /// # Errors
    ///
    /// Returns the store error when tasks cannot be read.
    pub async fn summary(&self) -> TaskServiceResult<TaskSummary> {
        let records = self.query.scan(StatusScope::All).await?;
        Ok(TaskSummary::compute(&records, self.clock.utc()))
    }
}
