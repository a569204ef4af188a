//! Filtered reads over the store.

use super::error::TaskServiceResult;
use crate::task::{
    domain::{FilterSpec, StatusScope, TaskRecord},
    ports::TaskStore,
};
use std::sync::Arc;

/// Read-side service applying [`FilterSpec`] predicates.
#[derive(Clone)]
pub struct TaskQueryService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
}

impl<S> TaskQueryService<S>
where
    S: TaskStore,
{
    /// Creates a query service over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the records matching `filter`, in store order.
    ///
    /// The status predicate is pushed down to the store as a scope; every
    /// other predicate is evaluated here.
    ///
    /// # Errors
    ///
    /// Returns a store error when the candidate set cannot be read.
    pub async fn select(&self, filter: &FilterSpec) -> TaskServiceResult<Vec<TaskRecord>> {
        let candidates = self.scan(filter.scope()).await?;
        Ok(filter.evaluate(candidates))
    }

    /// Returns every record in `scope`, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns a store error when the records cannot be read.
    pub async fn scan(&self, scope: StatusScope) -> TaskServiceResult<Vec<TaskRecord>> {
        Ok(self
            .store
            .list(scope)
            .await?
            .iter()
            .map(TaskRecord::from_raw)
            .collect())
    }
}
