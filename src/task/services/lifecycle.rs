//! Single-task operations.

use super::batch::BatchMutationService;
use super::error::TaskServiceResult;
use super::query::TaskQueryService;
use super::resolver::IdentifierResolver;
use crate::task::{
    domain::{
        FieldChanges, FilterSpec, Mutation, StatusTransition, TaskDraft, TaskRecord,
        TaskSelector,
    },
    ports::TaskStore,
};
use std::sync::Arc;

/// Task lifecycle orchestration service.
///
/// Each operation resolves its selector and then runs through the same
/// single-record path the batch engine uses.
#[derive(Clone)]
pub struct TaskLifecycleService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    resolver: IdentifierResolver<S>,
    query: TaskQueryService<S>,
    mutations: BatchMutationService<S>,
}

impl<S> TaskLifecycleService<S>
where
    S: TaskStore,
{
    /// Creates a lifecycle service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&store)),
            query: TaskQueryService::new(Arc::clone(&store)),
            mutations: BatchMutationService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns the store error when the task cannot be created.
    pub async fn add(&self, draft: &TaskDraft) -> TaskServiceResult<TaskRecord> {
        let raw = self.store.create(draft).await?;
        Ok(TaskRecord::from_raw(&raw))
    }

    /// Lists tasks matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the store error when tasks cannot be read.
    pub async fn list(&self, filter: &FilterSpec) -> TaskServiceResult<Vec<TaskRecord>> {
        self.query.select(filter).await
    }

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the selector matches nothing.
    pub async fn get(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.resolver.resolve(selector).await
    }

    /// Applies field changes to one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the store error.
    pub async fn modify(
        &self,
        selector: &TaskSelector,
        changes: FieldChanges,
    ) -> TaskServiceResult<TaskRecord> {
        self.mutate(selector, &Mutation::Modify(changes)).await
    }

    /// Marks one task done.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the store error.
    pub async fn complete(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.transition(selector, StatusTransition::Complete).await
    }

    /// Returns one completed task to pending.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionFailed` when the task is not completed.
    pub async fn uncomplete(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.transition(selector, StatusTransition::MarkPending).await
    }

    /// Soft-deletes one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the store error.
    pub async fn delete(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.transition(selector, StatusTransition::Delete).await
    }

    /// Starts time tracking on one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the store error.
    pub async fn start(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.transition(selector, StatusTransition::Start).await
    }

    /// Stops time tracking on one task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or the store error.
    pub async fn stop(&self, selector: &TaskSelector) -> TaskServiceResult<TaskRecord> {
        self.transition(selector, StatusTransition::Stop).await
    }

    async fn transition(
        &self,
        selector: &TaskSelector,
        transition: StatusTransition,
    ) -> TaskServiceResult<TaskRecord> {
        self.mutate(selector, &Mutation::Transition(transition))
            .await
    }

    async fn mutate(
        &self,
        selector: &TaskSelector,
        mutation: &Mutation,
    ) -> TaskServiceResult<TaskRecord> {
        let record = self.resolver.resolve(selector).await?;
        self.mutations
            .apply_one(&record, mutation, &selector.to_string())
            .await
    }
}
