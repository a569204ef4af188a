//! Batch mutation engine.
//!
//! Applies one [`Mutation`] across many records. Each record is re-read,
//! changed, persisted, and re-read again on its own; a failure is recorded
//! against that record and processing moves on. Nothing is rolled back.

use super::error::{TaskServiceError, TaskServiceResult};
use super::query::TaskQueryService;
use super::resolver::IdentifierResolver;
use crate::task::{
    domain::{
        BatchResult, BatchSuccess, FilterSpec, Mutation, StatusTransition, TaskRecord,
        TaskSelector,
    },
    ports::TaskStore,
};
use std::sync::Arc;

/// Service applying mutations to one or many records.
#[derive(Clone)]
pub struct BatchMutationService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    resolver: IdentifierResolver<S>,
    query: TaskQueryService<S>,
}

impl<S> BatchMutationService<S>
where
    S: TaskStore,
{
    /// Creates a batch service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&store)),
            query: TaskQueryService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Applies `mutation` to one record and returns it as re-read afterwards.
    ///
    /// `label` names the record in error text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the record vanished,
    /// [`TaskServiceError::PreconditionFailed`] when the transition does not
    /// apply to the record's current status, or the store error.
    pub async fn apply_one(
        &self,
        record: &TaskRecord,
        mutation: &Mutation,
        label: &str,
    ) -> TaskServiceResult<TaskRecord> {
        let uuid = record
            .uuid()
            .ok_or_else(|| TaskServiceError::NotFound(label.to_owned()))?;
        let mut current = self.reread(record, label).await?;

        match mutation {
            Mutation::Modify(changes) => {
                changes.apply_to(&mut current);
                self.store.save(&current).await?;
            }
            Mutation::Transition(transition) => {
                if let Some(required) = transition.required_status()
                    && current.status() != required
                {
                    return Err(TaskServiceError::PreconditionFailed(format!(
                        "Task {label} is not {required} (current status: {})",
                        current.status()
                    )));
                }
                match transition {
                    StatusTransition::Complete => self.store.done(uuid).await?,
                    StatusTransition::Delete => self.store.delete(uuid).await?,
                    StatusTransition::Start => self.store.start(uuid).await?,
                    StatusTransition::Stop => self.store.stop(uuid).await?,
                    StatusTransition::MarkPending => {
                        current.reopen();
                        self.store.save(&current).await?;
                    }
                }
            }
        }

        tracing::debug!(uuid = %uuid, mutation = %mutation, "task mutated");
        self.reread(record, label).await
    }

    /// Applies `mutation` to each record independently.
    pub async fn apply(&self, records: &[TaskRecord], mutation: &Mutation) -> BatchResult {
        let mut result = BatchResult::new();
        for record in records {
            self.apply_recording(&mut result, record, mutation, &record.reference())
                .await;
        }
        log_outcome(mutation, &result);
        result
    }

    /// Resolves every selector, then applies `mutation` to each match.
    ///
    /// Resolution completes before the first mutation, so renumbering
    /// caused by an earlier completion cannot redirect a later selector.
    /// Unresolvable selectors are recorded as failures.
    pub async fn apply_to_selectors(
        &self,
        selectors: &[TaskSelector],
        mutation: &Mutation,
    ) -> BatchResult {
        let mut resolved = Vec::with_capacity(selectors.len());
        for selector in selectors {
            let label = selector_label(selector);
            let outcome = self.resolver.resolve(selector).await;
            resolved.push((label, outcome));
        }

        let mut result = BatchResult::new();
        for (label, outcome) in resolved {
            match outcome {
                Ok(record) => {
                    self.apply_recording(&mut result, &record, mutation, &label)
                        .await;
                }
                Err(TaskServiceError::NotFound(_)) => {
                    result.push_failure(&label, format!("Task {label} not found"));
                }
                Err(err) => {
                    result.push_failure(&label, failure_text(mutation, &label, &err));
                }
            }
        }
        log_outcome(mutation, &result);
        result
    }

    /// Selects records with `filter`, then applies `mutation` to each.
    ///
    /// # Errors
    ///
    /// Returns the store error when the candidate set cannot be read; no
    /// record is touched in that case.
    pub async fn apply_to_filter(
        &self,
        filter: &FilterSpec,
        mutation: &Mutation,
    ) -> TaskServiceResult<BatchResult> {
        let records = self.query.select(filter).await?;
        Ok(self.apply(&records, mutation).await)
    }

    async fn apply_recording(
        &self,
        result: &mut BatchResult,
        record: &TaskRecord,
        mutation: &Mutation,
        label: &str,
    ) {
        match self.apply_one(record, mutation, label).await {
            Ok(task) => result.push_success(BatchSuccess {
                task_id: record.id(),
                uuid: record.uuid(),
                message: format!("Task {label} {}", mutation.past_tense()),
                task,
            }),
            Err(err) => {
                tracing::warn!(task = %label, mutation = %mutation, error = %err, "batch item failed");
                result.push_failure(label, failure_text(mutation, label, &err));
            }
        }
    }

    async fn reread(&self, record: &TaskRecord, label: &str) -> TaskServiceResult<TaskRecord> {
        let uuid = record
            .uuid()
            .ok_or_else(|| TaskServiceError::NotFound(label.to_owned()))?;
        self.store
            .find_by_uuid(uuid)
            .await?
            .map(|raw| TaskRecord::from_raw(&raw))
            .ok_or_else(|| TaskServiceError::NotFound(label.to_owned()))
    }
}

/// Names a selector the way callers supplied it: number first.
fn selector_label(selector: &TaskSelector) -> String {
    selector
        .task_id()
        .map(|task_id| task_id.to_string())
        .or_else(|| selector.uuid().map(|uuid| uuid.to_string()))
        .unwrap_or_default()
}

fn failure_text(mutation: &Mutation, label: &str, err: &TaskServiceError) -> String {
    match err {
        TaskServiceError::NotFound(_) | TaskServiceError::PreconditionFailed(_) => err.to_string(),
        _ => format!("Error {} task {label}: {err}", gerund(mutation)),
    }
}

const fn gerund(mutation: &Mutation) -> &'static str {
    match mutation {
        Mutation::Modify(_) => "modifying",
        Mutation::Transition(StatusTransition::Complete) => "completing",
        Mutation::Transition(StatusTransition::Delete) => "deleting",
        Mutation::Transition(StatusTransition::Start) => "starting",
        Mutation::Transition(StatusTransition::Stop) => "stopping",
        Mutation::Transition(StatusTransition::MarkPending) => "uncompleting",
    }
}

fn log_outcome(mutation: &Mutation, result: &BatchResult) {
    tracing::info!(
        mutation = %mutation,
        succeeded = result.succeeded_count(),
        failed = result.failed_count(),
        "batch mutation finished"
    );
}
