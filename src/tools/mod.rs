//! Assistant-facing tool surface.
//!
//! Every tool takes a JSON object and returns a JSON object with at least
//! `success`. Failures are rendered as `{ "success": false, "error": ... }`;
//! nothing a caller sends can take the process down.

mod definitions;
pub mod params;
mod response;

pub use definitions::tool_definitions;

use crate::task::{
    domain::{Mutation, StatusTransition, TaskDomainError, TaskSelector, TaskStatus},
    ports::{PrivilegedCommands, TaskStore},
    services::{
        BatchMutationService, RecoveryService, TaskCatalogService, TaskLifecycleService,
        TaskServiceError,
    },
};
use definitions::BATCH_VERBS;
use mockable::Clock;
use params::{
    AddTaskParams, BatchFilterParams, BatchIdsParams, BatchModifyParams, BatchSelection,
    ListTasksParams, ModifyTaskParams, RestoreTaskParams, TaskIdParams,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced by the tool layer.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The arguments did not match the tool's parameters.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    /// No tool has this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The service rejected the call.
    #[error(transparent)]
    Service(#[from] TaskServiceError),
}

impl From<TaskDomainError> for ToolError {
    fn from(err: TaskDomainError) -> Self {
        Self::Service(err.into())
    }
}

type ToolResult = Result<Value, ToolError>;

/// Name-to-handler dispatch over the task services.
#[derive(Clone)]
pub struct TaskTools<S, P, C>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<S>,
    batch: BatchMutationService<S>,
    recovery: RecoveryService<S, P>,
    catalog: TaskCatalogService<S, C>,
}

impl<S, P, C> TaskTools<S, P, C>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    /// Wires the services over one store handle.
    #[must_use]
    pub fn new(store: Arc<S>, commands: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&store)),
            batch: BatchMutationService::new(Arc::clone(&store)),
            recovery: RecoveryService::new(Arc::clone(&store), commands),
            catalog: TaskCatalogService::new(store, clock),
        }
    }

    /// Runs the named tool and returns its JSON result.
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        match self.dispatch(name, arguments).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                response::failure(err.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        if let Some(rest) = name.strip_prefix("batch_")
            && let Some(body) = self.dispatch_batch(rest, &arguments).await
        {
            return body;
        }
        match name {
            "add_task" => self.add_task(parse(arguments)?).await,
            "list_tasks" => self.list_tasks(parse(arguments)?).await,
            "get_task" => self.get_task(&parse(arguments)?).await,
            "modify_task" => self.modify_task(parse(arguments)?).await,
            "complete_task" => {
                self.transition(&parse(arguments)?, StatusTransition::Complete)
                    .await
            }
            "uncomplete_task" => {
                self.transition(&parse(arguments)?, StatusTransition::MarkPending)
                    .await
            }
            "delete_task" => {
                self.transition(&parse(arguments)?, StatusTransition::Delete)
                    .await
            }
            "start_task" => {
                self.transition(&parse(arguments)?, StatusTransition::Start)
                    .await
            }
            "stop_task" => {
                self.transition(&parse(arguments)?, StatusTransition::Stop)
                    .await
            }
            "restore_task" => self.restore_task(parse(arguments)?).await,
            "purge_deleted_tasks" => Ok(self.purge_deleted_tasks().await),
            "batch_modify_tasks" => self.batch_modify(parse(arguments)?).await,
            "get_projects" => {
                let projects = self.catalog.projects().await?;
                Ok(response::success(
                    json!({ "count": projects.len(), "projects": projects }),
                ))
            }
            "get_tags" => {
                let tags = self.catalog.tags().await?;
                Ok(response::success(
                    json!({ "count": tags.len(), "tags": tags }),
                ))
            }
            "get_summary" => {
                let summary = self.catalog.summary().await?;
                Ok(response::success(json!({ "summary": summary })))
            }
            other => Err(ToolError::UnknownTool(other.to_owned())),
        }
    }

    /// Handles `batch_<verb>_by_ids` and `batch_<verb>_by_filter`.
    async fn dispatch_batch(&self, rest: &str, arguments: &Value) -> Option<ToolResult> {
        for (verb, count_key) in BATCH_VERBS {
            let Some(mode) = rest
                .strip_prefix(verb)
                .and_then(|tail| tail.strip_prefix('_'))
            else {
                continue;
            };
            let mutation = Mutation::Transition(transition_for(verb)?);
            let outcome = match mode {
                "by_ids" => self.batch_by_ids(arguments, &mutation, count_key).await,
                "by_filter" => self.batch_by_filter(arguments, &mutation, count_key).await,
                _ => return None,
            };
            return Some(outcome);
        }
        None
    }

    async fn batch_by_ids(
        &self,
        arguments: &Value,
        mutation: &Mutation,
        count_key: &str,
    ) -> ToolResult {
        let params: BatchIdsParams = parse(arguments.clone())?;
        let selectors = params.selectors()?;
        let result = self.batch.apply_to_selectors(&selectors, mutation).await;
        Ok(response::batch(count_key, &result))
    }

    async fn batch_by_filter(
        &self,
        arguments: &Value,
        mutation: &Mutation,
        count_key: &str,
    ) -> ToolResult {
        let params: BatchFilterParams = parse(arguments.clone())?;
        let filter = params.into_filter()?;
        let result = self.batch.apply_to_filter(&filter, mutation).await?;
        Ok(response::batch(count_key, &result))
    }

    async fn batch_modify(&self, params: BatchModifyParams) -> ToolResult {
        let (selection, changes) = params.into_parts()?;
        let mutation = Mutation::Modify(changes);
        let result = match selection {
            BatchSelection::Selectors(selectors) => {
                self.batch.apply_to_selectors(&selectors, &mutation).await
            }
            BatchSelection::Filter(filter) => {
                self.batch.apply_to_filter(&filter, &mutation).await?
            }
        };
        Ok(response::batch("modified_count", &result))
    }

    async fn add_task(&self, params: AddTaskParams) -> ToolResult {
        let draft = params.into_draft()?;
        let task = self.lifecycle.add(&draft).await?;
        Ok(response::success(json!({
            "message": format!("Task created with ID {}", task.reference()),
            "task": response::wire(&task),
        })))
    }

    async fn list_tasks(&self, params: ListTasksParams) -> ToolResult {
        let filter = params.into_filter()?;
        let tasks = self.lifecycle.list(&filter).await?;
        let wire: Vec<Value> = tasks.iter().map(response::wire).collect();
        Ok(response::success(
            json!({ "count": wire.len(), "tasks": wire }),
        ))
    }

    async fn get_task(&self, params: &TaskIdParams) -> ToolResult {
        let task = self.lifecycle.get(&params.selector()?).await?;
        Ok(response::success(json!({ "task": response::wire(&task) })))
    }

    async fn modify_task(&self, params: ModifyTaskParams) -> ToolResult {
        let (selector, changes) = params.into_parts()?;
        let task = self.lifecycle.modify(&selector, changes).await?;
        Ok(response::success(json!({
            "message": format!("Task {} modified successfully", display_label(&selector)),
            "task": response::wire(&task),
        })))
    }

    async fn transition(&self, params: &TaskIdParams, transition: StatusTransition) -> ToolResult {
        let selector = params.selector()?;
        let task = match transition {
            StatusTransition::Complete => self.lifecycle.complete(&selector).await?,
            StatusTransition::MarkPending => self.lifecycle.uncomplete(&selector).await?,
            StatusTransition::Delete => self.lifecycle.delete(&selector).await?,
            StatusTransition::Start => self.lifecycle.start(&selector).await?,
            StatusTransition::Stop => self.lifecycle.stop(&selector).await?,
        };
        let label = display_label(&selector);
        let message = match transition {
            StatusTransition::Complete => format!("Task {label} marked as completed"),
            StatusTransition::MarkPending => format!("Task {label} marked as pending"),
            StatusTransition::Delete => format!("Task {label} deleted successfully"),
            StatusTransition::Start => format!("Started working on task {label}"),
            StatusTransition::Stop => format!("Stopped working on task {label}"),
        };
        Ok(response::success(json!({
            "message": message,
            "task": response::wire(&task),
        })))
    }

    async fn restore_task(&self, params: RestoreTaskParams) -> ToolResult {
        let (selector, target) = params.into_parts()?;
        let outcome = self.recovery.restore(&selector, target).await?;
        let label = outcome.task.reference();
        let message = if target == TaskStatus::Pending {
            format!("Successfully restored task {label}")
        } else {
            format!("Successfully restored task {label} with status {target}")
        };
        Ok(response::success(json!({
            "message": message,
            "confidence": outcome.confidence,
            "task": response::wire(&outcome.task),
        })))
    }

    async fn purge_deleted_tasks(&self) -> Value {
        match self.recovery.purge().await {
            Ok(report) if report.purged_count == 0 => response::success(json!({
                "message": "No deleted tasks to purge",
                "purged_count": 0,
            })),
            Ok(report) => response::success(json!({
                "message": format!("Successfully purged {} deleted tasks", report.purged_count),
                "purged_count": report.purged_count,
                "details": "Deleted tasks have been permanently removed from the database",
            })),
            Err(failure) => {
                let mut body = response::failure(failure.to_string());
                if let (Some(found), Value::Object(fields)) =
                    (failure.found_deleted_count, &mut body)
                {
                    fields.insert("found_deleted_count".to_owned(), json!(found));
                }
                body
            }
        }
    }
}

/// Accepts arguments either bare or wrapped in a `params` object.
fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let unwrapped = match arguments {
        Value::Object(mut fields) if fields.len() == 1 && fields.contains_key("params") => {
            fields.remove("params").unwrap_or(Value::Null)
        }
        Value::Null => json!({}),
        other => other,
    };
    Ok(serde_json::from_value(unwrapped)?)
}

fn transition_for(verb: &str) -> Option<StatusTransition> {
    match verb {
        "complete" => Some(StatusTransition::Complete),
        "uncomplete" => Some(StatusTransition::MarkPending),
        "delete" => Some(StatusTransition::Delete),
        "start" => Some(StatusTransition::Start),
        "stop" => Some(StatusTransition::Stop),
        _ => None,
    }
}

/// Names a selector in messages: UUID when given, else the number.
fn display_label(selector: &TaskSelector) -> String {
    match (selector.uuid(), selector.task_id()) {
        (Some(uuid), _) => uuid.to_string(),
        (None, Some(task_id)) => task_id.to_string(),
        (None, None) => String::new(),
    }
}
