//! Store adapter over the `task` program's `export` and `import` commands.

use super::runner::{CommandOutput, RunError, TaskwarriorRunner};
use crate::task::{
    domain::{RawTask, StatusScope, TaskDraft, TaskNumber, TaskRecord, TaskUuid},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Task store backed by the local `task` program.
///
/// Reads use `export`; writes of whole records use `import`, which keeps
/// user-defined attributes intact. Lifecycle changes go through the
/// program's own `done`, `delete`, `start`, and `stop` commands so hooks
/// and computed attributes behave as they would interactively.
#[derive(Clone)]
pub struct TaskwarriorStore {
    pub(super) runner: TaskwarriorRunner,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for TaskwarriorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskwarriorStore")
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl TaskwarriorStore {
    /// Creates a store that stamps new tasks using `clock`.
    #[must_use]
    pub fn new(runner: TaskwarriorRunner, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { runner, clock }
    }

    /// Checks that the program runs and returns its version string.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the program cannot be started and
    /// [`TaskStoreError::Rejected`] when it exits with failure.
    pub async fn version(&self) -> TaskStoreResult<String> {
        let output = self.invoke(&["--version"], None).await?;
        Ok(output.stdout.trim().to_owned())
    }

    async fn invoke(&self, args: &[&str], stdin: Option<&str>) -> TaskStoreResult<CommandOutput> {
        let output = self.runner.run(args, stdin).await.map_err(run_error)?;
        if output.success {
            Ok(output)
        } else {
            Err(TaskStoreError::Rejected(output.failure_text()))
        }
    }

    async fn export(&self, filter: &[&str]) -> TaskStoreResult<Vec<RawTask>> {
        let mut args = filter.to_vec();
        args.push("export");
        let output = self.runner.run(&args, None).await.map_err(run_error)?;
        if output.stdout.trim().is_empty() && !output.success {
            return Err(TaskStoreError::Rejected(output.failure_text()));
        }
        parse_export(&output.stdout)
    }

    async fn import(&self, raw: &RawTask) -> TaskStoreResult<()> {
        let payload = serde_json::to_string(&[raw]).map_err(TaskStoreError::persistence)?;
        self.invoke(&["import"], Some(&payload)).await?;
        Ok(())
    }

    async fn lifecycle(&self, uuid: TaskUuid, verb: &str) -> TaskStoreResult<()> {
        let reference = uuid.to_string();
        self.invoke(&["rc.confirmation=off", &reference, verb], None)
            .await?;
        Ok(())
    }
}

/// Maps runner failures into store errors.
fn run_error(err: RunError) -> TaskStoreError {
    match err {
        RunError::TimedOut(_) => TaskStoreError::Rejected(err.to_string()),
        RunError::Io(io) => TaskStoreError::persistence(io),
    }
}

/// Parses `export` output into raw records.
///
/// Accepts both the JSON array form and the older one-object-per-line form.
///
/// # Errors
///
/// Returns a persistence error when the text is not valid export output.
pub fn parse_export(stdout: &str) -> TaskStoreResult<Vec<RawTask>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        let records: Vec<Map<String, Value>> =
            serde_json::from_str(trimmed).map_err(TaskStoreError::persistence)?;
        return Ok(records.into_iter().map(RawTask::new).collect());
    }
    trimmed
        .lines()
        .map(|line| line.trim().trim_end_matches(','))
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<Map<String, Value>>(line)
                .map(RawTask::new)
                .map_err(TaskStoreError::persistence)
        })
        .collect()
}

#[async_trait]
impl TaskStore for TaskwarriorStore {
    async fn create(&self, draft: &TaskDraft) -> TaskStoreResult<RawTask> {
        let uuid = TaskUuid::new();
        let record = draft.clone().into_record(uuid, self.clock.utc());
        self.import(&record.to_raw()).await?;
        tracing::info!(uuid = %uuid, "task created");
        self.find_by_uuid(uuid)
            .await?
            .ok_or_else(|| TaskStoreError::NotFound(uuid.to_string()))
    }

    async fn find_by_uuid(&self, uuid: TaskUuid) -> TaskStoreResult<Option<RawTask>> {
        let filter = format!("uuid:{uuid}");
        Ok(self.export(&[&filter]).await?.into_iter().next())
    }

    async fn find_by_number(&self, task_id: TaskNumber) -> TaskStoreResult<Option<RawTask>> {
        let filter = task_id.to_string();
        Ok(self
            .export(&[&filter])
            .await?
            .into_iter()
            .find(|raw| TaskRecord::from_raw(raw).id() == Some(task_id)))
    }

    async fn list(&self, scope: StatusScope) -> TaskStoreResult<Vec<RawTask>> {
        match scope {
            StatusScope::All => self.export(&[]).await,
            StatusScope::Only(status) => {
                let filter = format!("status:{status}");
                self.export(&[&filter]).await
            }
        }
    }

    async fn save(&self, record: &TaskRecord) -> TaskStoreResult<()> {
        if record.uuid().is_none() {
            return Err(TaskStoreError::NotFound(record.reference()));
        }
        self.import(&record.to_raw()).await
    }

    async fn done(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.lifecycle(uuid, "done").await
    }

    async fn delete(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.lifecycle(uuid, "delete").await
    }

    async fn start(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.lifecycle(uuid, "start").await
    }

    async fn stop(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.lifecycle(uuid, "stop").await
    }
}
