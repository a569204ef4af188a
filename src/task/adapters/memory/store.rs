//! In-memory task store for tests and local demos.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Priority, RawTask, StatusScope, TaskDraft, TaskNumber, TaskRecord, TaskStatus, TaskUuid,
        timestamp,
    },
    ports::{CommandOutcome, PrivilegedCommands, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory store implementing both store ports.
///
/// Records are held in raw form in creation order. Working-set numbers are
/// assigned on every read by counting pending, waiting, and recurring
/// records, so completing or deleting a task renumbers the ones after it the
/// same way the real store does after compaction.
#[derive(Clone)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    records: Vec<Map<String, Value>>,
    reject_status_overwrite: bool,
    reject_undelete: bool,
    purge_outcome: Option<CommandOutcome>,
    failing_saves: HashSet<TaskUuid>,
    purge_invocations: usize,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskStore").finish_non_exhaustive()
    }
}

impl InMemoryTaskStore {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty store stamping times from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            clock,
        }
    }

    /// Inserts a record verbatim, assigning a UUID when it has none.
    ///
    /// Useful for seeding completed or deleted tasks with chosen timestamps.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn insert_raw(&self, raw: RawTask) -> TaskStoreResult<TaskUuid> {
        let mut fields = raw.into_inner();
        let uuid = match fields.get("uuid").and_then(Value::as_str) {
            Some(existing) => existing
                .parse::<TaskUuid>()
                .map_err(|err| TaskStoreError::Rejected(err.to_string()))?,
            None => {
                let generated = TaskUuid::new();
                fields.insert("uuid".to_owned(), Value::String(generated.to_string()));
                generated
            }
        };
        fields.remove("id");
        fields.remove("urgency");
        self.write()?.records.push(fields);
        Ok(uuid)
    }

    /// Makes direct status overwrites fail, forcing the undelete fallback.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn reject_status_overwrites(&self, reject: bool) -> TaskStoreResult<()> {
        self.write()?.reject_status_overwrite = reject;
        Ok(())
    }

    /// Makes the undelete command fail.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn reject_undelete(&self, reject: bool) -> TaskStoreResult<()> {
        self.write()?.reject_undelete = reject;
        Ok(())
    }

    /// Forces the purge command to report `outcome` without erasing anything.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn force_purge_outcome(&self, outcome: CommandOutcome) -> TaskStoreResult<()> {
        self.write()?.purge_outcome = Some(outcome);
        Ok(())
    }

    /// Makes every save of `uuid` fail.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_saves_for(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.write()?.failing_saves.insert(uuid);
        Ok(())
    }

    /// Returns how many times the destructive purge command ran.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn purge_invocations(&self) -> TaskStoreResult<usize> {
        Ok(self.read()?.purge_invocations)
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state
            .read()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn now_stamp(&self) -> Value {
        Value::String(timestamp::to_store(&self.clock.utc()))
    }

    /// Applies `change` to the record with `uuid`, stamping `modified`.
    fn update_record(
        &self,
        uuid: TaskUuid,
        change: impl FnOnce(&mut Map<String, Value>, TaskStatus, Value) -> Result<(), String>,
    ) -> TaskStoreResult<()> {
        let now = self.now_stamp();
        let mut state = self.write()?;
        let fields = state
            .records
            .iter_mut()
            .find(|fields| uuid_of(fields) == Some(uuid))
            .ok_or_else(|| TaskStoreError::NotFound(uuid.to_string()))?;
        let status = status_of(fields);
        change(fields, status, now.clone()).map_err(TaskStoreError::Rejected)?;
        fields.insert("modified".to_owned(), now);
        Ok(())
    }

    fn command(
        &self,
        uuid: TaskUuid,
        change: impl FnOnce(&mut Map<String, Value>, TaskStatus, Value) -> Result<(), String>,
    ) -> CommandOutcome {
        match self.update_record(uuid, change) {
            Ok(()) => CommandOutcome::Applied,
            Err(err) => CommandOutcome::Rejected(err.to_string()),
        }
    }
}

fn uuid_of(fields: &Map<String, Value>) -> Option<TaskUuid> {
    fields
        .get("uuid")
        .and_then(Value::as_str)
        .and_then(|value| value.parse().ok())
}

fn status_of(fields: &Map<String, Value>) -> TaskStatus {
    fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(|value| TaskStatus::try_from(value).ok())
        .unwrap_or(TaskStatus::Pending)
}

fn set_status(fields: &mut Map<String, Value>, status: TaskStatus) {
    fields.insert(
        "status".to_owned(),
        Value::String(status.as_str().to_owned()),
    );
}

/// Rough stand-in for the store's urgency model: priority and activity only.
fn urgency_of(fields: &Map<String, Value>) -> f64 {
    let priority = fields
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|value| Priority::try_from(value).ok());
    match (priority, fields.contains_key("start")) {
        (Some(Priority::High), false) => 6.0,
        (Some(Priority::High), true) => 10.0,
        (Some(Priority::Medium), false) => 3.9,
        (Some(Priority::Medium), true) => 7.9,
        (Some(Priority::Low), false) => 1.8,
        (Some(Priority::Low), true) => 5.8,
        (None, false) => 0.0,
        (None, true) => 4.0,
    }
}

/// Decorates stored records with computed `id` and `urgency`.
fn numbered(records: &[Map<String, Value>]) -> Vec<RawTask> {
    let mut next_number = 0_u64;
    records
        .iter()
        .map(|fields| {
            let mut view = fields.clone();
            if status_of(fields).is_working_set() {
                next_number += 1;
                view.insert("id".to_owned(), Value::from(next_number));
            } else {
                view.insert("id".to_owned(), Value::from(0_u64));
            }
            view.insert("urgency".to_owned(), Value::from(urgency_of(fields)));
            RawTask::new(view)
        })
        .collect()
}

fn describe(uuid: TaskUuid, fields: &Map<String, Value>) -> String {
    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    format!("Task {uuid} '{description}'")
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, draft: &TaskDraft) -> TaskStoreResult<RawTask> {
        let uuid = TaskUuid::new();
        let record = draft.clone().into_record(uuid, self.clock.utc());
        self.insert_raw(record.to_raw())?;
        self.find_by_uuid(uuid)
            .await?
            .ok_or_else(|| TaskStoreError::NotFound(uuid.to_string()))
    }

    async fn find_by_uuid(&self, uuid: TaskUuid) -> TaskStoreResult<Option<RawTask>> {
        let state = self.read()?;
        Ok(numbered(&state.records)
            .into_iter()
            .find(|raw| TaskRecord::from_raw(raw).uuid() == Some(uuid)))
    }

    async fn find_by_number(&self, task_id: TaskNumber) -> TaskStoreResult<Option<RawTask>> {
        let state = self.read()?;
        Ok(numbered(&state.records)
            .into_iter()
            .find(|raw| TaskRecord::from_raw(raw).id() == Some(task_id)))
    }

    async fn list(&self, scope: StatusScope) -> TaskStoreResult<Vec<RawTask>> {
        let state = self.read()?;
        Ok(numbered(&state.records)
            .into_iter()
            .filter(|raw| scope.contains(TaskRecord::from_raw(raw).status()))
            .collect())
    }

    async fn save(&self, record: &TaskRecord) -> TaskStoreResult<()> {
        let uuid = record
            .uuid()
            .ok_or_else(|| TaskStoreError::NotFound(record.reference()))?;
        if self.read()?.failing_saves.contains(&uuid) {
            return Err(TaskStoreError::Rejected(format!(
                "Task {uuid} could not be written."
            )));
        }
        let replacement = record.to_raw().into_inner();
        self.update_record(uuid, move |fields, _, _| {
            *fields = replacement;
            Ok(())
        })
    }

    async fn done(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.update_record(uuid, |fields, status, now| {
            if !matches!(status, TaskStatus::Pending | TaskStatus::Waiting) {
                return Err(format!(
                    "{} is neither pending nor waiting.",
                    describe(uuid, fields)
                ));
            }
            set_status(fields, TaskStatus::Completed);
            fields.remove("start");
            fields.insert("end".to_owned(), now);
            Ok(())
        })
    }

    async fn delete(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.update_record(uuid, |fields, status, now| {
            if status == TaskStatus::Deleted {
                return Err(format!("{} is not deletable.", describe(uuid, fields)));
            }
            set_status(fields, TaskStatus::Deleted);
            fields.remove("start");
            fields.insert("end".to_owned(), now);
            Ok(())
        })
    }

    async fn start(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.update_record(uuid, |fields, status, now| {
            if !status.is_working_set() {
                return Err(format!("{} is not pending.", describe(uuid, fields)));
            }
            if fields.contains_key("start") {
                return Err(format!("{} already started.", describe(uuid, fields)));
            }
            fields.insert("start".to_owned(), now);
            Ok(())
        })
    }

    async fn stop(&self, uuid: TaskUuid) -> TaskStoreResult<()> {
        self.update_record(uuid, |fields, _, _| {
            if fields.remove("start").is_none() {
                return Err(format!("{} not started.", describe(uuid, fields)));
            }
            Ok(())
        })
    }
}

#[async_trait]
impl PrivilegedCommands for InMemoryTaskStore {
    async fn set_status(&self, uuid: TaskUuid, status: TaskStatus) -> CommandOutcome {
        match self.read() {
            Ok(state) if state.reject_status_overwrite => {
                return CommandOutcome::Rejected(
                    "The 'status' attribute may not be modified directly.".to_owned(),
                );
            }
            Ok(_) => {}
            Err(err) => return CommandOutcome::Rejected(err.to_string()),
        }
        self.command(uuid, |fields, _, now| {
            set_status(fields, status);
            if status.is_working_set() {
                fields.remove("end");
            } else {
                fields.insert("end".to_owned(), now);
            }
            Ok(())
        })
    }

    async fn undelete(&self, uuid: TaskUuid) -> CommandOutcome {
        match self.read() {
            Ok(state) if state.reject_undelete => {
                return CommandOutcome::Rejected(
                    "Unknown command 'undelete'.".to_owned(),
                );
            }
            Ok(_) => {}
            Err(err) => return CommandOutcome::Rejected(err.to_string()),
        }
        self.command(uuid, |fields, status, _| {
            if status != TaskStatus::Deleted {
                return Err(format!("{} is not deleted.", describe(uuid, fields)));
            }
            set_status(fields, TaskStatus::Pending);
            fields.remove("end");
            Ok(())
        })
    }

    async fn purge_deleted(&self) -> CommandOutcome {
        let mut state = match self.write() {
            Ok(state) => state,
            Err(err) => return CommandOutcome::Rejected(err.to_string()),
        };
        state.purge_invocations += 1;
        if let Some(forced) = state.purge_outcome.clone() {
            return forced;
        }
        state
            .records
            .retain(|fields| status_of(fields) != TaskStatus::Deleted);
        CommandOutcome::Applied
    }
}
