//! Privileged commands that need confirmation answers on stdin.

use super::runner::RunError;
use super::store::TaskwarriorStore;
use crate::task::{
    domain::{TaskStatus, TaskUuid},
    ports::{CommandOutcome, PrivilegedCommands},
};
use async_trait::async_trait;

/// Answer to the single undelete prompt.
const UNDELETE_ANSWERS: &str = "yes\n";

/// Answers to the purge prompts: confirm, then apply to all deleted tasks.
const PURGE_ANSWERS: &str = "yes\nall\n";

impl TaskwarriorStore {
    async fn privileged(&self, args: &[&str], stdin: Option<&str>) -> CommandOutcome {
        match self.runner.run(args, stdin).await {
            Ok(output) if output.success => CommandOutcome::Applied,
            Ok(output) => {
                let text = output.failure_text();
                tracing::warn!(args = ?args, error = %text, "task command rejected");
                CommandOutcome::Rejected(text)
            }
            Err(RunError::TimedOut(after)) => {
                tracing::warn!(args = ?args, timeout = ?after, "task command timed out");
                CommandOutcome::TimedOut(after)
            }
            Err(err) => CommandOutcome::Rejected(err.to_string()),
        }
    }
}

#[async_trait]
impl PrivilegedCommands for TaskwarriorStore {
    async fn set_status(&self, uuid: TaskUuid, status: TaskStatus) -> CommandOutcome {
        let reference = uuid.to_string();
        let assignment = format!("status:{status}");
        self.privileged(&[&reference, "modify", &assignment], None)
            .await
    }

    async fn undelete(&self, uuid: TaskUuid) -> CommandOutcome {
        let reference = uuid.to_string();
        self.privileged(&[&reference, "undelete"], Some(UNDELETE_ANSWERS))
            .await
    }

    async fn purge_deleted(&self) -> CommandOutcome {
        self.privileged(&["purge"], Some(PURGE_ANSWERS)).await
    }
}
