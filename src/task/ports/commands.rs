//! Privileged command port.
//!
//! Undelete, direct status overwrite, and purge are only reachable through
//! the store's command-line surface and need confirmation answers on stdin.
//! Implementations keep that protocol to themselves and report one of three
//! typed outcomes.

use crate::task::domain::{TaskStatus, TaskUuid};
use async_trait::async_trait;
use std::time::Duration;

/// Result of one privileged command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The store accepted and applied the command.
    Applied,
    /// The store refused the command; carries its error text verbatim.
    Rejected(String),
    /// The command did not finish within the allotted time.
    TimedOut(Duration),
}

/// Out-of-band store commands used by recovery operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrivilegedCommands: Send + Sync {
    /// Overwrites a task's status directly.
    async fn set_status(&self, uuid: TaskUuid, status: TaskStatus) -> CommandOutcome;

    /// Returns a deleted task to pending.
    async fn undelete(&self, uuid: TaskUuid) -> CommandOutcome;

    /// Permanently erases every deleted task.
    async fn purge_deleted(&self) -> CommandOutcome;
}
