//! Settings for reaching the `task` command-line program.

use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;

/// Default program name looked up on `PATH`.
pub const DEFAULT_TASK_BINARY: &str = "task";

/// Default bound on any single CLI invocation.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Location and limits for the external task program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskwarriorConfig {
    binary: Utf8PathBuf,
    taskrc: Option<Utf8PathBuf>,
    taskdata: Option<Utf8PathBuf>,
    command_timeout: Duration,
}

impl Default for TaskwarriorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_BINARY)
    }
}

impl TaskwarriorConfig {
    /// Creates settings for the given program with default limits.
    #[must_use]
    pub fn new(binary: impl Into<Utf8PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            taskrc: None,
            taskdata: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Points the program at a specific configuration file.
    #[must_use]
    pub fn with_taskrc(mut self, taskrc: impl Into<Utf8PathBuf>) -> Self {
        self.taskrc = Some(taskrc.into());
        self
    }

    /// Points the program at a specific data directory.
    #[must_use]
    pub fn with_taskdata(mut self, taskdata: impl Into<Utf8PathBuf>) -> Self {
        self.taskdata = Some(taskdata.into());
        self
    }

    /// Sets the bound applied to each invocation.
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn binary(&self) -> &Utf8Path {
        &self.binary
    }

    /// Returns the configuration file override.
    #[must_use]
    pub fn taskrc(&self) -> Option<&Utf8Path> {
        self.taskrc.as_deref()
    }

    /// Returns the data directory override.
    #[must_use]
    pub fn taskdata(&self) -> Option<&Utf8Path> {
        self.taskdata.as_deref()
    }

    /// Returns the per-invocation bound.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}
