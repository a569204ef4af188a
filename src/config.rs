//! Command-line and environment configuration.

use crate::task::adapters::taskwarrior::{DEFAULT_TASK_BINARY, TaskwarriorConfig};
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

/// Serves a Taskwarrior database to assistants over MCP on stdio.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskbridge-mcp", version, about, long_about = None)]
pub struct ServerConfig {
    /// Path or name of the `task` program.
    #[arg(long, env = "TASKBRIDGE_TASK_BIN", default_value = DEFAULT_TASK_BINARY)]
    pub task_bin: Utf8PathBuf,

    /// Taskwarrior configuration file, forwarded as `TASKRC`.
    #[arg(long, env = "TASKRC")]
    pub taskrc: Option<Utf8PathBuf>,

    /// Taskwarrior data directory, forwarded as `TASKDATA`.
    #[arg(long, env = "TASKDATA")]
    pub taskdata: Option<Utf8PathBuf>,

    /// Upper bound in seconds on any single `task` invocation.
    #[arg(long, env = "TASKBRIDGE_COMMAND_TIMEOUT_SECS", default_value_t = 30)]
    pub command_timeout_secs: u64,

    /// Log filter directive, e.g. `info` or `taskbridge=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "TASKBRIDGE_LOG_JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    /// Builds the adapter settings.
    #[must_use]
    pub fn taskwarrior(&self) -> TaskwarriorConfig {
        let mut config = TaskwarriorConfig::new(self.task_bin.clone())
            .with_command_timeout(Duration::from_secs(self.command_timeout_secs));
        if let Some(taskrc) = &self.taskrc {
            config = config.with_taskrc(taskrc.clone());
        }
        if let Some(taskdata) = &self.taskdata {
            config = config.with_taskdata(taskdata.clone());
        }
        config
    }
}
