//! Bounded invocation of the `task` program.

use super::config::TaskwarriorConfig;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Overrides applied to every invocation so output stays machine-readable.
const BASE_OVERRIDES: [&str; 2] = ["rc.verbose=nothing", "rc.json.array=on"];

/// Captured result of one finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the program exited with status zero.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns the text to report when the program failed.
    ///
    /// Prefers standard error, then standard output, so the program's own
    /// wording reaches the caller unchanged.
    #[must_use]
    pub fn failure_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_owned();
        }
        let stdout = self.stdout.trim();
        if stdout.is_empty() {
            "task command failed without output".to_owned()
        } else {
            stdout.to_owned()
        }
    }
}

/// Failures that prevent an invocation from producing output.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started or its pipes failed.
    #[error("failed to run task program: {0}")]
    Io(#[from] std::io::Error),

    /// The program did not finish in time and was killed.
    #[error("task command timed out after {0:?}")]
    TimedOut(Duration),
}

/// Spawns the `task` program with the configured environment.
#[derive(Debug, Clone)]
pub struct TaskwarriorRunner {
    config: Arc<TaskwarriorConfig>,
}

impl TaskwarriorRunner {
    /// Creates a runner for the given settings.
    #[must_use]
    pub fn new(config: TaskwarriorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the settings this runner was built with.
    #[must_use]
    pub fn config(&self) -> &TaskwarriorConfig {
        &self.config
    }

    /// Runs the program with `args`, optionally writing `stdin` to it.
    ///
    /// The child is killed if the configured timeout elapses first.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when spawning or piping fails and
    /// [`RunError::TimedOut`] when the bound is exceeded. A non-zero exit is
    /// not an error here; inspect [`CommandOutput::success`].
    pub async fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        stdin: Option<&str>,
    ) -> Result<CommandOutput, RunError> {
        let mut command = Command::new(self.config.binary().as_std_path());
        command
            .args(BASE_OVERRIDES)
            .args(args.iter().map(AsRef::as_ref))
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(taskrc) = self.config.taskrc() {
            command.env("TASKRC", taskrc.as_str());
        }
        if let Some(taskdata) = self.config.taskdata() {
            command.env("TASKDATA", taskdata.as_str());
        }

        tracing::debug!(
            binary = %self.config.binary(),
            args = ?args.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            "running task command"
        );

        let timeout = self.config.command_timeout();
        let mut child = command.spawn()?;
        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes()).await?;
            pipe.shutdown().await?;
        }

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| RunError::TimedOut(timeout))??;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
