//! Adapter for the Taskwarrior command-line program.
//!
//! The program is the single source of truth. Every call spawns it with
//! machine-readable overrides, a bounded timeout, and the configured
//! `TASKRC`/`TASKDATA` environment.

mod commands;
mod config;
mod runner;
mod store;

pub use config::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_TASK_BINARY, TaskwarriorConfig};
pub use runner::{CommandOutput, RunError, TaskwarriorRunner};
pub use store::{TaskwarriorStore, parse_export};
