//! Port contracts for the external task store.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod commands;
pub mod store;

pub use commands::{CommandOutcome, PrivilegedCommands};
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
