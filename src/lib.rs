//! Taskbridge: a Taskwarrior backend for tool-calling assistants.
//!
//! The crate turns structured requests ("add a task", "complete these
//! five", "restore what I just deleted") into operations on the local
//! Taskwarrior database and returns UTC-normalised JSON.
//!
//! # Architecture
//!
//! Taskbridge follows hexagonal architecture principles:
//!
//! - **Domain**: task records, filters, and mutations with no I/O
//! - **Ports**: the store surface and the privileged command surface
//! - **Adapters**: the `task` program and an in-memory store
//!
//! # Modules
//!
//! - [`task`]: records, selection, batch mutation, and recovery
//! - [`tools`]: the assistant-facing tool surface
//! - [`mcp`]: JSON-RPC transport
//! - [`config`] and [`telemetry`]: process setup

pub mod config;
pub mod mcp;
pub mod task;
pub mod telemetry;
pub mod tools;
