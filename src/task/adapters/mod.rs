//! Store adapters for the task context.
//!
//! - [`memory::InMemoryTaskStore`]: in-process store for tests and demos
//! - [`taskwarrior::TaskwarriorStore`]: the local `task` program

pub mod memory;
pub mod taskwarrior;
