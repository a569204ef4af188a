//! Task selection, batch mutation, and recovery over an external task store.
//!
//! Store records are loosely typed; they are wrapped once into
//! [`domain::TaskRecord`] and every other component works with that. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
