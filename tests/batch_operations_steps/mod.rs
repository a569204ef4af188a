//! Step definitions for batch operation scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
