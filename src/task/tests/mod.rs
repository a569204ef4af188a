//! Unit tests for the task module.
//!
//! Domain tests are pure. Service tests run against the in-memory store,
//! with mocked privileged commands where the command outcome matters.

mod filter_tests;
mod report_tests;
mod support;
