//! Shared fixtures for task unit tests.

use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{RawTask, TaskUuid},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
                .single()
                .expect("valid fixed instant"),
        )
    }
}

impl mockable::Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Wednesday 2025-08-20 12:00 UTC.
pub fn midweek() -> FixedClock {
    FixedClock::at(2025, 8, 20, 12, 0)
}

pub fn store_at(clock: FixedClock) -> Arc<InMemoryTaskStore> {
    Arc::new(InMemoryTaskStore::with_clock(Arc::new(clock)))
}

pub fn raw(value: Value) -> RawTask {
    match value {
        Value::Object(fields) => RawTask::new(fields),
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn seed(store: &InMemoryTaskStore, value: Value) -> TaskUuid {
    store.insert_raw(raw(value)).expect("seed record")
}
