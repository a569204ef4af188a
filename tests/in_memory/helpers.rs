//! Shared helpers for in-memory tool integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;
use taskbridge::{task::adapters::memory::InMemoryTaskStore, tools::TaskTools};

/// Tool surface wired to one in-memory store.
pub type Tools = TaskTools<InMemoryTaskStore, InMemoryTaskStore, DefaultClock>;

/// A store together with the tools that operate on it.
pub struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub tools: Tools,
}

impl Harness {
    /// Calls a tool and returns its JSON body.
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        self.tools.call(name, arguments).await
    }

    /// Adds a pending task and returns its UUID.
    pub async fn add(&self, arguments: Value) -> String {
        let body = self.call("add_task", arguments).await;
        assert_eq!(body["success"], json!(true), "add_task failed: {body}");
        body["task"]["uuid"]
            .as_str()
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

/// Provides a fresh store and tool surface for each test.
#[fixture]
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryTaskStore::new());
    Harness {
        tools: TaskTools::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(DefaultClock),
        ),
        store,
    }
}

/// Seeds three pending tasks across two projects.
pub async fn seed_three(harness: &Harness) -> Vec<String> {
    let mut uuids = Vec::new();
    for (description, project, tags) in [
        ("Draft agenda", "meetings", json!(["prep"])),
        ("Book room", "meetings", json!(["admin"])),
        ("Renew passport", "personal", json!(["admin", "urgent"])),
    ] {
        uuids.push(
            harness
                .add(json!({ "description": description, "project": project, "tags": tags }))
                .await,
        );
    }
    uuids
}
