//! Shared world state for batch operation BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use taskbridge::{task::adapters::memory::InMemoryTaskStore, tools::TaskTools};

/// Tool surface used by the BDD world.
pub type TestTools = TaskTools<InMemoryTaskStore, InMemoryTaskStore, DefaultClock>;

/// Scenario world for batch behaviour tests.
pub struct BatchWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub tools: TestTools,
    pub last_response: Option<Value>,
}

impl BatchWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let tools = TaskTools::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(DefaultClock),
        );
        Self {
            store,
            tools,
            last_response: None,
        }
    }

    /// Returns the body of the most recent tool call.
    pub fn response(&self) -> Result<&Value, eyre::Report> {
        self.last_response
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no tool has been called in this scenario"))
    }
}

impl Default for BatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BatchWorld {
    BatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
