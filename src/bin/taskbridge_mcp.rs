//! MCP server binary over the local Taskwarrior database.

use clap::Parser;
use mockable::DefaultClock;
use std::sync::Arc;
use taskbridge::config::ServerConfig;
use taskbridge::mcp::{McpServer, run_stdio};
use taskbridge::task::adapters::taskwarrior::{TaskwarriorRunner, TaskwarriorStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    taskbridge::telemetry::init(&config.log_filter, config.log_json)?;

    let store = Arc::new(TaskwarriorStore::new(
        TaskwarriorRunner::new(config.taskwarrior()),
        Arc::new(DefaultClock),
    ));
    match store.version().await {
        Ok(version) => tracing::info!(version = %version, binary = %config.task_bin, "task program found"),
        Err(err) => tracing::warn!(error = %err, binary = %config.task_bin, "task program check failed"),
    }

    let mut server = McpServer::new(Arc::clone(&store), store, Arc::new(DefaultClock));
    tracing::info!("serving MCP on stdio");
    run_stdio(&mut server).await?;
    tracing::info!("stdin closed; shutting down");
    Ok(())
}
