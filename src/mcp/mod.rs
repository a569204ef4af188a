//! Thin MCP adapter: JSON-RPC 2.0 over newline-delimited stdio.
//!
//! Registration and transport live here only; every tool call is handed
//! to [`crate::tools::TaskTools`].

pub mod jsonrpc;
pub mod prompts;
pub mod resources;
mod server;
mod stdio;

pub use server::{MCP_VERSION, McpServer, SERVER_NAME, SERVER_VERSION};
pub use stdio::{run_stdio, serve};
