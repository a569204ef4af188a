//! MCP request handling.

use super::jsonrpc::{
    self, INTERNAL_ERROR, INVALID_PARAMS, JsonRpcRequest, METHOD_NOT_FOUND,
    SERVER_NOT_INITIALIZED,
};
use super::{prompts, resources};
use crate::task::{
    ports::{PrivilegedCommands, TaskStore},
    services::{TaskPromptService, TaskReportService},
};
use crate::tools::{TaskTools, tool_definitions};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;

/// Protocol revision announced during `initialize`.
pub const MCP_VERSION: &str = "2024-11-05";
/// Server name announced during `initialize`.
pub const SERVER_NAME: &str = "taskbridge";
/// Server version announced during `initialize`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stateful MCP session over one task store.
pub struct McpServer<S, P, C>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    initialized: bool,
    tools: TaskTools<S, P, C>,
    reports: TaskReportService<S, C>,
    prompts: TaskPromptService<S, C>,
}

impl<S, P, C> McpServer<S, P, C>
where
    S: TaskStore,
    P: PrivilegedCommands,
    C: Clock + Send + Sync,
{
    /// Creates a session; `store` and `commands` are usually the same
    /// adapter.
    #[must_use]
    pub fn new(store: Arc<S>, commands: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            initialized: false,
            tools: TaskTools::new(Arc::clone(&store), commands, Arc::clone(&clock)),
            reports: TaskReportService::new(Arc::clone(&store), Arc::clone(&clock)),
            prompts: TaskPromptService::new(store, clock),
        }
    }

    /// Handles one request. Returns `None` for notifications.
    pub async fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(jsonrpc::response(
                request.id,
                json!({
                    "protocolVersion": MCP_VERSION,
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                    "capabilities": { "tools": {}, "resources": {}, "prompts": {} }
                }),
            ));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            return Some(jsonrpc::error(
                request.id,
                SERVER_NOT_INITIALIZED,
                "Server not initialized",
            ));
        }

        let id = request.id.clone();
        let reply = match method {
            "ping" => jsonrpc::response(id, json!({})),
            "tools/list" => jsonrpc::response(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(id, request.params).await,
            "resources/list" => jsonrpc::response(
                id,
                json!({ "resources": resources::resource_definitions() }),
            ),
            "resources/read" => self.read_resource(id, request.params).await,
            "prompts/list" => {
                jsonrpc::response(id, json!({ "prompts": prompts::prompt_definitions() }))
            }
            "prompts/get" => self.get_prompt(id, request.params).await,
            _ if request.id.is_none() => return None,
            other => jsonrpc::error(id, METHOD_NOT_FOUND, &format!("Method not found: {other}")),
        };
        Some(reply)
    }

    async fn call_tool(&self, id: Option<Value>, params: Option<Value>) -> Value {
        let Some(Value::Object(fields)) = params else {
            return jsonrpc::error(id, INVALID_PARAMS, "params must be an object");
        };
        let Some(name) = fields.get("name").and_then(Value::as_str) else {
            return jsonrpc::error(id, INVALID_PARAMS, "tool name must be a string");
        };
        let arguments = fields.get("arguments").cloned().unwrap_or_else(|| json!({}));

        tracing::debug!(tool = name, "tools/call");
        let body = self.tools.call(name, arguments).await;
        let is_error = !body.get("success").and_then(Value::as_bool).unwrap_or(false);
        jsonrpc::response(
            id,
            json!({
                "content": [jsonrpc::text_content(&body)],
                "isError": is_error
            }),
        )
    }

    async fn read_resource(&self, id: Option<Value>, params: Option<Value>) -> Value {
        let Some(uri) = params
            .as_ref()
            .and_then(|fields| fields.get("uri"))
            .and_then(Value::as_str)
        else {
            return jsonrpc::error(id, INVALID_PARAMS, "uri must be a string");
        };
        match resources::read_resource(&self.reports, uri).await {
            Some(Ok(contents)) => jsonrpc::response(id, contents),
            Some(Err(err)) => {
                tracing::warn!(uri, error = %err, "resource read failed");
                jsonrpc::error(id, INTERNAL_ERROR, &err.to_string())
            }
            None => jsonrpc::error(id, INVALID_PARAMS, &format!("Unknown resource: {uri}")),
        }
    }

    async fn get_prompt(&self, id: Option<Value>, params: Option<Value>) -> Value {
        let Some(name) = params
            .as_ref()
            .and_then(|fields| fields.get("name"))
            .and_then(Value::as_str)
        else {
            return jsonrpc::error(id, INVALID_PARAMS, "prompt name must be a string");
        };
        match prompts::get_prompt(&self.prompts, name).await {
            Some(Ok(prompt)) => jsonrpc::response(id, prompt),
            Some(Err(err)) => {
                tracing::warn!(prompt = name, error = %err, "prompt rendering failed");
                jsonrpc::error(id, INTERNAL_ERROR, &err.to_string())
            }
            None => jsonrpc::error(id, INVALID_PARAMS, &format!("Unknown prompt: {name}")),
        }
    }
}
