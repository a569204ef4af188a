//! JSON-RPC 2.0 envelopes.

use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Parse error code.
pub const PARSE_ERROR: i64 = -32700;
/// Invalid request code.
pub const INVALID_REQUEST: i64 = -32600;
/// Unknown method code.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid parameters code.
pub const INVALID_PARAMS: i64 = -32602;
/// Internal error code.
pub const INTERNAL_ERROR: i64 = -32603;
/// Request before `initialize` code.
pub const SERVER_NOT_INITIALIZED: i64 = -32002;

/// One incoming request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol marker; accepted but not checked.
    #[serde(default, rename = "jsonrpc")]
    pub version: Option<String>,
    /// Method name.
    pub method: String,
    /// Request ID; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// Builds a success response.
#[must_use]
pub fn response(id: Option<Value>, result: Value) -> Value {
    let mut reply = envelope(id);
    reply.insert("result".to_owned(), result);
    Value::Object(reply)
}

/// Builds an error response.
#[must_use]
pub fn error(id: Option<Value>, code: i64, message: &str) -> Value {
    let mut reply = envelope(id);
    reply.insert(
        "error".to_owned(),
        json!({ "code": code, "message": message }),
    );
    Value::Object(reply)
}

fn envelope(id: Option<Value>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("jsonrpc".to_owned(), Value::String("2.0".to_owned()));
    fields.insert("id".to_owned(), id.unwrap_or(Value::Null));
    fields
}

/// Wraps a tool payload as MCP text content.
#[must_use]
pub fn text_content(payload: &Value) -> Value {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_owned());
    let mut content = Map::new();
    content.insert("type".to_owned(), Value::String("text".to_owned()));
    content.insert("text".to_owned(), Value::String(text));
    Value::Object(content)
}
