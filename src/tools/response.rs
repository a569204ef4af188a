//! JSON result shapes returned by tools.

use crate::task::domain::{BatchResult, TaskRecord};
use serde_json::{Map, Value, json};

/// Builds `{ "success": true, ...fields }`.
pub(crate) fn success(fields: Value) -> Value {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    if let Value::Object(extra) = fields {
        body.extend(extra);
    }
    Value::Object(body)
}

/// Builds `{ "success": false, "error": message }`.
pub(crate) fn failure(message: impl Into<String>) -> Value {
    json!({ "success": false, "error": message.into() })
}

/// Serializes one record to its wire form.
pub(crate) fn wire(record: &TaskRecord) -> Value {
    serde_json::to_value(record.to_wire()).unwrap_or(Value::Null)
}

/// Serializes a batch outcome under `<count_key>`.
pub(crate) fn batch(count_key: &str, result: &BatchResult) -> Value {
    let results: Vec<Value> = result
        .succeeded()
        .iter()
        .map(|entry| {
            json!({
                "task_id": entry.task_id.map(|task_id| task_id.value()),
                "uuid": entry.uuid.map(|uuid| uuid.to_string()),
                "success": true,
                "message": entry.message,
                "task": wire(&entry.task),
            })
        })
        .collect();
    let errors: Vec<&str> = result
        .failed()
        .iter()
        .map(|failure| failure.error.as_str())
        .collect();

    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(result.is_success()));
    body.insert(count_key.to_owned(), json!(result.succeeded_count()));
    body.insert("failed_count".to_owned(), json!(result.failed_count()));
    body.insert("results".to_owned(), Value::Array(results));
    body.insert("errors".to_owned(), json!(errors));
    Value::Object(body)
}
