//! Tool names, descriptions, and input schemas advertised by `tools/list`.

use serde_json::{Map, Value, json};

/// Lifecycle transitions offered in batch form, with the verb used in tool
/// names and result count keys.
pub(crate) const BATCH_VERBS: [(&str, &str); 5] = [
    ("complete", "completed_count"),
    ("uncomplete", "uncompleted_count"),
    ("delete", "deleted_count"),
    ("start", "started_count"),
    ("stop", "stopped_count"),
];

fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_owned(), Value::String("object".to_owned()));
    schema.insert("properties".to_owned(), properties);
    schema.insert("required".to_owned(), json!(required));
    json!({
        "name": name,
        "description": description,
        "inputSchema": Value::Object(schema),
    })
}

fn selector_properties() -> Value {
    json!({
        "task_id": { "type": "integer", "description": "Working-set task number" },
        "uuid": { "type": "string", "description": "Task UUID (stable across status changes)" }
    })
}

fn filter_properties() -> Value {
    json!({
        "status": {
            "type": "string",
            "description": "pending, waiting, completed, deleted, or all"
        },
        "project": { "type": "string", "description": "Exact project name" },
        "tags": {
            "type": "array",
            "items": { "type": "string" },
            "description": "Match tasks having ANY of these tags"
        },
        "priority": { "type": "string", "enum": ["H", "M", "L"] },
        "description_contains": {
            "type": "string",
            "description": "Case-insensitive description substring"
        },
        "due_before": {
            "type": "string",
            "description": "Due strictly before this ISO-8601 time, e.g. 2025-08-22T18:00:00Z"
        },
        "due_after": {
            "type": "string",
            "description": "Due strictly after this ISO-8601 time"
        },
        "limit": { "type": "integer", "minimum": 0, "description": "Maximum tasks; 0 means no cap" }
    })
}

fn ids_properties() -> Value {
    json!({
        "task_ids": {
            "type": "array",
            "items": { "type": "integer" },
            "description": "Task numbers to operate on, in order"
        },
        "task_uuids": {
            "type": "object",
            "additionalProperties": { "type": "string" },
            "description": "Optional map of task number to UUID for reliable lookup"
        }
    })
}

fn field_properties() -> Value {
    json!({
        "description": { "type": "string", "description": "New description" },
        "project": { "type": "string", "description": "Project name; empty string clears" },
        "priority": { "type": "string", "description": "H, M, or L; empty string clears" },
        "due": {
            "type": "string",
            "description": "ISO-8601 due time such as 2025-08-22T18:00:00Z; empty string clears"
        }
    })
}

fn merge(base: Value, extra: Value) -> Value {
    match (base, extra) {
        (Value::Object(mut left), Value::Object(right)) => {
            left.extend(right);
            Value::Object(left)
        }
        (left, _) => left,
    }
}

fn lifecycle_definitions() -> Vec<Value> {
    vec![
        tool(
            "add_task",
            "Add a new task.",
            merge(
                field_properties(),
                json!({
                    "tags": { "type": "array", "items": { "type": "string" } }
                }),
            ),
            &["description"],
        ),
        tool(
            "list_tasks",
            "List tasks by status, project, and tags.",
            json!({
                "status": {
                    "type": "string",
                    "description": "pending (default), waiting, completed, deleted, or all"
                },
                "project": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "limit": { "type": "integer", "minimum": 0 }
            }),
            &[],
        ),
        tool("get_task", "Get one task.", selector_properties(), &[]),
        tool(
            "modify_task",
            "Modify one task. Omitted fields are left unchanged.",
            merge(
                merge(selector_properties(), field_properties()),
                json!({
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Replacement tag list"
                    }
                }),
            ),
            &[],
        ),
        tool("complete_task", "Mark a task completed.", selector_properties(), &[]),
        tool(
            "uncomplete_task",
            "Return a completed task to pending.",
            selector_properties(),
            &[],
        ),
        tool("delete_task", "Delete a task.", selector_properties(), &[]),
        tool("start_task", "Start time tracking on a task.", selector_properties(), &[]),
        tool("stop_task", "Stop time tracking on a task.", selector_properties(), &[]),
        tool(
            "restore_task",
            "Restore a deleted task. Prefer uuid; a stale task_id falls back to the most recently deleted task.",
            merge(
                selector_properties(),
                json!({
                    "status": {
                        "type": "string",
                        "description": "Status after restoring: pending (default), waiting, or completed"
                    }
                }),
            ),
            &[],
        ),
        tool(
            "purge_deleted_tasks",
            "Permanently erase every deleted task. Irreversible.",
            json!({}),
            &[],
        ),
    ]
}

fn batch_definitions() -> Vec<Value> {
    let mut tools = Vec::new();
    for (verb, _) in BATCH_VERBS {
        tools.push(tool(
            &format!("batch_{verb}_by_ids"),
            &format!("Batch {verb} tasks by number. Each task succeeds or fails independently."),
            ids_properties(),
            &["task_ids"],
        ));
        tools.push(tool(
            &format!("batch_{verb}_by_filter"),
            &format!("Batch {verb} every task matching the filter."),
            filter_properties(),
            &[],
        ));
    }
    tools.push(tool(
        "batch_modify_tasks",
        "Modify tasks selected by numbers or filters: set project, priority, or due, and add or remove tags.",
        merge(
            ids_properties(),
            json!({
                "filters": { "type": "object", "properties": filter_properties() },
                "project": { "type": "string", "description": "Empty string clears" },
                "priority": { "type": "string", "description": "H, M, or L; empty string clears" },
                "due": { "type": "string", "description": "ISO-8601; empty string clears" },
                "add_tags": { "type": "array", "items": { "type": "string" } },
                "remove_tags": { "type": "array", "items": { "type": "string" } }
            }),
        ),
        &[],
    ));
    tools
}

fn metadata_definitions() -> Vec<Value> {
    vec![
        tool("get_projects", "List every project name.", json!({}), &[]),
        tool("get_tags", "List every tag.", json!({}), &[]),
        tool(
            "get_summary",
            "Count tasks by status and priority, and count overdue tasks.",
            json!({}),
            &[],
        ),
    ]
}

/// Returns every tool definition, sorted by name.
#[must_use]
pub fn tool_definitions() -> Vec<Value> {
    let mut tools = lifecycle_definitions();
    tools.extend(batch_definitions());
    tools.extend(metadata_definitions());
    tools.sort_by(|left, right| {
        let name = |tool: &Value| tool.get("name").and_then(Value::as_str).map(str::to_owned);
        name(left).cmp(&name(right))
    });
    tools
}
