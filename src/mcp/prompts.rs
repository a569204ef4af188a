//! Planning prompts exposed through `prompts/list` and `prompts/get`.

use crate::task::{
    ports::TaskStore,
    services::{TaskPromptService, TaskServiceResult},
};
use mockable::Clock;
use serde_json::{Map, Value, json};

/// Daily plan from overdue, due-today, and high-priority work.
pub const DAILY_PLANNING: &str = "daily-planning";
/// Urgency ranking and per-project load.
pub const TASK_PRIORITIZATION: &str = "task-prioritization";
/// Markdown structure guide for task descriptions.
pub const TASK_FORMATTER: &str = "task-formatter";

const PROMPTS: [(&str, &str); 3] = [
    (
        DAILY_PLANNING,
        "Generate a prompt for daily task planning based on current tasks",
    ),
    (
        TASK_PRIORITIZATION,
        "Generate a prompt for task prioritization analysis",
    ),
    (
        TASK_FORMATTER,
        "Generate a prompt to help format task descriptions using markdown",
    ),
];

/// Prompt descriptors for `prompts/list`. None of them take arguments.
#[must_use]
pub fn prompt_definitions() -> Vec<Value> {
    PROMPTS
        .iter()
        .map(|(name, description)| {
            json!({ "name": name, "description": description, "arguments": [] })
        })
        .collect()
}

/// Renders one prompt as a single user message; `None` for an unknown name.
pub async fn get_prompt<S, C>(
    prompts: &TaskPromptService<S, C>,
    name: &str,
) -> Option<TaskServiceResult<Value>>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    let (_, description) = PROMPTS.iter().find(|(known, _)| *known == name)?;
    let text = match name {
        DAILY_PLANNING => prompts.daily_planning().await,
        TASK_PRIORITIZATION => prompts.task_prioritization().await,
        _ => Ok(TaskPromptService::<S, C>::task_formatter().to_owned()),
    };
    Some(text.map(|body| user_message(description, body)))
}

fn user_message(description: &str, text: String) -> Value {
    let mut content = Map::new();
    content.insert("type".to_owned(), Value::String("text".to_owned()));
    content.insert("text".to_owned(), Value::String(text));
    json!({
        "description": description,
        "messages": [{ "role": "user", "content": Value::Object(content) }]
    })
}
