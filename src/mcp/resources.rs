//! Report resources exposed through `resources/list` and `resources/read`.

use crate::task::{
    ports::TaskStore,
    services::{TaskReportService, TaskServiceError, TaskServiceResult},
};
use mockable::Clock;
use serde_json::{Map, Value, json};

/// Markdown report of today's work.
pub const DAILY_REPORT_URI: &str = "taskwarrior://daily-report";
/// Markdown summary of this week's completions.
pub const WEEKLY_SUMMARY_URI: &str = "taskwarrior://weekly-summary";
/// JSON feed of pending tasks.
pub const LIVE_TASKS_URI: &str = "taskwarrior://live-tasks";

/// Resource descriptors for `resources/list`.
#[must_use]
pub fn resource_definitions() -> Vec<Value> {
    vec![
        json!({
            "uri": DAILY_REPORT_URI,
            "name": "Daily task report",
            "description": "Pending, completed today, overdue, due today, and high-priority tasks",
            "mimeType": "text/markdown"
        }),
        json!({
            "uri": WEEKLY_SUMMARY_URI,
            "name": "Weekly summary",
            "description": "Tasks completed since Monday, grouped by project",
            "mimeType": "text/markdown"
        }),
        json!({
            "uri": LIVE_TASKS_URI,
            "name": "Live tasks",
            "description": "Pending tasks sorted by urgency with status and project counts",
            "mimeType": "application/json"
        }),
    ]
}

/// Reads one resource; `None` for an unknown URI.
pub async fn read_resource<S, C>(
    reports: &TaskReportService<S, C>,
    uri: &str,
) -> Option<TaskServiceResult<Value>>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    let contents = match uri {
        DAILY_REPORT_URI => reports
            .daily_report()
            .await
            .map(|text| markdown(uri, text)),
        WEEKLY_SUMMARY_URI => reports
            .weekly_summary()
            .await
            .map(|text| markdown(uri, text)),
        LIVE_TASKS_URI => reports.live_tasks().await.and_then(|live| {
            let text = serde_json::to_string_pretty(&live)
                .map_err(|err| TaskServiceError::Render(err.to_string()))?;
            Ok(content(uri, "application/json", text))
        }),
        _ => return None,
    };
    Some(contents.map(|entry| json!({ "contents": [entry] })))
}

fn markdown(uri: &str, text: String) -> Value {
    content(uri, "text/markdown", text)
}

fn content(uri: &str, mime_type: &str, text: String) -> Value {
    let mut entry = Map::new();
    entry.insert("uri".to_owned(), Value::String(uri.to_owned()));
    entry.insert("mimeType".to_owned(), Value::String(mime_type.to_owned()));
    entry.insert("text".to_owned(), Value::String(text));
    Value::Object(entry)
}
