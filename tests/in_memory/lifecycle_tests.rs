//! Single-task tool tests.

use super::helpers::{Harness, harness, seed_three};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_returns_the_normalised_record(harness: Harness) {
    let body = harness
        .call(
            "add_task",
            json!({
                "description": "  Submit expenses ",
                "project": "finance",
                "priority": "h",
                "tags": ["receipts"],
                "due": "2025-09-01T17:00:00Z"
            }),
        )
        .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Task created with ID 1"));
    let task = &body["task"];
    assert_eq!(task["description"], json!("Submit expenses"));
    assert_eq!(task["status"], json!("pending"));
    assert_eq!(task["priority"], json!("H"));
    assert_eq!(task["due"], json!("2025-09-01T17:00:00Z"));
    assert_eq!(task["tags"], json!(["receipts"]));
    assert!(task["entry"].as_str().is_some_and(|entry| entry.ends_with('Z')));
}

#[rstest]
#[case(json!({ "description": "   " }), "task description must not be empty")]
#[case(
    json!({ "description": "x", "priority": "urgent" }),
    "invalid priority 'urgent', expected H, M, or L"
)]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_validates_before_writing(
    harness: Harness,
    #[case] arguments: Value,
    #[case] expected: &str,
) {
    let body = harness.call("add_task", arguments).await;

    assert_eq!(body, json!({ "success": false, "error": expected }));
    let listed = harness.call("list_tasks", json!({ "status": "all" })).await;
    assert_eq!(listed["count"], json!(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn arguments_may_be_wrapped_in_params(harness: Harness) {
    let body = harness
        .call("add_task", json!({ "params": { "description": "Wrapped" } }))
        .await;
    assert_eq!(body["task"]["description"], json!("Wrapped"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_defaults_to_pending(harness: Harness) {
    seed_three(&harness).await;
    harness.call("complete_task", json!({ "task_id": 1 })).await;

    let pending = harness.call("list_tasks", json!({})).await;
    assert_eq!(pending["count"], json!(2));

    let everything = harness.call("list_tasks", json!({ "status": "all" })).await;
    assert_eq!(everything["count"], json!(3));

    let limited = harness
        .call("list_tasks", json!({ "tags": ["admin"], "limit": 1 }))
        .await;
    assert_eq!(limited["count"], json!(1));
    assert_eq!(limited["tasks"][0]["description"], json!("Book room"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_task_reports_missing_numbers(harness: Harness) {
    let body = harness.call("get_task", json!({ "task_id": 42 })).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Task with ID 42 not found" })
    );

    let missing_both = harness.call("get_task", json!({})).await;
    assert_eq!(
        missing_both["error"],
        json!("either task_id or uuid must be provided")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn modify_task_keeps_absent_fields_and_clears_empty_ones(harness: Harness) {
    harness
        .add(json!({ "description": "Fix bike", "project": "home", "priority": "M" }))
        .await;

    let body = harness
        .call("modify_task", json!({ "task_id": 1, "project": "" }))
        .await;

    assert_eq!(body["message"], json!("Task 1 modified successfully"));
    assert_eq!(body["task"]["project"], Value::Null);
    assert_eq!(body["task"]["priority"], json!("M"));
    assert_eq!(body["task"]["description"], json!("Fix bike"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_then_uncomplete_by_uuid(harness: Harness) {
    let uuid = harness.add(json!({ "description": "File taxes" })).await;

    let completed = harness.call("complete_task", json!({ "task_id": 1 })).await;
    assert_eq!(completed["message"], json!("Task 1 marked as completed"));
    assert_eq!(completed["task"]["status"], json!("completed"));
    assert_eq!(completed["task"]["id"], Value::Null);

    let stale = harness.call("uncomplete_task", json!({ "task_id": 1 })).await;
    assert_eq!(stale["success"], json!(false));

    let reopened = harness
        .call("uncomplete_task", json!({ "uuid": uuid }))
        .await;
    assert_eq!(reopened["message"], json!(format!("Task {uuid} marked as pending")));
    assert_eq!(reopened["task"]["status"], json!("pending"));
    assert_eq!(reopened["task"]["end"], Value::Null);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uncomplete_refuses_pending_tasks(harness: Harness) {
    harness.add(json!({ "description": "Still open" })).await;

    let body = harness.call("uncomplete_task", json!({ "task_id": 1 })).await;

    assert_eq!(
        body["error"],
        json!("Task ID 1 is not completed (current status: pending)")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_and_stop_track_time(harness: Harness) {
    harness.add(json!({ "description": "Write chapter" })).await;

    let started = harness.call("start_task", json!({ "task_id": 1 })).await;
    assert_eq!(started["message"], json!("Started working on task 1"));
    assert!(started["task"]["start"].is_string());

    let again = harness.call("start_task", json!({ "task_id": 1 })).await;
    assert_eq!(again["success"], json!(false));

    let stopped = harness.call("stop_task", json!({ "task_id": 1 })).await;
    assert_eq!(stopped["message"], json!("Stopped working on task 1"));
    assert_eq!(stopped["task"]["start"], Value::Null);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn urgency_reflects_priority_and_active_work(harness: Harness) {
    harness
        .add(json!({ "description": "Review budget", "priority": "M" }))
        .await;
    harness
        .add(json!({ "description": "Sort inbox", "priority": "L" }))
        .await;
    harness.add(json!({ "description": "Tidy desk" })).await;
    harness.call("start_task", json!({ "task_id": 1 })).await;
    harness.call("start_task", json!({ "task_id": 3 })).await;

    let body = harness.call("list_tasks", json!({})).await;
    let urgency_of = |description: &str| {
        body["tasks"].as_array().and_then(|tasks| {
            tasks
                .iter()
                .find(|task| task["description"] == json!(description))
                .map(|task| task["urgency"].clone())
        })
    };

    assert_eq!(urgency_of("Review budget"), Some(json!(7.9)));
    assert_eq!(urgency_of("Sort inbox"), Some(json!(1.8)));
    assert_eq!(urgency_of("Tidy desk"), Some(json!(4.0)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_soft_deletes(harness: Harness) {
    harness.add(json!({ "description": "Cancel gym" })).await;

    let body = harness.call("delete_task", json!({ "task_id": 1 })).await;
    assert_eq!(body["message"], json!("Task 1 deleted successfully"));
    assert_eq!(body["task"]["status"], json!("deleted"));

    let deleted = harness
        .call("list_tasks", json!({ "status": "deleted" }))
        .await;
    assert_eq!(deleted["count"], json!(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tools_are_reported_not_raised(harness: Harness) {
    let body = harness.call("rename_everything", json!({})).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Unknown tool: rename_everything" })
    );
}
