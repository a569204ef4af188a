//! Batch tool tests.

use super::helpers::{Harness, harness, seed_three};
use rstest::rstest;
use serde_json::{Value, json};

fn descriptions(body: &Value) -> Vec<String> {
    body["tasks"]
        .as_array()
        .map(|tasks| {
            tasks
                .iter()
                .filter_map(|task| task["description"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_consecutive_numbers_survives_renumbering(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call("batch_complete_by_ids", json!({ "task_ids": [1, 2, 3] }))
        .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["completed_count"], json!(3));
    assert_eq!(body["failed_count"], json!(0));
    assert_eq!(body["results"][2]["message"], json!("Task 3 completed"));
    assert_eq!(body["results"][2]["task_id"], json!(3));

    let pending = harness.call("list_tasks", json!({})).await;
    assert_eq!(pending["count"], json!(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_failure_is_reported_per_task(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call("batch_delete_by_ids", json!({ "task_ids": [2, 9] }))
        .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["deleted_count"], json!(1));
    assert_eq!(body["failed_count"], json!(1));
    assert_eq!(body["errors"], json!(["Task 9 not found"]));
    assert_eq!(body["results"][0]["task"]["description"], json!("Book room"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uuid_map_overrides_stale_numbers(harness: Harness) {
    let uuids = seed_three(&harness).await;
    harness.call("complete_task", json!({ "task_id": 1 })).await;

    let body = harness
        .call(
            "batch_start_by_ids",
            json!({ "task_ids": [3], "task_uuids": { "3": uuids[2] } }),
        )
        .await;

    assert_eq!(body["started_count"], json!(1));
    assert_eq!(
        body["results"][0]["task"]["description"],
        json!("Renew passport")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_numbers_fail_before_any_change(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call("batch_complete_by_ids", json!({ "task_ids": [1, 0] }))
        .await;

    assert_eq!(
        body,
        json!({ "success": false, "error": "invalid task ID 0, expected a positive integer" })
    );
    let pending = harness.call("list_tasks", json!({})).await;
    assert_eq!(pending["count"], json!(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_id_list_is_rejected(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call("batch_complete_by_ids", json!({ "task_ids": [] }))
        .await;

    assert_eq!(
        body,
        json!({ "success": false, "error": "either task_ids or filters must be provided" })
    );
    let pending = harness.call("list_tasks", json!({})).await;
    assert_eq!(pending["count"], json!(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_batch_combines_predicates(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call(
            "batch_complete_by_filter",
            json!({ "status": "pending", "project": "meetings", "tags": ["admin", "prep"] }),
        )
        .await;

    assert_eq!(body["completed_count"], json!(2));
    let pending = harness.call("list_tasks", json!({})).await;
    assert_eq!(descriptions(&pending), ["Renew passport"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uncomplete_by_filter_reports_non_completed_matches(harness: Harness) {
    seed_three(&harness).await;
    harness.call("complete_task", json!({ "task_id": 1 })).await;

    let body = harness
        .call("batch_uncomplete_by_filter", json!({ "project": "meetings" }))
        .await;

    assert_eq!(body["uncompleted_count"], json!(1));
    assert_eq!(body["failed_count"], json!(1));
    assert_eq!(
        body["errors"][0],
        json!("Task 1 is not completed (current status: pending)")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_modify_adds_and_removes_tags(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call(
            "batch_modify_tasks",
            json!({
                "filters": { "tags": ["admin"] },
                "add_tags": ["errand"],
                "remove_tags": ["urgent"],
                "priority": "L"
            }),
        )
        .await;

    assert_eq!(body["modified_count"], json!(2));
    for result in body["results"].as_array().into_iter().flatten() {
        let tags = &result["task"]["tags"];
        assert!(tags.as_array().is_some_and(|tags| tags.contains(&json!("errand"))));
        assert!(!tags.as_array().is_some_and(|tags| tags.contains(&json!("urgent"))));
        assert_eq!(result["task"]["priority"], json!("L"));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_modify_by_ids_can_clear_project(harness: Harness) {
    seed_three(&harness).await;

    let body = harness
        .call("batch_modify_tasks", json!({ "task_ids": [3], "project": "" }))
        .await;

    assert_eq!(body["modified_count"], json!(1));
    assert_eq!(body["results"][0]["task"]["project"], Value::Null);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_modify_requires_a_selection(harness: Harness) {
    let body = harness
        .call("batch_modify_tasks", json!({ "add_tags": ["x"] }))
        .await;
    assert_eq!(
        body["error"],
        json!("either task_ids or filters must be provided")
    );
}
