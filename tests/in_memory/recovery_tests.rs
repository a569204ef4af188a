//! Restore and purge tool tests.

use super::helpers::{Harness, harness, seed_three};
use rstest::rstest;
use serde_json::{Value, json};
use taskbridge::task::ports::CommandOutcome;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_by_uuid_is_exact(harness: Harness) {
    let uuids = seed_three(&harness).await;
    harness.call("delete_task", json!({ "task_id": 2 })).await;

    let body = harness
        .call("restore_task", json!({ "uuid": uuids[1] }))
        .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["confidence"], json!("exact"));
    assert_eq!(body["task"]["status"], json!("pending"));
    assert_eq!(body["task"]["description"], json!("Book room"));
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("Successfully restored task "), "{message}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_by_stale_number_flags_the_guess(harness: Harness) {
    seed_three(&harness).await;
    harness.call("delete_task", json!({ "task_id": 3 })).await;

    let body = harness.call("restore_task", json!({ "task_id": 3 })).await;

    assert_eq!(body["confidence"], json!("most_recently_deleted"));
    assert_eq!(body["task"]["description"], json!("Renew passport"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_into_completed_names_the_status(harness: Harness) {
    let uuids = seed_three(&harness).await;
    harness.call("delete_task", json!({ "task_id": 1 })).await;
    harness.store.reject_status_overwrites(true).expect("knob");

    let body = harness
        .call("restore_task", json!({ "uuid": uuids[0], "status": "completed" }))
        .await;

    assert_eq!(body["task"]["status"], json!("completed"));
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.ends_with("with status completed")),
        "{body}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_failure_passes_the_store_text_through(harness: Harness) {
    let uuids = seed_three(&harness).await;
    harness.call("delete_task", json!({ "task_id": 1 })).await;
    harness.store.reject_status_overwrites(true).expect("knob");
    harness.store.reject_undelete(true).expect("knob");

    let body = harness
        .call("restore_task", json!({ "uuid": uuids[0] }))
        .await;

    assert_eq!(
        body,
        json!({ "success": false, "error": "Failed to restore task: Unknown command 'undelete'." })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_rejects_deleted_as_a_target(harness: Harness) {
    let body = harness
        .call("restore_task", json!({ "task_id": 1, "status": "deleted" }))
        .await;
    assert_eq!(
        body["error"],
        json!("cannot restore a task into status 'deleted'")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purge_with_nothing_deleted_is_a_no_op(harness: Harness) {
    seed_three(&harness).await;

    let body = harness.call("purge_deleted_tasks", json!({})).await;

    assert_eq!(
        body,
        json!({ "success": true, "message": "No deleted tasks to purge", "purged_count": 0 })
    );
    assert_eq!(harness.store.purge_invocations().expect("counter"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purge_removes_deleted_tasks_for_good(harness: Harness) {
    seed_three(&harness).await;
    harness
        .call("batch_delete_by_ids", json!({ "task_ids": [1, 2] }))
        .await;

    let body = harness.call("purge_deleted_tasks", Value::Null).await;

    assert_eq!(body["purged_count"], json!(2));
    assert_eq!(body["message"], json!("Successfully purged 2 deleted tasks"));
    let everything = harness.call("list_tasks", json!({ "status": "all" })).await;
    assert_eq!(everything["count"], json!(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purge_failure_reports_what_was_found(harness: Harness) {
    seed_three(&harness).await;
    harness.call("delete_task", json!({ "task_id": 1 })).await;
    harness
        .store
        .force_purge_outcome(CommandOutcome::Rejected("database is locked".to_owned()))
        .expect("knob");

    let body = harness.call("purge_deleted_tasks", json!({})).await;

    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Purge command failed: database is locked",
            "found_deleted_count": 1
        })
    );
}
