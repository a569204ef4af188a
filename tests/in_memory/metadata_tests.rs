//! Project, tag, and summary tool tests.

use super::helpers::{Harness, harness, seed_three};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_and_tags_are_distinct_and_sorted(harness: Harness) {
    seed_three(&harness).await;

    let projects = harness.call("get_projects", json!({})).await;
    assert_eq!(
        projects,
        json!({ "success": true, "count": 2, "projects": ["meetings", "personal"] })
    );

    let tags = harness.call("get_tags", json!({})).await;
    assert_eq!(tags["tags"], json!(["admin", "prep", "urgent"]));
    assert_eq!(tags["count"], json!(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_store_has_empty_metadata(harness: Harness) {
    let projects = harness.call("get_projects", json!({})).await;
    assert_eq!(projects["count"], json!(0));

    let summary = harness.call("get_summary", json!({})).await;
    assert_eq!(summary["summary"]["status"]["total"], json!(0));
    assert_eq!(summary["summary"]["overdue"], json!(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_overdue_pending_tasks(harness: Harness) {
    harness
        .add(json!({ "description": "Late", "priority": "H", "due": "2001-01-01T00:00:00Z" }))
        .await;
    harness
        .add(json!({ "description": "Future", "due": "2999-01-01T00:00:00Z" }))
        .await;
    harness.add(json!({ "description": "Done" })).await;
    harness.call("complete_task", json!({ "task_id": 3 })).await;

    let body = harness.call("get_summary", json!({})).await;
    let summary = &body["summary"];

    assert_eq!(summary["status"]["pending"], json!(2));
    assert_eq!(summary["status"]["completed"], json!(1));
    assert_eq!(summary["priority"]["H"], json!(1));
    assert_eq!(summary["priority"]["None"], json!(1));
    assert_eq!(summary["overdue"], json!(1));
}
