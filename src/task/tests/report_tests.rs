//! Summary, catalog, and report rendering tests.

use super::support::{FixedClock, midweek, seed, store_at};
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{TaskRecord, TaskSummary},
    services::{TaskCatalogService, TaskPromptService, TaskReportService},
};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

#[fixture]
fn store() -> Arc<InMemoryTaskStore> {
    let store = store_at(midweek());
    for value in [
        json!({ "description": "Ship release", "status": "pending", "priority": "H",
                "project": "web", "tags": ["release"], "due": "20250819T090000Z" }),
        json!({ "description": "Call bank", "status": "pending", "tags": ["phone"],
                "due": "20250820T150000Z" }),
        json!({ "description": "Water plants", "status": "pending",
                "due": "20250820T120000Z" }),
        json!({ "description": "Done today", "status": "completed", "project": "web",
                "end": "20250820T080000Z" }),
        json!({ "description": "Done Monday", "status": "completed",
                "end": "20250818T100000Z" }),
        json!({ "description": "Done last week", "status": "completed", "project": "ops",
                "end": "20250817T230000Z" }),
        json!({ "description": "Dropped", "status": "deleted", "tags": ["old"],
                "end": "20250819T100000Z" }),
    ] {
        seed(&store, value);
    }
    store
}

fn reports(store: &Arc<InMemoryTaskStore>) -> TaskReportService<InMemoryTaskStore, FixedClock> {
    TaskReportService::new(Arc::clone(store), Arc::new(midweek()))
}

fn prompts(store: &Arc<InMemoryTaskStore>) -> TaskPromptService<InMemoryTaskStore, FixedClock> {
    TaskPromptService::new(Arc::clone(store), Arc::new(midweek()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_statuses_priorities_and_overdue(store: Arc<InMemoryTaskStore>) {
    let catalog = TaskCatalogService::new(Arc::clone(&store), Arc::new(midweek()));
    let summary = catalog.summary().await.expect("summary");

    assert_eq!(summary.status.pending, 3);
    assert_eq!(summary.status.completed, 3);
    assert_eq!(summary.status.deleted, 1);
    assert_eq!(summary.status.total, 7);
    assert_eq!(summary.priority.high, 1);
    assert_eq!(summary.priority.unset, 2);
    assert_eq!(summary.overdue, 1);
}

#[rstest]
fn task_due_exactly_now_is_not_overdue() {
    let now = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).single().expect("instant");
    let record = TaskRecord::from_raw(&super::support::raw(json!({
        "status": "pending",
        "due": "20250820T120000Z",
    })));

    assert_eq!(TaskSummary::compute([&record], now).overdue, 0);
    let later = now + chrono::Duration::seconds(1);
    assert_eq!(TaskSummary::compute([&record], later).overdue, 1);
}

#[rstest]
fn summary_serialises_priority_letters() {
    let value = serde_json::to_value(TaskSummary::default()).expect("serialise");
    assert_eq!(
        value.get("priority"),
        Some(&json!({ "H": 0, "M": 0, "L": 0, "None": 0 }))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn catalog_lists_distinct_sorted_labels(store: Arc<InMemoryTaskStore>) {
    let catalog = TaskCatalogService::new(Arc::clone(&store), Arc::new(midweek()));

    assert_eq!(catalog.projects().await.expect("projects"), ["ops", "web"]);
    assert_eq!(
        catalog.tags().await.expect("tags"),
        ["old", "phone", "release"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_report_sections_reflect_the_clock(store: Arc<InMemoryTaskStore>) {
    let report = reports(&store).daily_report().await.expect("renders");

    assert!(report.starts_with("# Daily Task Report - 2025-08-20"), "{report}");
    assert!(report.contains("- **Total pending tasks**: 3"), "{report}");
    assert!(report.contains("- **Completed today**: 1"), "{report}");
    assert!(report.contains("- **Overdue tasks**: 1"), "{report}");
    assert!(report.contains("- **Due today**: 2"), "{report}");
    assert!(
        report.contains("- [1] Ship release (due: 2025-08-19 09:00)"),
        "{report}"
    );
    assert!(report.contains("## High Priority Tasks"), "{report}");
    assert!(!report.contains("Done Monday"), "{report}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_summary_groups_completions_since_monday(store: Arc<InMemoryTaskStore>) {
    let summary = reports(&store).weekly_summary().await.expect("renders");

    assert!(summary.starts_with("# Weekly Summary - Week of 2025-08-18"), "{summary}");
    assert!(summary.contains("- **Total completed**: 2"), "{summary}");
    assert!(summary.contains("### No Project (1 tasks)"), "{summary}");
    assert!(summary.contains("### web (1 tasks)"), "{summary}");
    assert!(!summary.contains("Done last week"), "{summary}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_summary_without_completions_has_no_project_section() {
    let store = store_at(midweek());
    let summary = reports(&store).weekly_summary().await.expect("renders");

    assert!(summary.contains("- **Total completed**: 0"), "{summary}");
    assert!(!summary.contains("## Completed by Project"), "{summary}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn live_tasks_are_sorted_by_urgency(store: Arc<InMemoryTaskStore>) {
    let live = reports(&store).live_tasks().await.expect("live feed");

    assert_eq!(live.total_tasks, 3);
    assert_eq!(live.tasks[0].description, "Ship release");
    assert_eq!(live.timestamp, "2025-08-20T12:00:00Z");
    assert_eq!(live.status_summary.get("pending"), Some(&3));
    assert_eq!(live.project_summary.get("No Project"), Some(&2));
    assert_eq!(live.project_summary.get("web"), Some(&1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_planning_prompt_lists_overdue_due_today_and_high_priority(
    store: Arc<InMemoryTaskStore>,
) {
    let prompt = prompts(&store).daily_planning().await.expect("renders");

    assert!(
        prompt.starts_with("You are helping with daily task planning."),
        "{prompt}"
    );
    assert!(prompt.contains("- Total pending tasks: 3\n"), "{prompt}");
    assert!(prompt.contains("- Overdue tasks: 1\n"), "{prompt}");
    assert!(prompt.contains("- Tasks due today: 2\n"), "{prompt}");
    assert!(prompt.contains("- High priority tasks: 1\n"), "{prompt}");
    assert!(
        prompt.contains(
            "## 🚨 OVERDUE TASKS (Needs immediate attention)\n\
             - [1] Ship release (was due: 2025-08-19 09:00)\n\n"
        ),
        "{prompt}"
    );
    assert!(
        prompt.contains(
            "## 📅 DUE TODAY\n\
             - [3] Water plants (due: 12:00)\n\
             - [2] Call bank (due: 15:00)\n\n"
        ),
        "{prompt}"
    );
    assert!(
        prompt.contains("## 🔥 HIGH PRIORITY TASKS\n- [1] Ship release\n\n## Your Task\n"),
        "{prompt}"
    );
    assert!(
        prompt.ends_with("Please provide a structured daily plan with your recommendations."),
        "{prompt}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_planning_prompt_omits_empty_sections() {
    let store = store_at(midweek());
    let prompt = prompts(&store).daily_planning().await.expect("renders");

    assert!(
        prompt.contains("- High priority tasks: 0\n\n## Your Task\n"),
        "{prompt}"
    );
    assert!(!prompt.contains("OVERDUE"), "{prompt}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn prioritization_prompt_ranks_by_urgency_and_counts_projects(
    store: Arc<InMemoryTaskStore>,
) {
    let prompt = prompts(&store).task_prioritization().await.expect("renders");

    assert!(prompt.contains("- Total pending tasks: 3\n"), "{prompt}");
    assert!(prompt.contains("- Active projects: 2\n"), "{prompt}");
    assert!(
        prompt.contains(
            "## Top Tasks by Urgency Score\n\
             - [1] Ship release\n  \
             - Urgency: 6.0, Priority: H, Project: web (due: 2025-08-19 09:00)\n"
        ),
        "{prompt}"
    );
    assert!(
        prompt.contains(
            "- [2] Call bank\n  \
             - Urgency: 0.0, Priority: None, Project: No Project (due: 2025-08-20 15:00)\n"
        ),
        "{prompt}"
    );
    assert!(
        prompt.contains(
            "## Projects and Task Distribution\n\
             - **No Project**: 2 tasks\n\
             - **web**: 1 tasks\n\n## Your Task\n"
        ),
        "{prompt}"
    );
}

#[rstest]
fn formatter_prompt_is_a_static_markdown_guide() {
    let prompt = TaskPromptService::<InMemoryTaskStore, FixedClock>::task_formatter();

    assert!(prompt.contains("### Structure Template"));
    assert!(prompt.contains("# Fix Login Authentication Timeout Bug"));
    assert!(prompt.contains("6. **Keep it concise**"));
}
