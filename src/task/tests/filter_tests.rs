//! Filter evaluation tests.

use super::support::raw;
use crate::task::domain::{FilterSpec, Priority, StatusScope, TaskRecord, TaskStatus};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

#[fixture]
fn records() -> Vec<TaskRecord> {
    [
        json!({ "id": 1, "description": "Fix login bug", "status": "pending",
                "project": "web", "priority": "H", "tags": ["bug"], "due": "20250821T090000Z" }),
        json!({ "id": 2, "description": "Write release notes", "status": "pending",
                "project": "web", "tags": ["docs"], "due": "20250825T090000Z" }),
        json!({ "id": 3, "description": "Plan offsite", "status": "pending",
                "priority": "L", "tags": ["team", "bug"] }),
        json!({ "id": 0, "description": "Old login cleanup", "status": "completed",
                "project": "web", "tags": ["bug"] }),
    ]
    .into_iter()
    .map(|value| TaskRecord::from_raw(&raw(value)))
    .collect()
}

fn descriptions(selected: &[TaskRecord]) -> Vec<&str> {
    selected.iter().map(TaskRecord::description).collect()
}

#[rstest]
fn empty_spec_matches_everything(records: Vec<TaskRecord>) {
    assert_eq!(FilterSpec::new().evaluate(records).len(), 4);
}

#[rstest]
fn tags_match_any_listed_tag(records: Vec<TaskRecord>) {
    let spec = FilterSpec::new().with_tags(["docs".to_owned(), "team".to_owned()]);
    assert_eq!(
        descriptions(&spec.evaluate(records)),
        ["Write release notes", "Plan offsite"]
    );
}

#[rstest]
fn predicates_combine_with_and(records: Vec<TaskRecord>) {
    let spec = FilterSpec::new()
        .with_status(TaskStatus::Pending)
        .with_project("web")
        .with_tags(["bug".to_owned()]);
    assert_eq!(descriptions(&spec.evaluate(records)), ["Fix login bug"]);
}

#[rstest]
fn description_match_is_case_insensitive(records: Vec<TaskRecord>) {
    let spec = FilterSpec::new().with_description_containing("LOGIN");
    assert_eq!(
        descriptions(&spec.evaluate(records)),
        ["Fix login bug", "Old login cleanup"]
    );
}

#[rstest]
fn priority_must_match_exactly(records: Vec<TaskRecord>) {
    let spec = FilterSpec::new().with_priority(Priority::Low);
    assert_eq!(descriptions(&spec.evaluate(records)), ["Plan offsite"]);
}

#[rstest]
fn due_bounds_are_strict_and_skip_undated_records(records: Vec<TaskRecord>) {
    let before = FilterSpec::new().with_due_before(at(21, 9));
    assert_eq!(
        descriptions(&before.evaluate(records.clone())),
        ["Plan offsite", "Old login cleanup"]
    );

    let window = FilterSpec::new()
        .with_due_after(at(21, 9))
        .with_due_before(at(26, 0))
        .with_status(TaskStatus::Pending);
    assert_eq!(
        descriptions(&window.evaluate(records)),
        ["Write release notes", "Plan offsite"]
    );
}

#[rstest]
fn limit_truncates_in_store_order(records: Vec<TaskRecord>) {
    let spec = FilterSpec::new().with_limit(2);
    assert_eq!(
        descriptions(&spec.evaluate(records)),
        ["Fix login bug", "Write release notes"]
    );
}

#[rstest]
fn zero_limit_means_unbounded(records: Vec<TaskRecord>) {
    assert_eq!(FilterSpec::new().with_limit(0).evaluate(records).len(), 4);
}

#[rstest]
fn status_predicate_sets_store_scope() {
    assert_eq!(FilterSpec::new().scope(), StatusScope::All);
    assert_eq!(
        FilterSpec::new().with_status(TaskStatus::Deleted).scope(),
        StatusScope::Only(TaskStatus::Deleted)
    );
}

#[rstest]
#[case("all", StatusScope::All)]
#[case("ALL", StatusScope::All)]
#[case(" Waiting ", StatusScope::Only(TaskStatus::Waiting))]
fn status_scope_parses_caller_values(#[case] input: &str, #[case] expected: StatusScope) {
    assert_eq!(StatusScope::parse(input), Ok(expected));
}

#[rstest]
fn status_scope_rejects_unknown_status() {
    assert!(StatusScope::parse("archived").is_err());
}
