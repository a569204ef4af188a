//! Human-readable reports and the live task feed.

use super::error::{TaskServiceError, TaskServiceResult};
use super::query::TaskQueryService;
use crate::task::{
    domain::{Priority, StatusScope, TaskRecord, TaskStatus, WireTask, timestamp},
    ports::TaskStore,
};
use chrono::{DateTime, Datelike, Days, Utc};
use minijinja::Environment;
use mockable::Clock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

const DAILY_TEMPLATE: &str = "\
# Daily Task Report - {{ date }}

## Summary
- **Total pending tasks**: {{ pending_count }}
- **Completed today**: {{ completed_today | length }}
- **Overdue tasks**: {{ overdue | length }}
- **Due today**: {{ due_today | length }}
{% if completed_today %}

## Completed Today
{% for line in completed_today %}
- [{{ line.reference }}] {{ line.description }}
{% endfor %}
{% endif %}
{% if overdue %}

## Overdue Tasks
{% for line in overdue %}
- [{{ line.reference }}] {{ line.description }} (due: {{ line.due }})
{% endfor %}
{% endif %}
{% if due_today %}

## Due Today
{% for line in due_today %}
- [{{ line.reference }}] {{ line.description }} (due: {{ line.due }})
{% endfor %}
{% endif %}
{% if high_priority %}

## High Priority Tasks
{% for line in high_priority %}
- [{{ line.reference }}] {{ line.description }}
{% endfor %}
{% endif %}
";

const WEEKLY_TEMPLATE: &str = "\
# Weekly Summary - Week of {{ week_start }}

## Overview
- **Total completed**: {{ total_completed }}
- **Projects involved**: {{ projects | length }}
{% if projects %}

## Completed by Project
{% for project in projects %}

### {{ project.name }} ({{ project.tasks | length }} tasks)
{% for line in project.tasks %}
- [{{ line.reference }}] {{ line.description }} (completed: {{ line.completed }})
{% endfor %}
{% endfor %}
{% endif %}
";

/// Bucket name for tasks without a project.
pub(super) const NO_PROJECT: &str = "No Project";

/// How many high-priority tasks the daily report lists.
const HIGH_PRIORITY_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
struct ReportLine {
    reference: String,
    description: String,
    due: Option<String>,
    completed: Option<String>,
}

impl ReportLine {
    fn new(record: &TaskRecord, due_format: &str) -> Self {
        Self {
            reference: record.reference(),
            description: record.description().to_owned(),
            due: record
                .due()
                .map(|due| due.format(due_format).to_string()),
            completed: record.end().map(|end| end.format("%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct DailyContext {
    date: String,
    pending_count: usize,
    completed_today: Vec<ReportLine>,
    overdue: Vec<ReportLine>,
    due_today: Vec<ReportLine>,
    high_priority: Vec<ReportLine>,
}

#[derive(Debug, Serialize)]
struct ProjectGroup {
    name: String,
    tasks: Vec<ReportLine>,
}

#[derive(Debug, Serialize)]
struct WeeklyContext {
    week_start: String,
    total_completed: usize,
    projects: Vec<ProjectGroup>,
}

/// Snapshot of pending work for machine consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTasks {
    /// Generation time.
    pub timestamp: String,
    /// Number of tasks listed.
    pub total_tasks: usize,
    /// Pending tasks, most urgent first.
    pub tasks: Vec<WireTask>,
    /// Task counts per status.
    pub status_summary: BTreeMap<String, usize>,
    /// Task counts per project.
    pub project_summary: BTreeMap<String, usize>,
}

/// Report generation over the current store contents.
#[derive(Clone)]
pub struct TaskReportService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    query: TaskQueryService<S>,
    clock: Arc<C>,
}

impl<S, C> TaskReportService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a report service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            query: TaskQueryService::new(store),
            clock,
        }
    }

    /// Renders today's report in Markdown. "Today" is the current UTC date.
    ///
    /// # Errors
    ///
    /// Returns the store error, or [`TaskServiceError::Render`] when the
    /// template fails.
    pub async fn daily_report(&self) -> TaskServiceResult<String> {
        let now = self.clock.utc();
        let today = now.date_naive();
        let pending = pending_by_urgency(&self.query).await?;
        let completed = self
            .query
            .scan(StatusScope::Only(TaskStatus::Completed))
            .await?;

        let mut overdue: Vec<&TaskRecord> = pending
            .iter()
            .filter(|record| {
                record
                    .due()
                    .is_some_and(|due| timestamp::is_overdue(&due, &now))
            })
            .collect();
        overdue.sort_by_key(|record| record.due());

        let context = DailyContext {
            date: today.format("%Y-%m-%d").to_string(),
            pending_count: pending.len(),
            completed_today: completed
                .iter()
                .filter(|record| record.end().is_some_and(|end| end.date_naive() == today))
                .map(|record| ReportLine::new(record, "%Y-%m-%d %H:%M"))
                .collect(),
            overdue: overdue
                .into_iter()
                .map(|record| ReportLine::new(record, "%Y-%m-%d %H:%M"))
                .collect(),
            due_today: pending
                .iter()
                .filter(|record| record.due().is_some_and(|due| due.date_naive() == today))
                .map(|record| ReportLine::new(record, "%H:%M"))
                .collect(),
            high_priority: pending
                .iter()
                .filter(|record| record.priority() == Some(Priority::High))
                .take(HIGH_PRIORITY_LIMIT)
                .map(|record| ReportLine::new(record, "%Y-%m-%d %H:%M"))
                .collect(),
        };
        render(DAILY_TEMPLATE, &context)
    }

    /// Renders this week's completions in Markdown, grouped by project.
    ///
    /// The week starts on Monday at 00:00 UTC.
    ///
    /// # Errors
    ///
    /// Returns the store error, or [`TaskServiceError::Render`] when the
    /// template fails.
    pub async fn weekly_summary(&self) -> TaskServiceResult<String> {
        let week_start = week_start(self.clock.utc());
        let completed = self
            .query
            .scan(StatusScope::Only(TaskStatus::Completed))
            .await?;

        let mut groups: BTreeMap<String, Vec<ReportLine>> = BTreeMap::new();
        let mut total_completed = 0;
        for record in completed
            .iter()
            .filter(|record| record.end().is_some_and(|end| end >= week_start))
        {
            total_completed += 1;
            let project = record.project().unwrap_or(NO_PROJECT).to_owned();
            groups
                .entry(project)
                .or_default()
                .push(ReportLine::new(record, "%Y-%m-%d %H:%M"));
        }

        let context = WeeklyContext {
            week_start: week_start.format("%Y-%m-%d").to_string(),
            total_completed,
            projects: groups
                .into_iter()
                .map(|(name, tasks)| ProjectGroup { name, tasks })
                .collect(),
        };
        render(WEEKLY_TEMPLATE, &context)
    }

    /// Returns pending tasks sorted by urgency with status and project
    /// histograms.
    ///
    /// # Errors
    ///
    /// Returns the store error when tasks cannot be read.
    pub async fn live_tasks(&self) -> TaskServiceResult<LiveTasks> {
        let pending = pending_by_urgency(&self.query).await?;
        let mut status_summary = BTreeMap::new();
        let mut project_summary = BTreeMap::new();
        for record in &pending {
            *status_summary
                .entry(record.status().to_string())
                .or_insert(0) += 1;
            *project_summary
                .entry(record.project().unwrap_or(NO_PROJECT).to_owned())
                .or_insert(0) += 1;
        }
        Ok(LiveTasks {
            timestamp: timestamp::to_wire(&self.clock.utc()),
            total_tasks: pending.len(),
            tasks: pending.iter().map(TaskRecord::to_wire).collect(),
            status_summary,
            project_summary,
        })
    }

}

/// Pending tasks, most urgent first.
pub(super) async fn pending_by_urgency<S: TaskStore>(
    query: &TaskQueryService<S>,
) -> TaskServiceResult<Vec<TaskRecord>> {
    let mut pending = query.scan(StatusScope::Only(TaskStatus::Pending)).await?;
    pending.sort_by(|left, right| right.urgency().total_cmp(&left.urgency()));
    Ok(pending)
}

/// Monday 00:00 UTC of the week containing `now`.
fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let monday = now
        .date_naive()
        .checked_sub_days(Days::new(u64::from(now.weekday().num_days_from_monday())))
        .unwrap_or_else(|| now.date_naive());
    monday.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub(super) fn render(template: &str, context: &impl Serialize) -> TaskServiceResult<String> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
        .render_str(template, context)
        .map_err(|error| TaskServiceError::Render(error.to_string()))
}
