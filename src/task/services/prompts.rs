//! Planning prompts seeded with the current task list.

use super::error::TaskServiceResult;
use super::query::TaskQueryService;
use super::reports::{NO_PROJECT, pending_by_urgency, render};
use crate::task::{
    domain::{Priority, TaskRecord, timestamp},
    ports::TaskStore,
};
use mockable::Clock;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

const DAILY_PLANNING_TEMPLATE: &str = "\
You are helping with daily task planning. Here's the current situation:

## Current Task Status
- Total pending tasks: {{ pending_count }}
- Overdue tasks: {{ overdue_count }}
- Tasks due today: {{ due_today_count }}
- High priority tasks: {{ high_priority_count }}

{% if overdue %}
## 🚨 OVERDUE TASKS (Needs immediate attention)
{% for line in overdue %}
- [{{ line.reference }}] {{ line.description }} (was due: {{ line.due }})
{% endfor %}

{% endif %}
{% if due_today %}
## 📅 DUE TODAY
{% for line in due_today %}
- [{{ line.reference }}] {{ line.description }} (due: {{ line.due }})
{% endfor %}

{% endif %}
{% if high_priority %}
## 🔥 HIGH PRIORITY TASKS
{% for line in high_priority %}
- [{{ line.reference }}] {{ line.description }}
{% endfor %}

{% endif %}
## Your Task
Please help me plan my day by:

1. **Prioritizing tasks**: Which tasks should I focus on first based on deadlines, priority, and importance?
2. **Time estimation**: Roughly how much time might each priority task take?
3. **Scheduling suggestions**: In what order should I tackle these tasks?
4. **Potential issues**: Are there any dependencies or potential blockers I should be aware of?
5. **Realistic goals**: Given a typical 8-hour work day, what's a realistic set of tasks to complete?

Please provide a structured daily plan with your recommendations.";

const PRIORITIZATION_TEMPLATE: &str = "\
You are helping with task prioritization analysis. Here's the current task landscape:

## Task Overview
- Total pending tasks: {{ pending_count }}
- Active projects: {{ projects | length }}

## Top Tasks by Urgency Score
{% for line in top %}
- [{{ line.reference }}] {{ line.description }}
  - Urgency: {{ line.urgency }}, Priority: {{ line.priority }}, Project: {{ line.project }}{{ line.due_suffix }}
{% endfor %}

## Projects and Task Distribution
{% for project in projects %}
- **{{ project.name }}**: {{ project.count }} tasks
{% endfor %}

## Your Task
Please help me prioritize my tasks by analyzing:

1. **Priority Matrix**: Which tasks are urgent vs important? Help me categorize them into:
   - Urgent & Important (do first)
   - Important but not urgent (schedule)
   - Urgent but not important (delegate if possible)
   - Neither urgent nor important (eliminate if possible)

2. **Project Balance**: Am I overloaded in any particular project? Should I balance my focus?

3. **Quick Wins**: Are there any small, high-value tasks I can complete quickly to build momentum?

4. **Dependencies**: Do any tasks block others? Which should be done first?

5. **Energy Matching**: Which tasks require high energy/focus vs low energy? How should I sequence them throughout my day?

Please provide specific recommendations for prioritizing and organizing these tasks.";

const TASK_FORMATTER_PROMPT: &str = r#"You are helping to format and improve task descriptions. When creating or modifying tasks, please structure them using markdown format with these guidelines:

## Task Description Format

### Structure Template
```
# [Descriptive Title]

## Context/Background
Brief explanation of why this task is needed or the problem it solves.

## Objectives
- Clear, actionable goal 1
- Clear, actionable goal 2
- Specific outcome or deliverable

## Acceptance Criteria
- [ ] Specific requirement 1
- [ ] Specific requirement 2
- [ ] Definition of "done"

## Notes
- Any additional details
- Dependencies or prerequisites
- Resources or links
```

### Examples

#### Before (poor):
"Fix the bug"

#### After (good):
```
# Fix Login Authentication Timeout Bug

## Context/Background
Users are experiencing timeout errors during login attempts, particularly during peak hours.

## Objectives
- Identify root cause of authentication timeouts
- Implement fix to prevent timeout errors
- Ensure login process is reliable under load

## Acceptance Criteria
- [ ] Bug reproduced and root cause identified
- [ ] Fix implemented and tested
- [ ] Login success rate > 99% during peak hours
- [ ] No regression in login performance

## Notes
- Affects approximately 15% of users during 9-11 AM
- Check database connection pooling
- May need to optimize authentication query
```

### Guidelines
1. **Start with a descriptive title** that clearly indicates what needs to be done
2. **Provide context** so anyone can understand why this task matters
3. **Define clear objectives** that are specific and measurable
4. **Use checkboxes** for acceptance criteria to track progress
5. **Include relevant details** in notes section
6. **Keep it concise** but comprehensive enough to be actionable

When I provide a task description, please reformat it using this structure, expanding on the details where necessary to make it clear, actionable, and well-organized."#;

/// Tasks listed per section of the daily planning prompt.
const DAILY_SECTION_LIMIT: usize = 5;

/// Tasks listed in the urgency ranking of the prioritization prompt.
const URGENCY_RANKING_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
struct PlanningLine {
    reference: String,
    description: String,
    due: Option<String>,
}

impl PlanningLine {
    fn new(record: &TaskRecord, due_format: &str) -> Self {
        Self {
            reference: record.reference(),
            description: record.description().to_owned(),
            due: record.due().map(|due| due.format(due_format).to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct DailyPlanningContext {
    pending_count: usize,
    overdue_count: usize,
    due_today_count: usize,
    high_priority_count: usize,
    overdue: Vec<PlanningLine>,
    due_today: Vec<PlanningLine>,
    high_priority: Vec<PlanningLine>,
}

#[derive(Debug, Serialize)]
struct RankedLine {
    reference: String,
    description: String,
    urgency: String,
    priority: &'static str,
    project: String,
    due_suffix: String,
}

impl RankedLine {
    fn new(record: &TaskRecord) -> Self {
        Self {
            reference: record.reference(),
            description: record.description().to_owned(),
            urgency: format!("{:.1}", record.urgency()),
            priority: record.priority().map_or("None", Priority::as_str),
            project: record.project().unwrap_or(NO_PROJECT).to_owned(),
            due_suffix: record
                .due()
                .map(|due| format!(" (due: {})", due.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectLoad {
    name: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct PrioritizationContext {
    pending_count: usize,
    top: Vec<RankedLine>,
    projects: Vec<ProjectLoad>,
}

/// Prompt text for planning conversations about the current task list.
#[derive(Clone)]
pub struct TaskPromptService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    query: TaskQueryService<S>,
    clock: Arc<C>,
}

impl<S, C> TaskPromptService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a prompt service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            query: TaskQueryService::new(store),
            clock,
        }
    }

    /// Builds the daily planning prompt from pending work.
    ///
    /// Overdue and due-today tasks are listed soonest first; high-priority
    /// tasks most urgent first. Each section shows at most five tasks while
    /// the counts cover all of them.
    ///
    /// # Errors
    ///
    /// Returns the store error, or
    /// [`TaskServiceError::Render`](super::TaskServiceError::Render) when the
    /// template fails.
    pub async fn daily_planning(&self) -> TaskServiceResult<String> {
        let now = self.clock.utc();
        let today = now.date_naive();
        let pending = pending_by_urgency(&self.query).await?;

        let mut overdue: Vec<&TaskRecord> = pending
            .iter()
            .filter(|record| {
                record
                    .due()
                    .is_some_and(|due| timestamp::is_overdue(&due, &now))
            })
            .collect();
        overdue.sort_by_key(|record| record.due());
        let mut due_today: Vec<&TaskRecord> = pending
            .iter()
            .filter(|record| record.due().is_some_and(|due| due.date_naive() == today))
            .collect();
        due_today.sort_by_key(|record| record.due());
        let high_priority: Vec<&TaskRecord> = pending
            .iter()
            .filter(|record| record.priority() == Some(Priority::High))
            .collect();

        let context = DailyPlanningContext {
            pending_count: pending.len(),
            overdue_count: overdue.len(),
            due_today_count: due_today.len(),
            high_priority_count: high_priority.len(),
            overdue: section(&overdue, "%Y-%m-%d %H:%M"),
            due_today: section(&due_today, "%H:%M"),
            high_priority: section(&high_priority, "%Y-%m-%d %H:%M"),
        };
        render(DAILY_PLANNING_TEMPLATE, &context)
    }

    /// Builds the prioritization prompt: the ten most urgent pending tasks
    /// and the number of pending tasks per project, busiest first.
    ///
    /// # Errors
    ///
    /// Returns the store error, or
    /// [`TaskServiceError::Render`](super::TaskServiceError::Render) when the
    /// template fails.
    pub async fn task_prioritization(&self) -> TaskServiceResult<String> {
        let pending = pending_by_urgency(&self.query).await?;

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &pending {
            *counts
                .entry(record.project().unwrap_or(NO_PROJECT))
                .or_insert(0) += 1;
        }
        let mut projects: Vec<ProjectLoad> = counts
            .into_iter()
            .map(|(name, count)| ProjectLoad {
                name: name.to_owned(),
                count,
            })
            .collect();
        projects.sort_by_key(|project| Reverse(project.count));

        let context = PrioritizationContext {
            pending_count: pending.len(),
            top: pending
                .iter()
                .take(URGENCY_RANKING_LIMIT)
                .map(RankedLine::new)
                .collect(),
            projects,
        };
        render(PRIORITIZATION_TEMPLATE, &context)
    }

    /// Returns the static guide for structuring task descriptions in
    /// Markdown.
    #[must_use]
    pub const fn task_formatter() -> &'static str {
        TASK_FORMATTER_PROMPT
    }
}

fn section(records: &[&TaskRecord], due_format: &str) -> Vec<PlanningLine> {
    records
        .iter()
        .take(DAILY_SECTION_LIMIT)
        .map(|record| PlanningLine::new(record, due_format))
        .collect()
}
