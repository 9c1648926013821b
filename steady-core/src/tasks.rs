//! Task operations over a [`TaskStore`].
//!
//! Each mutation is a single read-modify-write against the store. Store
//! failures are logged and handed back unchanged.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::categorize::categorize;
use crate::store::{StoreError, StoreResult, TaskStore};
use crate::task::{
    Recurrence, Subtask, Task, TaskCategory, TaskStatus, UrgencyLevel, UrgencySource,
};
use crate::urgency::suggest_urgency_at;

/// Input for creating a task. Missing category/urgency fall back to
/// `other`/`medium`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub urgency: Option<UrgencyLevel>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_times: Vec<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub is_long_term: bool,
    pub estimated_duration: Option<u32>,
    /// Subtask titles, in order.
    pub subtasks: Vec<String>,
    pub recurrence: Option<Recurrence>,

    pub category_confidence: Option<f64>,
    pub suggested_urgency: Option<UrgencyLevel>,
    pub urgency_source: Option<UrgencySource>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// When to pre-fill scorer suggestions into a new task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFill {
    pub categorize: bool,
    pub urgency: bool,
    /// Suggestions below this confidence are recorded but not applied.
    pub min_confidence: f64,
}

impl Default for AutoFill {
    fn default() -> Self {
        Self {
            categorize: true,
            urgency: true,
            min_confidence: 0.5,
        }
    }
}

/// Run the scorers over a new-task form. Explicit user values always win.
pub fn apply_suggestions(mut input: NewTask, auto: &AutoFill, now: DateTime<Utc>) -> NewTask {
    let description = input.description.as_deref();

    if auto.categorize && input.category.is_none() {
        let c = categorize(&input.title, description);
        if c.confidence >= auto.min_confidence {
            input.category = Some(c.category);
            input.category_confidence = Some(c.confidence);
        }
    }

    if auto.urgency {
        let s = suggest_urgency_at(&input.title, description, input.due_date, now);
        input.suggested_urgency = Some(s.urgency);
        if input.urgency.is_none() && s.confidence >= auto.min_confidence {
            input.urgency = Some(s.urgency);
            input.urgency_source = Some(UrgencySource::Suggested);
        }
    }

    input
}

/// Partial update: only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub urgency: Option<UrgencyLevel>,
    pub urgency_source: Option<UrgencySource>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_times: Option<Vec<DateTime<Utc>>>,
    pub status: Option<TaskStatus>,
    pub tags: Option<Vec<String>>,
    pub actual_duration: Option<u32>,
    pub is_long_term: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
    pub urgency: Option<UrgencyLevel>,
    pub tag: Option<String>,
    /// Case-insensitive match on title or description.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != task.category) {
            return false;
        }
        if self.urgency.is_some_and(|u| u != task.urgency) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_desc = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_desc {
                return false;
            }
        }
        true
    }
}

/// A completed task and, for recurring tasks, the next instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task: Task,
    pub next: Option<Task>,
}

fn logged<T>(op: &str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(e) = &result {
        tracing::error!(op, error = %e, "task store call failed");
    }
    result
}

pub fn create_task(
    store: &mut impl TaskStore,
    user_id: &str,
    input: NewTask,
    now: DateTime<Utc>,
) -> StoreResult<Task> {
    let task_id = Uuid::new_v4().to_string();

    let mut task = Task::new(&task_id, user_id, input.title, now);
    task.description = input.description.filter(|d| !d.is_empty());
    task.category = input.category.unwrap_or(TaskCategory::Other);
    task.category_confidence = input.category_confidence;
    task.urgency = input.urgency.unwrap_or(UrgencyLevel::Medium);
    task.urgency_source = input.urgency_source.unwrap_or(UrgencySource::User);
    task.suggested_urgency = input.suggested_urgency;
    task.due_date = input.due_date;
    task.reminder_times = input.reminder_times;
    task.tags = input.tags;
    task.is_long_term = input.is_long_term;
    task.estimated_duration = input.estimated_duration;
    task.recurrence = input.recurrence;
    task.subtasks = input
        .subtasks
        .into_iter()
        .map(|title| Subtask::new(title, now))
        .collect();

    logged("create_task", store.insert_task(task))?;
    tracing::debug!(%task_id, user_id, "created task");

    // Read back what the store kept.
    logged("create_task", store.task(&task_id))
}

pub fn get_task(store: &impl TaskStore, task_id: &str) -> StoreResult<Task> {
    logged("get_task", store.task(task_id))
}

/// A user's tasks matching `filter`, newest first.
pub fn list_tasks(store: &impl TaskStore, user_id: &str, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
    let mut tasks: Vec<Task> = logged("list_tasks", store.tasks_for_user(user_id))?
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tasks)
}

/// Apply a partial update. Any status may follow any other; entering
/// `completed` stamps completion data and leaving it clears that data.
pub fn update_task(
    store: &mut impl TaskStore,
    task_id: &str,
    update: TaskUpdate,
    now: DateTime<Utc>,
) -> StoreResult<Task> {
    let mut task = logged("update_task", store.task(task_id))?;

    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = if description.is_empty() { None } else { Some(description) };
    }
    if let Some(category) = update.category {
        task.category = category;
    }
    if let Some(urgency) = update.urgency {
        task.urgency = urgency;
        task.urgency_source = update.urgency_source.unwrap_or(UrgencySource::User);
    } else if let Some(source) = update.urgency_source {
        task.urgency_source = source;
    }
    if let Some(due) = update.due_date {
        task.due_date = Some(due);
    }
    if let Some(times) = update.reminder_times {
        task.reminder_times = times;
    }
    if let Some(tags) = update.tags {
        task.tags = tags;
    }
    if let Some(minutes) = update.actual_duration {
        task.actual_duration = Some(minutes);
    }
    if let Some(long_term) = update.is_long_term {
        task.is_long_term = long_term;
    }
    let mut completing = false;
    if let Some(status) = update.status {
        match (task.status, status) {
            (TaskStatus::Completed, TaskStatus::Completed) => {}
            (_, TaskStatus::Completed) => {
                task.mark_completed(now);
                completing = true;
            }
            (TaskStatus::Completed, other) => {
                task.status = other;
                task.completed_at = None;
                task.time_to_completion = None;
            }
            (_, other) => task.status = other,
        }
    }
    task.updated_at = now;

    logged("update_task", store.save_task(task.clone()))?;
    tracing::debug!(task_id, status = %task.status, "updated task");
    if completing {
        schedule_next(store, &task, now)?;
    }
    Ok(task)
}

pub fn set_status(
    store: &mut impl TaskStore,
    task_id: &str,
    status: TaskStatus,
    now: DateTime<Utc>,
) -> StoreResult<Task> {
    let update = TaskUpdate {
        status: Some(status),
        ..TaskUpdate::default()
    };
    update_task(store, task_id, update, now)
}

/// Complete a task. Recurring tasks spawn their next pending instance.
/// Completing an already completed task changes nothing.
pub fn complete_task(store: &mut impl TaskStore, task_id: &str, now: DateTime<Utc>) -> StoreResult<Completion> {
    let mut task = logged("complete_task", store.task(task_id))?;
    if task.status == TaskStatus::Completed {
        tracing::debug!(task_id, "task already completed");
        return Ok(Completion { task, next: None });
    }
    task.mark_completed(now);
    logged("complete_task", store.save_task(task.clone()))?;
    tracing::debug!(task_id, days = ?task.time_to_completion, "completed task");

    let next = schedule_next(store, &task, now)?;
    Ok(Completion { task, next })
}

/// Insert the next occurrence of a just-completed recurring task.
fn schedule_next(store: &mut impl TaskStore, task: &Task, now: DateTime<Utc>) -> StoreResult<Option<Task>> {
    let Some(next) = task.next_occurrence(Uuid::new_v4().to_string(), now) else {
        return Ok(None);
    };
    logged("schedule_next", store.insert_task(next.clone()))?;
    tracing::debug!(task_id = %next.task_id, occurrence = next.occurrence, "scheduled next occurrence");
    Ok(Some(next))
}

pub fn archive_task(store: &mut impl TaskStore, task_id: &str, now: DateTime<Utc>) -> StoreResult<Task> {
    set_status(store, task_id, TaskStatus::Archived, now)
}

pub fn delete_task(store: &mut impl TaskStore, task_id: &str) -> StoreResult<()> {
    logged("delete_task", store.delete_task(task_id))?;
    tracing::debug!(task_id, "deleted task");
    Ok(())
}

pub fn add_subtask(
    store: &mut impl TaskStore,
    task_id: &str,
    title: &str,
    now: DateTime<Utc>,
) -> StoreResult<Subtask> {
    let mut task = logged("add_subtask", store.task(task_id))?;
    let sub = task.add_subtask(title, now).clone();
    logged("add_subtask", store.save_task(task))?;
    Ok(sub)
}

/// Flip a subtask and return the updated parent.
pub fn toggle_subtask(
    store: &mut impl TaskStore,
    task_id: &str,
    subtask_id: &str,
    now: DateTime<Utc>,
) -> StoreResult<Task> {
    let mut task = logged("toggle_subtask", store.task(task_id))?;
    if task.toggle_subtask(subtask_id, now).is_none() {
        return Err(StoreError::NotFound {
            kind: "subtask",
            id: subtask_id.to_string(),
        });
    }
    logged("toggle_subtask", store.save_task(task.clone()))?;
    Ok(task)
}

/// Up to `n` open tasks, most urgent first, then earliest due. Tasks with
/// no due date sort after dated ones of the same urgency.
pub fn focus_tasks(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut open: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
        .collect();
    open.sort_by(|a, b| {
        b.urgency
            .cmp(&a.urgency)
            .then_with(|| match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.created_at.cmp(&b.created_at),
            })
    });
    open.truncate(n);
    open
}

/// Consecutive local days, ending today, with at least one completion.
/// A day without completions today does not break a streak that ran
/// through yesterday.
pub fn completion_streak(tasks: &[Task], now: DateTime<Utc>, tz: Tz) -> u32 {
    let days: BTreeSet<NaiveDate> = tasks
        .iter()
        .filter_map(|t| t.completed_at)
        .map(|at| at.with_timezone(&tz).date_naive())
        .collect();

    let today = now.with_timezone(&tz).date_naive();
    let mut day = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(d) => d,
            None => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
