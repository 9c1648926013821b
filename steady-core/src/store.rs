//! Storage collaborator seam.
//!
//! Records are keyed by id and scoped to one `user_id`. Implementations only
//! need to persist what they are given and return it on later reads; failures
//! collapse into [`StoreError::NotFound`] or [`StoreError::Other`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::task::Task;
use crate::templates::TaskTemplate;
use crate::wellness::WellnessCheckIn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("storage error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "task",
            id: id.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message: String = message.into();
        StoreError::Other(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Other(Box::new(e))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Other(Box::new(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait TaskStore {
    fn insert_task(&mut self, task: Task) -> StoreResult<()>;

    fn task(&self, task_id: &str) -> StoreResult<Task>;

    /// Replace an existing task. `NotFound` if the id is unknown.
    fn save_task(&mut self, task: Task) -> StoreResult<()>;

    fn delete_task(&mut self, task_id: &str) -> StoreResult<()>;

    fn tasks_for_user(&self, user_id: &str) -> StoreResult<Vec<Task>>;
}

pub trait CheckInStore {
    fn insert_check_in(&mut self, check_in: WellnessCheckIn) -> StoreResult<()>;

    fn check_ins_for_user(&self, user_id: &str) -> StoreResult<Vec<WellnessCheckIn>>;

    /// Remove every check-in of a user, returning how many went.
    fn delete_check_ins_for_user(&mut self, user_id: &str) -> StoreResult<usize>;

    /// Check-ins with `start <= timestamp <= end`, newest first.
    fn check_ins_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<WellnessCheckIn>> {
        let mut out: Vec<_> = self
            .check_ins_for_user(user_id)?
            .into_iter()
            .filter(|c| c.timestamp >= start && c.timestamp <= end)
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(out)
    }
}

pub trait TemplateStore {
    fn insert_template(&mut self, template: TaskTemplate) -> StoreResult<()>;

    fn templates_for_user(&self, user_id: &str) -> StoreResult<Vec<TaskTemplate>>;
}

/// Process-local store, used by tests and as a scratch backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tasks: HashMap<String, Task>,
    check_ins: Vec<WellnessCheckIn>,
    templates: Vec<TaskTemplate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn insert_task(&mut self, task: Task) -> StoreResult<()> {
        if self.tasks.contains_key(&task.task_id) {
            return Err(StoreError::other(format!("duplicate task id: {}", task.task_id)));
        }
        self.tasks.insert(task.task_id.clone(), task);
        Ok(())
    }

    fn task(&self, task_id: &str) -> StoreResult<Task> {
        self.tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    fn save_task(&mut self, task: Task) -> StoreResult<()> {
        match self.tasks.get_mut(&task.task_id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(StoreError::task_not_found(task.task_id)),
        }
    }

    fn delete_task(&mut self, task_id: &str) -> StoreResult<()> {
        self.tasks
            .remove(task_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    fn tasks_for_user(&self, user_id: &str) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl CheckInStore for MemoryStore {
    fn insert_check_in(&mut self, check_in: WellnessCheckIn) -> StoreResult<()> {
        self.check_ins.push(check_in);
        Ok(())
    }

    fn check_ins_for_user(&self, user_id: &str) -> StoreResult<Vec<WellnessCheckIn>> {
        Ok(self
            .check_ins
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn delete_check_ins_for_user(&mut self, user_id: &str) -> StoreResult<usize> {
        let before = self.check_ins.len();
        self.check_ins.retain(|c| c.user_id != user_id);
        Ok(before - self.check_ins.len())
    }
}

impl TemplateStore for MemoryStore {
    fn insert_template(&mut self, template: TaskTemplate) -> StoreResult<()> {
        self.templates.push(template);
        Ok(())
    }

    fn templates_for_user(&self, user_id: &str) -> StoreResult<Vec<TaskTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}
