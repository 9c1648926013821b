//! Task model: categories, urgency levels, subtasks and recurrence.
//!
//! Every task is owned by exactly one user. Status changes are free-form: any
//! status may be set from any other, completion only stamps metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Returned when a label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    #[serde(rename = "work")]
    Work,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "personal")]
    Personal,
    #[serde(rename = "social")]
    Social,
    #[serde(rename = "other")]
    Other,
}

impl TaskCategory {
    /// Scoring order. Ties go to whichever category comes first here.
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Work,
        TaskCategory::Health,
        TaskCategory::Shopping,
        TaskCategory::Personal,
        TaskCategory::Social,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Health => "health",
            TaskCategory::Shopping => "shopping",
            TaskCategory::Personal => "personal",
            TaskCategory::Social => "social",
            TaskCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Health => "Health",
            TaskCategory::Shopping => "Shopping",
            TaskCategory::Personal => "Personal",
            TaskCategory::Social => "Social",
            TaskCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "category",
                value: s.to_string(),
                expected: "work, health, shopping, personal, social, other",
            })
    }
}

/// Urgency on an ordinal scale: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl UrgencyLevel {
    /// Ordinal order, lowest first.
    pub const ORDERED: [UrgencyLevel; 4] = [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
        UrgencyLevel::Critical,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps an ordinal back to a level, clamping past either end.
    pub fn from_index(index: usize) -> Self {
        UrgencyLevel::ORDERED[index.min(UrgencyLevel::ORDERED.len() - 1)]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
            UrgencyLevel::Critical => "critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "Needs immediate attention",
            UrgencyLevel::High => "Important, do soon",
            UrgencyLevel::Medium => "Should be done this week",
            UrgencyLevel::Low => "Can wait, no rush",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        UrgencyLevel::ORDERED
            .into_iter()
            .find(|u| u.as_str() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "urgency",
                value: s.to_string(),
                expected: "critical, high, medium, low",
            })
    }
}

/// Where a task's urgency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencySource {
    User,
    Suggested,
    Learned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "archived")]
    Archived,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "status",
                value: s.to_string(),
                expected: "pending, in-progress, completed, archived",
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub subtask_id: String,
    pub title: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Subtask {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            subtask_id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            completed_at: None,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(ParseLabelError {
                kind: "frequency",
                value: s.to_string(),
                expected: "daily, weekly, monthly, yearly",
            }),
        }
    }
}

/// Repeat rule: every `interval` units of `frequency`, optionally bounded by
/// an end date and/or a total occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub until: Option<DateTime<Utc>>,
    pub count: Option<u32>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval: interval.max(1),
            until: None,
            count: None,
        }
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Due date of the occurrence after `occurrence` (1-based), or `None` once
    /// the rule is exhausted.
    pub fn next_due(&self, from: DateTime<Utc>, occurrence: u32) -> Option<DateTime<Utc>> {
        if self.count.is_some_and(|c| occurrence >= c) {
            return None;
        }

        let step = self.interval.max(1);
        let next = match self.frequency {
            Frequency::Daily => from.checked_add_signed(Duration::days(step.into()))?,
            Frequency::Weekly => from.checked_add_signed(Duration::weeks(step.into()))?,
            // chrono clamps Jan 31 + 1 month to the last day of February.
            Frequency::Monthly => from.checked_add_months(Months::new(step))?,
            Frequency::Yearly => from.checked_add_months(Months::new(step.saturating_mul(12)))?,
        };

        match self.until {
            Some(until) if next > until => None,
            _ => Some(next),
        }
    }
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,

    pub category: TaskCategory,
    /// Scorer confidence when the category was suggested.
    pub category_confidence: Option<f64>,

    pub urgency: UrgencyLevel,
    pub urgency_source: UrgencySource,
    pub suggested_urgency: Option<UrgencyLevel>,

    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder_times: Vec<DateTime<Utc>>,

    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub recurrence: Option<Recurrence>,
    /// 1-based index within a recurring series.
    #[serde(default = "first_occurrence")]
    pub occurrence: u32,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_long_term: bool,

    /// Minutes.
    pub estimated_duration: Option<u32>,
    /// Minutes.
    pub actual_duration: Option<u32>,
    /// Whole days from creation to completion.
    pub time_to_completion: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn first_occurrence() -> u32 {
    1
}

impl Task {
    pub fn new(
        task_id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            category: TaskCategory::Other,
            category_confidence: None,
            urgency: UrgencyLevel::Medium,
            urgency_source: UrgencySource::User,
            suggested_urgency: None,
            due_date: None,
            reminder_times: Vec::new(),
            status: TaskStatus::Pending,
            completed_at: None,
            subtasks: Vec::new(),
            recurrence: None,
            occurrence: 1,
            tags: Vec::new(),
            is_long_term: false,
            estimated_duration: None,
            actual_duration: None,
            time_to_completion: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Marks the task completed and derives `time_to_completion` in whole days.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.time_to_completion = Some((now - self.created_at).num_days());
        self.actual_duration = self.estimated_duration;
        self.updated_at = now;
    }

    pub fn add_subtask(&mut self, title: impl Into<String>, now: DateTime<Utc>) -> &Subtask {
        self.subtasks.push(Subtask::new(title, now));
        self.updated_at = now;
        &self.subtasks[self.subtasks.len() - 1]
    }

    /// Flips a subtask's completion flag. Returns the new state, or `None` when
    /// no subtask has that id.
    pub fn toggle_subtask(&mut self, subtask_id: &str, now: DateTime<Utc>) -> Option<bool> {
        let sub = self.subtasks.iter_mut().find(|s| s.subtask_id == subtask_id)?;
        sub.completed = !sub.completed;
        sub.completed_at = if sub.completed { Some(now) } else { None };
        self.updated_at = now;
        Some(sub.completed)
    }

    pub fn remove_subtask(&mut self, subtask_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.subtasks.len();
        self.subtasks.retain(|s| s.subtask_id != subtask_id);
        let removed = self.subtasks.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Percentage of completed subtasks, `None` without subtasks.
    pub fn subtask_progress(&self) -> Option<f64> {
        if self.subtasks.is_empty() {
            return None;
        }
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        Some(done as f64 * 100.0 / self.subtasks.len() as f64)
    }

    /// The next pending instance of a recurring task, if the rule allows one.
    pub fn next_occurrence(&self, task_id: impl Into<String>, now: DateTime<Utc>) -> Option<Task> {
        let rule = self.recurrence.as_ref()?;
        let anchor = self.due_date.unwrap_or(now);
        let next_due = rule.next_due(anchor, self.occurrence)?;

        let mut next = self.clone();
        next.task_id = task_id.into();
        next.due_date = Some(next_due);
        next.status = TaskStatus::Pending;
        next.completed_at = None;
        next.actual_duration = None;
        next.time_to_completion = None;
        next.occurrence = self.occurrence + 1;
        next.reminder_times.clear();
        next.created_at = now;
        next.updated_at = now;
        for sub in &mut next.subtasks {
            sub.subtask_id = Uuid::new_v4().to_string();
            sub.completed = false;
            sub.completed_at = None;
            sub.created_at = now;
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_urgency_ordinal_roundtrip() {
        for level in UrgencyLevel::ORDERED {
            assert_eq!(UrgencyLevel::from_index(level.index()), level);
        }
        assert_eq!(UrgencyLevel::from_index(9), UrgencyLevel::Critical);
        assert!(UrgencyLevel::Low < UrgencyLevel::Critical);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("Health".parse::<TaskCategory>().unwrap(), TaskCategory::Health);
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("CRITICAL".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::Critical);
        let err = "chores".parse::<TaskCategory>().unwrap_err();
        assert_eq!(err.kind, "category");
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_mark_completed_derives_days() {
        let mut t = Task::new("t1", "u1", "File taxes", at(2026, 3, 1, 9));
        t.estimated_duration = Some(45);
        t.mark_completed(at(2026, 3, 4, 8));
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.completed_at, Some(at(2026, 3, 4, 8)));
        // 2 days 23 hours floors to 2
        assert_eq!(t.time_to_completion, Some(2));
        assert_eq!(t.actual_duration, Some(45));
    }

    #[test]
    fn test_subtask_toggle_and_progress() {
        let now = at(2026, 3, 1, 9);
        let mut t = Task::new("t1", "u1", "Clean kitchen", now);
        assert_eq!(t.subtask_progress(), None);

        let first = t.add_subtask("Dishes", now).subtask_id.clone();
        t.add_subtask("Counters", now);

        assert_eq!(t.toggle_subtask(&first, now), Some(true));
        assert_eq!(t.subtask_progress(), Some(50.0));
        assert!(t.subtasks[0].completed_at.is_some());

        assert_eq!(t.toggle_subtask(&first, now), Some(false));
        assert!(t.subtasks[0].completed_at.is_none());
        assert_eq!(t.toggle_subtask("missing", now), None);

        assert!(t.remove_subtask(&first, now));
        assert!(!t.remove_subtask(&first, now));
        assert_eq!(t.subtasks.len(), 1);
    }

    #[test]
    fn test_recurrence_monthly_clamps_to_month_end() {
        let rule = Recurrence::new(Frequency::Monthly, 1);
        let next = rule.next_due(at(2026, 1, 31, 12), 1).unwrap();
        assert_eq!(next, at(2026, 2, 28, 12));
    }

    #[test]
    fn test_recurrence_respects_count_and_until() {
        let counted = Recurrence::new(Frequency::Daily, 2).count(3);
        assert_eq!(counted.next_due(at(2026, 5, 1, 8), 2), Some(at(2026, 5, 3, 8)));
        assert_eq!(counted.next_due(at(2026, 5, 3, 8), 3), None);

        let bounded = Recurrence::new(Frequency::Weekly, 1).until(at(2026, 5, 10, 0));
        assert_eq!(bounded.next_due(at(2026, 5, 1, 8), 1), Some(at(2026, 5, 8, 8)));
        assert_eq!(bounded.next_due(at(2026, 5, 8, 8), 2), None);
    }

    #[test]
    fn test_next_occurrence_resets_progress() {
        let now = at(2026, 5, 1, 8);
        let mut t = Task::new("t1", "u1", "Water plants", now)
            .with_due_date(at(2026, 5, 2, 18))
            .with_recurrence(Recurrence::new(Frequency::Weekly, 1));
        let sub = t.add_subtask("Balcony", now).subtask_id.clone();
        t.toggle_subtask(&sub, now);
        t.mark_completed(at(2026, 5, 2, 17));

        let next = t.next_occurrence("t2", at(2026, 5, 2, 17)).unwrap();
        assert_eq!(next.task_id, "t2");
        assert_eq!(next.status, TaskStatus::Pending);
        assert_eq!(next.due_date, Some(at(2026, 5, 9, 18)));
        assert_eq!(next.occurrence, 2);
        assert!(next.completed_at.is_none());
        assert!(next.subtasks.iter().all(|s| !s.completed));
        assert_ne!(next.subtasks[0].subtask_id, sub);
    }

    #[test]
    fn test_non_recurring_has_no_next() {
        let t = Task::new("t1", "u1", "One-off", at(2026, 5, 1, 8));
        assert!(t.next_occurrence("t2", at(2026, 5, 1, 9)).is_none());
    }
}
