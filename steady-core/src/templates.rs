//! Task templates: named bundles of defaults that pre-fill a new task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{StoreResult, TemplateStore};
use crate::task::{TaskCategory, UrgencyLevel};
use crate::tasks::NewTask;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub template_id: String,
    /// `None` for built-in templates.
    pub user_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category: TaskCategory,
    pub urgency: UrgencyLevel,
    /// Minutes.
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category: TaskCategory,
    pub urgency: UrgencyLevel,
    pub estimated_duration: Option<u32>,
    pub subtasks: Vec<String>,
    pub tags: Vec<String>,
}

impl TaskTemplate {
    /// A new-task form pre-filled from this template. The template name is
    /// the title unless one is given.
    pub fn to_new_task(&self, title: Option<&str>) -> NewTask {
        NewTask {
            title: title.unwrap_or(&self.name).to_string(),
            description: self.description.clone(),
            category: Some(self.category),
            urgency: Some(self.urgency),
            estimated_duration: self.estimated_duration,
            subtasks: self.subtasks.clone(),
            tags: self.tags.clone(),
            ..NewTask::default()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn builtin(
    slug: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: TaskCategory,
    urgency: UrgencyLevel,
    minutes: u32,
    subtasks: &[&str],
    tags: &[&str],
) -> TaskTemplate {
    TaskTemplate {
        template_id: format!("default-{slug}"),
        user_id: None,
        name: name.to_string(),
        description: Some(description.to_string()),
        icon: Some(icon.to_string()),
        category,
        urgency,
        estimated_duration: Some(minutes),
        subtasks: subtasks.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        is_default: true,
        created_at: None,
        updated_at: None,
    }
}

pub fn default_templates() -> Vec<TaskTemplate> {
    use TaskCategory::*;
    use UrgencyLevel::*;

    vec![
        builtin(
            "morning-routine",
            "Morning Routine",
            "Start your day right",
            "🌅",
            Personal,
            Medium,
            45,
            &[
                "Take morning medication",
                "Drink a glass of water",
                "Eat breakfast",
                "Review today's tasks",
                "Quick 5-minute stretch",
            ],
            &["routine", "health", "morning"],
        ),
        builtin(
            "evening-wind-down",
            "Evening Wind-Down",
            "End your day peacefully",
            "🌙",
            Personal,
            Low,
            30,
            &[
                "Review completed tasks",
                "Plan tomorrow's top 3 tasks",
                "Take evening medication",
                "Set out tomorrow's clothes",
                "Wind-down activity (reading, meditation)",
            ],
            &["routine", "evening", "planning"],
        ),
        builtin(
            "weekly-review",
            "Weekly Review",
            "Reflect and plan ahead",
            "📊",
            Personal,
            Medium,
            60,
            &[
                "Review this week's accomplishments",
                "Archive completed tasks",
                "Plan next week's priorities",
                "Update long-term goals",
                "Celebrate wins (big or small!)",
            ],
            &["planning", "review", "weekly"],
        ),
        builtin(
            "grocery-shopping",
            "Grocery Shopping",
            "Stock up on essentials",
            "🛒",
            Shopping,
            Medium,
            60,
            &[
                "Check pantry and fridge",
                "Make shopping list",
                "Check for coupons/deals",
                "Go to store",
                "Put groceries away",
            ],
            &["shopping", "groceries", "errands"],
        ),
        builtin(
            "deep-work-session",
            "Deep Work Session",
            "Focus time for important work",
            "💻",
            Work,
            High,
            90,
            &[
                "Clear workspace",
                "Turn off notifications",
                "Set timer for 25 minutes",
                "Work on single task",
                "Take 5-minute break",
                "Repeat 3 more times",
                "Take longer 15-minute break",
            ],
            &["work", "focus", "productivity"],
        ),
        builtin(
            "house-cleaning",
            "House Cleaning",
            "Tidy up living space",
            "🧹",
            Personal,
            Low,
            90,
            &[
                "Do dishes",
                "Wipe down surfaces",
                "Vacuum or sweep floors",
                "Take out trash",
                "Tidy up clutter",
                "Do one load of laundry",
            ],
            &["cleaning", "home", "chores"],
        ),
        builtin(
            "self-care-hour",
            "Self-Care Hour",
            "Take care of yourself",
            "💆",
            Health,
            Medium,
            60,
            &[
                "Take a relaxing shower/bath",
                "Skincare routine",
                "Meditation or breathing exercises",
                "Journaling",
                "Listen to calming music",
            ],
            &["health", "self-care", "wellness"],
        ),
        builtin(
            "exercise-routine",
            "Exercise Routine",
            "Move your body",
            "🏃",
            Health,
            Medium,
            45,
            &[
                "Change into workout clothes",
                "Warm up (5-10 minutes)",
                "Main workout (20-30 minutes)",
                "Cool down and stretch",
                "Drink water and refuel",
            ],
            &["health", "exercise", "fitness"],
        ),
    ]
}

/// Built-in templates followed by the user's own.
pub fn all_templates(store: &impl TemplateStore, user_id: &str) -> StoreResult<Vec<TaskTemplate>> {
    let mut out = default_templates();
    out.extend(store.templates_for_user(user_id)?);
    Ok(out)
}

/// Case-insensitive lookup by name or id.
pub fn find_template<'a>(templates: &'a [TaskTemplate], key: &str) -> Option<&'a TaskTemplate> {
    let key = key.trim();
    templates
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(key) || t.template_id == key)
}

pub fn create_template(
    store: &mut impl TemplateStore,
    user_id: &str,
    input: NewTemplate,
    now: DateTime<Utc>,
) -> StoreResult<TaskTemplate> {
    let template = TaskTemplate {
        template_id: Uuid::new_v4().to_string(),
        user_id: Some(user_id.to_string()),
        name: input.name,
        description: input.description,
        icon: input.icon,
        category: input.category,
        urgency: input.urgency,
        estimated_duration: input.estimated_duration,
        subtasks: input.subtasks,
        tags: input.tags,
        is_default: false,
        created_at: Some(now),
        updated_at: Some(now),
    };
    store.insert_template(template.clone())?;
    tracing::debug!(template_id = %template.template_id, name = %template.name, "created template");
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    #[test]
    fn test_eight_defaults() {
        let defaults = default_templates();
        assert_eq!(defaults.len(), 8);
        assert!(defaults.iter().all(|t| t.is_default && t.user_id.is_none()));
        let deep = find_template(&defaults, "deep work session").unwrap();
        assert_eq!(deep.category, TaskCategory::Work);
        assert_eq!(deep.urgency, UrgencyLevel::High);
        assert_eq!(deep.subtasks.len(), 7);
    }

    #[test]
    fn test_to_new_task_prefills() {
        let defaults = default_templates();
        let groceries = find_template(&defaults, "default-grocery-shopping").unwrap();
        let input = groceries.to_new_task(Some("Saturday groceries"));
        assert_eq!(input.title, "Saturday groceries");
        assert_eq!(input.category, Some(TaskCategory::Shopping));
        assert_eq!(input.urgency, Some(UrgencyLevel::Medium));
        assert_eq!(input.estimated_duration, Some(60));
        assert_eq!(input.subtasks.first().map(String::as_str), Some("Check pantry and fridge"));

        let untitled = groceries.to_new_task(None);
        assert_eq!(untitled.title, "Grocery Shopping");
    }

    #[test]
    fn test_user_templates_follow_defaults() {
        let mut store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        create_template(
            &mut store,
            "u1",
            NewTemplate {
                name: "Pay rent".to_string(),
                description: None,
                icon: None,
                category: TaskCategory::Personal,
                urgency: UrgencyLevel::High,
                estimated_duration: Some(10),
                subtasks: vec!["Log in to bank".to_string()],
                tags: vec![],
            },
            now,
        )
        .unwrap();

        let all = all_templates(&store, "u1").unwrap();
        assert_eq!(all.len(), 9);
        assert_eq!(all[8].name, "Pay rent");
        assert!(!all[8].is_default);

        assert_eq!(all_templates(&store, "u2").unwrap().len(), 8);
    }
}
