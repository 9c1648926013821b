//! steady-core: task and wellness tracking with keyword-based suggestions

pub mod categorize;
pub mod celebration;
pub mod checkins;
pub mod data;
pub mod keywords;
pub mod store;
pub mod task;
pub mod tasks;
pub mod templates;
pub mod time;
pub mod urgency;
pub mod wellness;

pub use categorize::{categorize, suggest_categories, CategoryResult};
pub use store::{CheckInStore, MemoryStore, StoreError, StoreResult, TaskStore, TemplateStore};
pub use task::{
    Frequency, ParseLabelError, Recurrence, Subtask, Task, TaskCategory, TaskStatus, UrgencyLevel,
    UrgencySource,
};
pub use tasks::{AutoFill, Completion, NewTask, TaskFilter, TaskUpdate};
pub use templates::{NewTemplate, TaskTemplate};
pub use urgency::{suggest_urgency, suggest_urgency_at, ConfidenceBand, UrgencySuggestion};
pub use wellness::{
    CheckInType, DailyWellnessSummary, DayTrend, NewCheckIn, WellnessCheckIn, BREAKS_GOAL,
    HYDRATION_GOAL, MEALS_GOAL,
};
