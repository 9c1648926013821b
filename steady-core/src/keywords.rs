//! Static keyword tables for the category and urgency scorers.
//!
//! Lists are matched as lowercase substrings, with no word-boundary check.
//! Duplicates are intentional: each entry counts as its own hit.

use crate::task::{TaskCategory, UrgencyLevel};

pub const WORK_KEYWORDS: &[&str] = &[
    // Meetings & communication
    "meeting", "email", "call", "conference", "zoom", "teams", "slack",
    "phone call", "interview", "presentation", "1:1", "standup",
    // Deliverables
    "report", "presentation", "deadline", "project", "submit", "deliver",
    "proposal", "document", "spreadsheet", "analysis", "review",
    // People & places
    "client", "boss", "colleague", "team", "manager", "coworker",
    "office", "work", "desk", "cubicle",
    // Actions
    "finish", "complete", "prepare", "send", "follow up", "schedule",
];

pub const HEALTH_KEYWORDS: &[&str] = &[
    // Medical
    "doctor", "appointment", "dentist", "therapy", "therapist",
    "checkup", "physical", "medical", "clinic", "hospital",
    "prescription", "medicine", "medication", "pharmacy", "refill",
    "blood test", "lab", "xray", "scan",
    // Mental health
    "mental health", "counseling", "psychiatrist", "psychologist",
    "meditation", "mindfulness", "stress", "anxiety",
    // Fitness
    "gym", "workout", "exercise", "run", "jog", "walk", "hike",
    "yoga", "pilates", "cardio", "weights", "training", "fitness",
    "bike", "swim", "sport",
    // Wellness
    "health", "wellness", "self care", "sleep", "rest",
];

pub const SHOPPING_KEYWORDS: &[&str] = &[
    "buy", "purchase", "order", "shop", "get", "pick up",
    "return", "exchange",
    "shopping", "store", "mall", "market", "grocery", "groceries",
    "amazon", "target", "walmart", "costco", "trader joe",
    "online", "retail",
    "gift", "present", "supplies", "food", "clothes", "clothing",
    "electronics", "furniture", "household",
];

pub const PERSONAL_KEYWORDS: &[&str] = &[
    // Home
    "clean", "cleaning", "organize", "tidy", "declutter",
    "laundry", "dishes", "vacuum", "sweep", "mop", "dust",
    "chores", "home", "house", "apartment", "room",
    // Maintenance
    "fix", "repair", "maintenance", "replace", "install",
    "plumber", "electrician", "handyman",
    // Admin
    "pay", "bills", "taxes", "insurance", "bank", "banking",
    "renew", "register", "dmv", "license", "paperwork",
    "forms", "application",
    // Errands
    "errands", "post office", "mail", "drop off", "pick up",
];

pub const SOCIAL_KEYWORDS: &[&str] = &[
    "birthday", "party", "event", "celebration", "gathering",
    "wedding", "anniversary", "holiday", "festival",
    "friend", "friends", "family", "mom", "dad", "sister", "brother",
    "parents", "kids", "children", "partner", "spouse",
    "meet", "catch up", "dinner", "lunch", "coffee", "drinks",
    "visit", "hangout", "hang out", "plans", "date",
    "brunch", "breakfast",
];

pub fn category_keywords(category: TaskCategory) -> &'static [&'static str] {
    match category {
        TaskCategory::Work => WORK_KEYWORDS,
        TaskCategory::Health => HEALTH_KEYWORDS,
        TaskCategory::Shopping => SHOPPING_KEYWORDS,
        TaskCategory::Personal => PERSONAL_KEYWORDS,
        TaskCategory::Social => SOCIAL_KEYWORDS,
        TaskCategory::Other => &[],
    }
}

/// Time-urgency vocabulary: how soon something needs doing.
pub const CRITICAL_TIME_KEYWORDS: &[&str] = &[
    "urgent", "asap", "emergency", "critical", "immediately", "right now",
    "now", "today", "overdue", "late", "past due", "missed", "time sensitive",
];

pub const HIGH_TIME_KEYWORDS: &[&str] = &[
    "soon", "this week", "deadline", "due", "tomorrow", "next few days",
    "coming up", "approaching", "before",
];

pub const MEDIUM_TIME_KEYWORDS: &[&str] = &[
    "upcoming", "next week", "next month", "eventually", "should", "plan to",
];

pub const LOW_TIME_KEYWORDS: &[&str] = &[
    "someday", "maybe", "when possible", "if time", "later", "future",
    "whenever", "no rush", "low priority",
];

/// Scan order for time keywords. On equal hit counts the earlier level wins.
pub const TIME_KEYWORD_ORDER: [UrgencyLevel; 4] = [
    UrgencyLevel::Critical,
    UrgencyLevel::High,
    UrgencyLevel::Medium,
    UrgencyLevel::Low,
];

pub fn time_keywords(level: UrgencyLevel) -> &'static [&'static str] {
    match level {
        UrgencyLevel::Critical => CRITICAL_TIME_KEYWORDS,
        UrgencyLevel::High => HIGH_TIME_KEYWORDS,
        UrgencyLevel::Medium => MEDIUM_TIME_KEYWORDS,
        UrgencyLevel::Low => LOW_TIME_KEYWORDS,
    }
}

/// Importance vocabulary: how much something matters, independent of timing.
pub const HIGH_IMPORTANCE_KEYWORDS: &[&str] = &[
    "important", "crucial", "essential", "vital", "must", "need to",
    "priority", "critical", "key", "necessary",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        let all = TaskCategory::ALL
            .into_iter()
            .flat_map(category_keywords)
            .chain(TIME_KEYWORD_ORDER.into_iter().flat_map(time_keywords))
            .chain(HIGH_IMPORTANCE_KEYWORDS);
        for kw in all {
            assert_eq!(*kw, kw.to_lowercase(), "keyword {kw:?} must be lowercase");
        }
    }

    #[test]
    fn test_other_has_no_keywords() {
        assert!(category_keywords(TaskCategory::Other).is_empty());
    }
}
