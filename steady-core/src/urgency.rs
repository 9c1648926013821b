//! Urgency suggestion from due-date proximity and keywords.
//!
//! Urgency (how soon) and importance (how much it matters) are separate axes.
//! The due date is the primary signal. Time keywords can escalate it by at
//! most one level, and importance only bumps tasks that are already at least
//! medium by due date. Without a due date, keywords alone decide, at low
//! confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::categorize::scoring_text;
use crate::keywords::{HIGH_IMPORTANCE_KEYWORDS, TIME_KEYWORD_ORDER, time_keywords};
use crate::task::UrgencyLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencySuggestion {
    pub urgency: UrgencyLevel,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_keywords: Option<Vec<String>>,
}

/// Thresholds the UI uses to decide how much to trust a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceBand {
    pub const HIGH: f64 = 0.7;
    pub const MEDIUM: f64 = 0.5;
    pub const LOW: f64 = 0.3;

    pub fn of(confidence: f64) -> Self {
        if confidence >= Self::HIGH {
            ConfidenceBand::High
        } else if confidence >= Self::MEDIUM {
            ConfidenceBand::Medium
        } else if confidence >= Self::LOW {
            ConfidenceBand::Low
        } else {
            ConfidenceBand::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
            ConfidenceBand::VeryLow => "very low",
        }
    }
}

struct DueDateSignal {
    urgency: UrgencyLevel,
    confidence: f64,
    reasoning: String,
}

/// Buckets time-until-due. Hours and days are whole units truncated toward
/// zero, so 2h59m counts as 2 hours and 47h as 1 day.
fn due_date_signal(due: DateTime<Utc>, now: DateTime<Utc>) -> DueDateSignal {
    let until = due - now;
    let hours = until.num_hours();
    let days = until.num_days();

    let (urgency, confidence, reasoning) = if hours < 0 {
        (UrgencyLevel::Critical, 1.0, "⚠️ Overdue".to_string())
    } else if hours < 3 {
        (UrgencyLevel::Critical, 1.0, "🔥 Due in less than 3 hours".to_string())
    } else if hours < 24 {
        (UrgencyLevel::Critical, 0.95, "📅 Due today".to_string())
    } else if days == 1 {
        (UrgencyLevel::High, 0.9, "📅 Due tomorrow".to_string())
    } else if days <= 2 {
        (UrgencyLevel::High, 0.85, format!("📅 Due in {days} days"))
    } else if days <= 5 {
        (UrgencyLevel::Medium, 0.75, format!("📅 Due in {days} days"))
    } else if days <= 14 {
        (UrgencyLevel::Low, 0.7, format!("📅 Due in {days} days"))
    } else {
        let weeks = (days + 6) / 7;
        (UrgencyLevel::Low, 0.6, format!("📅 Due in {weeks} week(s)"))
    };

    DueDateSignal {
        urgency,
        confidence,
        reasoning,
    }
}

struct KeywordSignal {
    /// Level with the most hits; medium when nothing matched.
    urgency: UrgencyLevel,
    max_hits: usize,
    detected: Vec<String>,
}

fn time_keyword_signal(text: &str) -> KeywordSignal {
    let mut detected = Vec::new();
    let mut urgency = UrgencyLevel::Medium;
    let mut max_hits = 0usize;

    for level in TIME_KEYWORD_ORDER {
        let mut hits = 0usize;
        for kw in time_keywords(level) {
            if text.contains(kw) {
                hits += 1;
                detected.push((*kw).to_string());
            }
        }
        if hits > max_hits {
            max_hits = hits;
            urgency = level;
        }
    }

    KeywordSignal {
        urgency,
        max_hits,
        detected,
    }
}

/// First importance keyword present in the text.
fn importance_keyword(text: &str) -> Option<&'static str> {
    HIGH_IMPORTANCE_KEYWORDS
        .iter()
        .copied()
        .find(|kw| text.contains(kw))
}

/// Suggest urgency evaluated against the current wall clock.
pub fn suggest_urgency(
    title: &str,
    description: Option<&str>,
    due_date: Option<DateTime<Utc>>,
) -> UrgencySuggestion {
    suggest_urgency_at(title, description, due_date, Utc::now())
}

/// Suggest urgency as of `now`.
pub fn suggest_urgency_at(
    title: &str,
    description: Option<&str>,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> UrgencySuggestion {
    let text = scoring_text(title, description);

    let keywords = time_keyword_signal(&text);
    let mut detected = keywords.detected.clone();

    let important = importance_keyword(&text);
    if let Some(kw) = important {
        detected.push(format!("{kw} (important)"));
    }

    let (urgency, confidence, reasoning) = match due_date {
        Some(due) => {
            let base = due_date_signal(due, now);
            let base_index = base.urgency.index();
            let keyword_index = keywords.urgency.index();
            let mut reasoning = base.reasoning;

            let (mut urgency, mut confidence) =
                if keywords.max_hits > 0 && keyword_index > base_index {
                    reasoning.push_str(" + urgency keywords detected");
                    (
                        UrgencyLevel::from_index((base_index + 1).min(keyword_index)),
                        (base.confidence + 0.1).min(1.0),
                    )
                } else {
                    (base.urgency, base.confidence)
                };

            if important.is_some() && base_index >= UrgencyLevel::Medium.index() {
                let current = urgency.index();
                if current < UrgencyLevel::Critical.index() {
                    urgency = UrgencyLevel::from_index(current + 1);
                    reasoning.push_str(" + marked as important");
                    confidence = (confidence + 0.05).min(1.0);
                }
            }

            (urgency, confidence, reasoning)
        }
        None if keywords.max_hits > 0 => {
            let mut reasoning = format!("Time keywords: \"{}\"", keywords.urgency);
            let mut confidence = 0.5;
            if important.is_some() {
                reasoning.push_str(" + important");
                confidence = 0.6;
            }
            (keywords.urgency, confidence, reasoning)
        }
        None => {
            // Important but not time-bound stays medium.
            let reasoning = if important.is_some() {
                "Marked as important but no time constraint"
            } else {
                "No due date or urgency indicators"
            };
            (UrgencyLevel::Medium, 0.3, reasoning.to_string())
        }
    };

    UrgencySuggestion {
        urgency,
        confidence,
        reasoning,
        detected_keywords: if detected.is_empty() { None } else { Some(detected) },
    }
}
