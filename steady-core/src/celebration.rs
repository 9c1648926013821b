//! Celebration and motivation copy.
//!
//! Milestone lookups are deterministic; the general messages are a uniform
//! random pick.

use rand::seq::SliceRandom;

pub const TASK_COMPLETE: &[&str] = &[
    "🎉 Awesome! You did it!",
    "✨ Great job! Keep it up!",
    "🌟 You're crushing it!",
    "💪 Way to go!",
    "🔥 On fire! One more down!",
    "⚡ Boom! Task completed!",
    "🎯 Nailed it!",
    "🚀 You're unstoppable!",
    "💯 Perfect! You got this!",
    "🌈 Amazing work!",
    "👏 Fantastic! Keep going!",
    "🏆 Champion move!",
    "💎 That's how it's done!",
    "🎊 Crushed it!",
];

/// Exact streak lengths that earn a message.
pub const STREAK_MILESTONES: &[(u32, &str)] = &[
    (3, "🔥 3 day streak! You're building momentum!"),
    (7, "⭐ 1 week streak! Incredible consistency!"),
    (14, "💫 2 weeks strong! You're a habit-building machine!"),
    (30, "🏆 30 DAY STREAK! You're unstoppable!"),
    (100, "👑 100 DAYS! You're a productivity legend!"),
];

/// Highest threshold first.
pub const PROGRESS_MILESTONES: &[(f64, &str)] = &[
    (100.0, "🎉 ALL DONE! You finished everything! Amazing! 🎊"),
    (75.0, "75% complete! Almost done! 🔥"),
    (50.0, "Halfway there! Keep pushing! 💪"),
    (25.0, "You're 25% done! Great start! 🎯"),
];

pub const FOCUS_MODE_COMPLETE: &[&str] = &[
    "🎯 Focus Mode conquered! Ready for 3 more?",
    "💪 Top 3 done! You're a machine!",
    "🔥 Crushed the essentials! What's next?",
    "⚡ Focus session complete! Feeling good?",
];

pub const MORNING_BOOST: &[&str] = &[
    "☀️ Good morning! Let's make today count!",
    "🌅 New day, new wins! You got this!",
    "☕ Morning! Time to knock out some tasks!",
];

pub const EVENING_WRAP: &[&str] = &[
    "🌙 Great work today! Time to rest.",
    "✨ You did well today! Be proud.",
    "🌃 Solid day! Tomorrow will be even better.",
];

fn pick(messages: &'static [&'static str]) -> &'static str {
    messages
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

/// Random message for finishing a task.
pub fn random_celebration() -> &'static str {
    pick(TASK_COMPLETE)
}

pub fn focus_mode_celebration() -> &'static str {
    pick(FOCUS_MODE_COMPLETE)
}

/// Message for the highest progress milestone reached, if any.
pub fn progress_celebration(percentage: f64) -> Option<&'static str> {
    PROGRESS_MILESTONES
        .iter()
        .find(|(threshold, _)| percentage >= *threshold)
        .map(|(_, msg)| *msg)
}

/// Message when `streak_days` lands exactly on a milestone.
pub fn streak_celebration(streak_days: u32) -> Option<&'static str> {
    STREAK_MILESTONES
        .iter()
        .find(|(days, _)| *days == streak_days)
        .map(|(_, msg)| *msg)
}

/// Morning (5-11) or evening (20-4) message for a local hour.
pub fn time_based_message(hour: u32) -> Option<&'static str> {
    match hour {
        5..=11 => Some(pick(MORNING_BOOST)),
        20..=23 | 0..=4 => Some(pick(EVENING_WRAP)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_milestones() {
        assert_eq!(progress_celebration(10.0), None);
        assert_eq!(progress_celebration(25.0), Some("You're 25% done! Great start! 🎯"));
        assert_eq!(progress_celebration(66.7), Some("Halfway there! Keep pushing! 💪"));
        assert_eq!(progress_celebration(99.9), Some("75% complete! Almost done! 🔥"));
        assert_eq!(
            progress_celebration(100.0),
            Some("🎉 ALL DONE! You finished everything! Amazing! 🎊")
        );
    }

    #[test]
    fn test_streak_exact_match_only() {
        assert_eq!(streak_celebration(7), Some("⭐ 1 week streak! Incredible consistency!"));
        assert_eq!(streak_celebration(8), None);
        assert_eq!(streak_celebration(0), None);
    }

    #[test]
    fn test_random_picks_come_from_tables() {
        for _ in 0..20 {
            assert!(TASK_COMPLETE.contains(&random_celebration()));
            assert!(FOCUS_MODE_COMPLETE.contains(&focus_mode_celebration()));
        }
    }

    #[test]
    fn test_time_based_message() {
        assert!(MORNING_BOOST.contains(&time_based_message(8).unwrap()));
        assert!(EVENING_WRAP.contains(&time_based_message(22).unwrap()));
        assert!(EVENING_WRAP.contains(&time_based_message(3).unwrap()));
        assert_eq!(time_based_message(14), None);
    }
}
