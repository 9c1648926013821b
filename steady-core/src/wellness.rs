//! Wellness check-ins and their daily/weekly aggregation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::task::ParseLabelError;

/// Daily hydration goal (glasses).
pub const HYDRATION_GOAL: usize = 8;
/// Daily meal goal.
pub const MEALS_GOAL: usize = 3;
/// Daily break goal.
pub const BREAKS_GOAL: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInType {
    Hydration,
    Meal,
    Break,
    Medication,
    Mood,
    Energy,
    Custom,
}

impl CheckInType {
    pub const ALL: [CheckInType; 7] = [
        CheckInType::Hydration,
        CheckInType::Meal,
        CheckInType::Break,
        CheckInType::Medication,
        CheckInType::Mood,
        CheckInType::Energy,
        CheckInType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInType::Hydration => "hydration",
            CheckInType::Meal => "meal",
            CheckInType::Break => "break",
            CheckInType::Medication => "medication",
            CheckInType::Mood => "mood",
            CheckInType::Energy => "energy",
            CheckInType::Custom => "custom",
        }
    }
}

impl fmt::Display for CheckInType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckInType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CheckInType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "check-in type",
                value: s.to_string(),
                expected: "hydration, meal, break, medication, mood, energy, custom",
            })
    }
}

/// A single logged wellness event. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessCheckIn {
    pub check_in_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub check_in_type: CheckInType,
    pub timestamp: DateTime<Utc>,
    /// 1-5.
    pub mood: Option<u8>,
    /// 1-5.
    pub energy: Option<u8>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for logging a check-in. Ratings are clamped to 1-5.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCheckIn {
    pub mood: Option<u8>,
    pub energy: Option<u8>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl NewCheckIn {
    pub fn with_mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood.clamp(1, 5));
        self
    }

    pub fn with_energy(mut self, energy: u8) -> Self {
        self.energy = Some(energy.clamp(1, 5));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.is_empty() { None } else { Some(notes) };
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWellnessSummary {
    pub date: NaiveDate,
    pub hydration_goal: usize,
    pub hydration_completed: usize,
    pub meals_goal: usize,
    pub meals_completed: usize,
    pub breaks_goal: usize,
    pub breaks_completed: usize,
    /// Absent when no check-in carried a mood, never zero-filled.
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
    pub insights: Vec<String>,
}

/// One day of the weekly trend. Days without check-ins have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTrend {
    pub date: NaiveDate,
    pub hydration: usize,
    pub meals: usize,
    pub breaks: usize,
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
}

struct Tally {
    hydration: usize,
    meals: usize,
    breaks: usize,
    average_mood: Option<f64>,
    average_energy: Option<f64>,
}

fn average(values: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = values.fold((0u32, 0u32), |(s, c), v| (s + u32::from(v), c + 1));
    if count == 0 {
        None
    } else {
        Some(f64::from(sum) / f64::from(count))
    }
}

fn tally<'a>(check_ins: impl IntoIterator<Item = &'a WellnessCheckIn> + Clone) -> Tally {
    let count = |t: CheckInType| {
        check_ins
            .clone()
            .into_iter()
            .filter(|c| c.check_in_type == t)
            .count()
    };

    Tally {
        hydration: count(CheckInType::Hydration),
        meals: count(CheckInType::Meal),
        breaks: count(CheckInType::Break),
        average_mood: average(check_ins.clone().into_iter().filter_map(|c| c.mood)),
        average_energy: average(check_ins.clone().into_iter().filter_map(|c| c.energy)),
    }
}

fn insights(t: &Tally) -> Vec<String> {
    let mut out = Vec::new();

    // 4-7 glasses gets neither message.
    if t.hydration >= HYDRATION_GOAL {
        out.push("Great hydration today! 💧");
    } else if t.hydration < 4 {
        out.push("Remember to drink more water 💧");
    }

    if t.meals >= MEALS_GOAL {
        out.push("You ate all your meals! 🍎");
    } else if t.meals < 2 {
        out.push("Don't forget to eat regularly 🍽️");
    }

    if t.breaks >= 4 {
        out.push("Good job taking breaks! ☕");
    }

    match t.average_mood {
        Some(m) if m >= 4.0 => out.push("Your mood has been great today! 😊"),
        Some(m) if m < 3.0 => out.push("Take care of yourself - maybe a break would help 💚"),
        _ => {}
    }

    if t.average_energy.is_some_and(|e| e < 3.0) {
        out.push("Low energy detected - consider rest or a healthy snack ⚡");
    }

    out.into_iter().map(str::to_string).collect()
}

/// Summarize one day's check-ins. The caller has already restricted
/// `check_ins` to that day's window.
pub fn daily_summary(check_ins: &[WellnessCheckIn], date: NaiveDate) -> DailyWellnessSummary {
    let t = tally(check_ins);
    let insights = insights(&t);

    DailyWellnessSummary {
        date,
        hydration_goal: HYDRATION_GOAL,
        hydration_completed: t.hydration,
        meals_goal: MEALS_GOAL,
        meals_completed: t.meals,
        breaks_goal: BREAKS_GOAL,
        breaks_completed: t.breaks,
        average_mood: t.average_mood,
        average_energy: t.average_energy,
        insights,
    }
}

/// Per-day aggregates for the seven days ending at `reference` (both ends
/// inclusive), keyed by each check-in's own calendar day in `tz`. Sparse and
/// sorted ascending.
pub fn weekly_trends(check_ins: &[WellnessCheckIn], reference: DateTime<Utc>, tz: Tz) -> Vec<DayTrend> {
    let start = reference - Duration::days(7);

    let mut by_day: BTreeMap<NaiveDate, Vec<&WellnessCheckIn>> = BTreeMap::new();
    for c in check_ins
        .iter()
        .filter(|c| c.timestamp >= start && c.timestamp <= reference)
    {
        let day = c.timestamp.with_timezone(&tz).date_naive();
        by_day.entry(day).or_default().push(c);
    }

    by_day
        .into_iter()
        .map(|(date, day)| {
            let t = tally(day.iter().copied());
            DayTrend {
                date,
                hydration: t.hydration,
                meals: t.meals,
                breaks: t.breaks,
                average_mood: t.average_mood,
                average_energy: t.average_energy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, d, h, 0, 0).unwrap()
    }

    fn check_in(t: CheckInType, ts: DateTime<Utc>) -> WellnessCheckIn {
        WellnessCheckIn {
            check_in_id: format!("{}-{}", t, ts.timestamp()),
            user_id: "u1".to_string(),
            check_in_type: t,
            timestamp: ts,
            mood: None,
            energy: None,
            notes: None,
            tags: vec![],
            created_at: ts,
        }
    }

    fn rated(t: CheckInType, ts: DateTime<Utc>, mood: Option<u8>, energy: Option<u8>) -> WellnessCheckIn {
        WellnessCheckIn {
            mood,
            energy,
            ..check_in(t, ts)
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    #[test]
    fn test_empty_day() {
        let s = daily_summary(&[], day());
        assert_eq!(s.hydration_completed, 0);
        assert_eq!(s.meals_completed, 0);
        assert_eq!(s.breaks_completed, 0);
        assert_eq!(s.average_mood, None);
        assert_eq!(s.average_energy, None);
        assert_eq!(
            s.insights,
            vec!["Remember to drink more water 💧", "Don't forget to eat regularly 🍽️"]
        );
        assert_eq!((s.hydration_goal, s.meals_goal, s.breaks_goal), (8, 3, 8));
    }

    #[test]
    fn test_great_hydration_one_meal_no_breaks() {
        let mut logs: Vec<_> = (0..8).map(|i| check_in(CheckInType::Hydration, at(10, 8 + i))).collect();
        logs.push(check_in(CheckInType::Meal, at(10, 12)));

        let s = daily_summary(&logs, day());
        assert_eq!(s.hydration_completed, 8);
        assert_eq!(s.meals_completed, 1);
        assert_eq!(
            s.insights,
            vec!["Great hydration today! 💧", "Don't forget to eat regularly 🍽️"]
        );
        assert!(!s.insights.iter().any(|i| i.contains("breaks")));
    }

    #[test]
    fn test_middle_hydration_gets_no_hydration_insight() {
        let logs: Vec<_> = (0..5).map(|i| check_in(CheckInType::Hydration, at(10, 8 + i))).collect();
        let s = daily_summary(&logs, day());
        assert!(!s.insights.iter().any(|i| i.contains("💧")));
    }

    #[test]
    fn test_averages_and_mood_insights() {
        let logs = vec![
            rated(CheckInType::Hydration, at(10, 8), Some(4), Some(3)),
            check_in(CheckInType::Hydration, at(10, 9)),
            rated(CheckInType::Meal, at(10, 12), Some(5), Some(4)),
        ];
        let s = daily_summary(&logs, day());
        assert_eq!(s.hydration_completed, 2);
        assert_eq!(s.meals_completed, 1);
        assert_eq!(s.average_mood, Some(4.5));
        assert_eq!(s.average_energy, Some(3.5));
        assert!(s.insights.contains(&"Your mood has been great today! 😊".to_string()));
    }

    #[test]
    fn test_low_mood_and_energy_with_breaks_and_meals() {
        let mut logs: Vec<_> = (0..4).map(|i| check_in(CheckInType::Break, at(10, 9 + i))).collect();
        logs.extend((0..3).map(|i| check_in(CheckInType::Meal, at(10, 8 + i * 5))));
        logs.push(rated(CheckInType::Mood, at(10, 20), Some(2), Some(2)));

        let s = daily_summary(&logs, day());
        assert_eq!(
            s.insights,
            vec![
                "Remember to drink more water 💧",
                "You ate all your meals! 🍎",
                "Good job taking breaks! ☕",
                "Take care of yourself - maybe a break would help 💚",
                "Low energy detected - consider rest or a healthy snack ⚡",
            ]
        );
    }

    #[test]
    fn test_neutral_mood_has_no_mood_insight() {
        let logs = vec![rated(CheckInType::Mood, at(10, 9), Some(3), None)];
        let s = daily_summary(&logs, day());
        assert_eq!(s.average_mood, Some(3.0));
        assert!(!s.insights.iter().any(|i| i.contains("mood") || i.contains("Take care")));
    }

    #[test]
    fn test_weekly_trends_sparse_and_sorted() {
        let reference = at(14, 18);
        let logs = vec![
            check_in(CheckInType::Meal, at(12, 13)),
            rated(CheckInType::Hydration, at(9, 10), Some(4), None),
            check_in(CheckInType::Hydration, at(12, 9)),
            check_in(CheckInType::Break, at(14, 11)),
            rated(CheckInType::Hydration, at(9, 15), Some(2), Some(5)),
            // outside the window
            check_in(CheckInType::Meal, at(1, 12)),
        ];

        let trends = weekly_trends(&logs, reference, Tz::UTC);
        let dates: Vec<_> = trends.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 6, 9).unwrap(),
                NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
                NaiveDate::from_ymd_opt(2026, 6, 14).unwrap(),
            ]
        );

        assert_eq!(trends[0].hydration, 2);
        assert_eq!(trends[0].average_mood, Some(3.0));
        assert_eq!(trends[0].average_energy, Some(5.0));
        assert_eq!((trends[1].hydration, trends[1].meals, trends[1].breaks), (1, 1, 0));
        assert_eq!(trends[1].average_mood, None);
        assert_eq!((trends[2].hydration, trends[2].meals, trends[2].breaks), (0, 0, 1));
    }

    #[test]
    fn test_weekly_window_is_inclusive() {
        let reference = at(14, 18);
        let logs = vec![
            check_in(CheckInType::Meal, reference - Duration::days(7)),
            check_in(CheckInType::Meal, reference),
            check_in(CheckInType::Meal, reference + Duration::seconds(1)),
        ];
        let trends = weekly_trends(&logs, reference, Tz::UTC);
        assert_eq!(trends.len(), 2);
    }

    #[test]
    fn test_weekly_groups_by_local_day() {
        // 03:00 UTC on the 12th is still the 11th in Chicago.
        let logs = vec![check_in(CheckInType::Hydration, at(12, 3))];
        let trends = weekly_trends(&logs, at(14, 18), chrono_tz::America::Chicago);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
    }

    #[test]
    fn test_ratings_clamp() {
        let c = NewCheckIn::default().with_mood(9).with_energy(0).with_notes("");
        assert_eq!(c.mood, Some(5));
        assert_eq!(c.energy, Some(1));
        assert_eq!(c.notes, None);
    }

    #[test]
    fn test_check_in_type_serializes_as_type() {
        let c = check_in(CheckInType::Break, at(10, 9));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "break");
    }
}
