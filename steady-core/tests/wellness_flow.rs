use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::America::Chicago;
use steady_core::checkins::{daily_summary_for, log_check_in, weekly_trends_for};
use steady_core::data::export_wellness_json;
use steady_core::{CheckInType, MemoryStore, NewCheckIn, WellnessCheckIn};

// 2026-10-16 10:00 CDT
fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
}

#[test]
fn test_full_day_reaches_goals() {
    let mut store = MemoryStore::new();
    for i in 0..8 {
        let at = morning() + Duration::minutes(30 * i);
        log_check_in(&mut store, "u1", CheckInType::Hydration, NewCheckIn::default(), at).unwrap();
        log_check_in(&mut store, "u1", CheckInType::Break, NewCheckIn::default(), at).unwrap();
    }
    for i in 0..3 {
        log_check_in(&mut store, "u1", CheckInType::Meal, NewCheckIn::default(), morning() + Duration::hours(i)).unwrap();
    }
    let feeling = NewCheckIn::default().with_mood(5).with_energy(4).with_notes("good day");
    log_check_in(&mut store, "u1", CheckInType::Mood, feeling, morning()).unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let s = daily_summary_for(&store, "u1", date, Chicago).unwrap();
    assert_eq!(s.hydration_completed, 8);
    assert_eq!(s.meals_completed, 3);
    assert_eq!(s.breaks_completed, 8);
    assert_eq!(
        s.insights,
        vec![
            "Great hydration today! 💧",
            "You ate all your meals! 🍎",
            "Good job taking breaks! ☕",
            "Your mood has been great today! 😊",
        ]
    );

    let trends = weekly_trends_for(&store, "u1", morning() + Duration::hours(12), Chicago).unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].hydration, 8);
    assert_eq!(trends[0].average_energy, Some(4.0));
}

#[test]
fn test_exported_check_ins_parse_back() {
    let mut store = MemoryStore::new();
    let logged = log_check_in(
        &mut store,
        "u1",
        CheckInType::Medication,
        NewCheckIn::default().with_tag("evening"),
        morning(),
    )
    .unwrap();

    let json = export_wellness_json(&store, "u1").unwrap();
    let back: Vec<WellnessCheckIn> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vec![logged]);
}
