//! Check-in logging and the wellness read paths over a [`CheckInStore`].

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::store::{CheckInStore, StoreResult};
use crate::time::{day_bounds, week_window};
use crate::wellness::{
    daily_summary, weekly_trends, CheckInType, DailyWellnessSummary, DayTrend, NewCheckIn,
    WellnessCheckIn,
};

pub fn log_check_in(
    store: &mut impl CheckInStore,
    user_id: &str,
    check_in_type: CheckInType,
    input: NewCheckIn,
    now: DateTime<Utc>,
) -> StoreResult<WellnessCheckIn> {
    let check_in = WellnessCheckIn {
        check_in_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        check_in_type,
        timestamp: now,
        mood: input.mood.map(|m| m.clamp(1, 5)),
        energy: input.energy.map(|e| e.clamp(1, 5)),
        notes: input.notes.filter(|n| !n.is_empty()),
        tags: input.tags,
        created_at: now,
    };

    if let Err(e) = store.insert_check_in(check_in.clone()) {
        tracing::error!(user_id, error = %e, "failed to log check-in");
        return Err(e);
    }
    tracing::debug!(check_in_id = %check_in.check_in_id, kind = %check_in_type, "logged check-in");
    Ok(check_in)
}

/// Inclusive range, newest first.
pub fn check_ins_between(
    store: &impl CheckInStore,
    user_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> StoreResult<Vec<WellnessCheckIn>> {
    store.check_ins_between(user_id, start, end)
}

/// Everything logged on `now`'s local calendar day.
pub fn today_check_ins(
    store: &impl CheckInStore,
    user_id: &str,
    tz: Tz,
    now: DateTime<Utc>,
) -> StoreResult<Vec<WellnessCheckIn>> {
    let today = now.with_timezone(&tz).date_naive();
    let (start, end) = day_bounds(today, tz);
    store.check_ins_between(user_id, start, end)
}

/// The latest `limit` check-ins of one type, newest first.
pub fn recent_check_ins_by_type(
    store: &impl CheckInStore,
    user_id: &str,
    check_in_type: CheckInType,
    limit: usize,
) -> StoreResult<Vec<WellnessCheckIn>> {
    let mut out: Vec<_> = store
        .check_ins_for_user(user_id)?
        .into_iter()
        .filter(|c| c.check_in_type == check_in_type)
        .collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out.truncate(limit);
    Ok(out)
}

/// Summary for one local calendar day.
pub fn daily_summary_for(
    store: &impl CheckInStore,
    user_id: &str,
    date: NaiveDate,
    tz: Tz,
) -> StoreResult<DailyWellnessSummary> {
    let (start, end) = day_bounds(date, tz);
    let day = store.check_ins_between(user_id, start, end)?;
    Ok(daily_summary(&day, date))
}

pub fn weekly_trends_for(
    store: &impl CheckInStore,
    user_id: &str,
    reference: DateTime<Utc>,
    tz: Tz,
) -> StoreResult<Vec<DayTrend>> {
    let (start, end) = week_window(reference);
    let window = store.check_ins_between(user_id, start, end)?;
    Ok(weekly_trends(&window, reference, tz))
}
