//! Time utilities: timezone-aware day windows, due-date input, display strings.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

static RELATIVE_DUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d+)\s*([mhdw])$").expect("relative due pattern"));

/// Parse a deadline like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_deadline_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Parse due-date input:
/// - `+30m`, `+3h`, `+2d`, `+1w` relative to `now`
/// - `today` / `tomorrow` (23:59 local)
/// - `YYYY-MM-DD` (23:59 local)
/// - `YYYY-MM-DD HH:MM` (local)
pub fn parse_due(input: &str, tz: Tz, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Some(caps) = RELATIVE_DUE.captures(input) {
        let n: i64 = caps[1].parse()?;
        let offset = match &caps[2] {
            "m" => Duration::try_minutes(n),
            "h" => Duration::try_hours(n),
            "d" => Duration::try_days(n),
            _ => Duration::try_weeks(n),
        };
        return offset
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| anyhow::anyhow!("due offset out of range: {input}"));
    }

    let today = now.with_timezone(&tz).date_naive();
    let day = match input.to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d").ok(),
    };
    if let Some(day) = day {
        let end_of_day = format!("{} 23:59", day.format("%Y-%m-%d"));
        return parse_local_deadline_to_utc(&end_of_day, tz.name());
    }

    parse_local_deadline_to_utc(input, tz.name())
}

fn local_start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump: the day starts at the first valid hour.
        None => tz.from_utc_datetime(&midnight).with_timezone(&Utc),
    }
}

/// `[start of day, end of day]` for a local calendar date, in UTC. The end
/// is the day's last millisecond.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_start_of_day(date, tz);
    let end = match date.succ_opt() {
        Some(next) => local_start_of_day(next, tz) - Duration::milliseconds(1),
        None => start + Duration::days(1) - Duration::milliseconds(1),
    };
    (start, end)
}

/// The seven days ending at `reference`, both ends inclusive.
pub fn week_window(reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (reference - Duration::days(7), reference)
}

/// "Oct 16, 2026"
pub fn format_date(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%b %-d, %Y").to_string()
}

/// "Oct 16, 2026 3:05 PM"
pub fn format_date_time(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%b %-d, %Y %-I:%M %p").to_string()
}

/// "3:05 PM"
pub fn format_time(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%-I:%M %p").to_string()
}

fn rounded_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

fn distance_words(minutes: i64) -> String {
    const DAY: i64 = 1440;
    const MONTH: i64 = 43200;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < DAY {
        return format!("about {} hours", rounded_div(minutes, 60));
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MONTH {
        return format!("{} days", rounded_div(minutes, DAY));
    }
    if minutes < 2 * MONTH {
        let months = rounded_div(minutes, MONTH);
        return if months <= 1 {
            "about 1 month".to_string()
        } else {
            format!("about {months} months")
        };
    }

    let months = rounded_div(minutes, MONTH);
    if months < 12 {
        return format!("{months} months");
    }
    let (years, rem) = (months / 12, months % 12);
    let unit = |n: i64| if n == 1 { "year" } else { "years" };
    if rem < 3 {
        format!("about {years} {}", unit(years))
    } else if rem < 9 {
        format!("over {years} {}", unit(years))
    } else {
        format!("almost {} {}", years + 1, unit(years + 1))
    }
}

/// "in about 3 hours", "2 days ago".
pub fn relative_time(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (dt - now).num_seconds();
    let minutes = rounded_div(seconds.abs(), 60);
    let words = distance_words(minutes);
    if seconds >= 0 {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Past due and not on today's local date.
pub fn is_overdue(due: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> bool {
    due < now && due.with_timezone(&tz).date_naive() != now.with_timezone(&tz).date_naive()
}

/// Short human description of a due date relative to `now`.
pub fn due_date_description(due: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> String {
    let diff_minutes = (due - now).num_minutes();
    let diff_hours = diff_minutes as f64 / 60.0;
    let diff_days = (diff_hours / 24.0).floor() as i64;

    let due_day = due.with_timezone(&tz).date_naive();
    let today = now.with_timezone(&tz).date_naive();

    if is_overdue(due, now, tz) {
        let overdue_days = diff_days.abs();
        return match overdue_days {
            1 => "⚠️ 1 day overdue".to_string(),
            d if d < 7 => format!("⚠️ {d} days overdue"),
            _ => "⚠️ Overdue".to_string(),
        };
    }

    if due_day == today {
        if diff_hours < 0.0 {
            return "⚠️ Overdue today".to_string();
        }
        if diff_hours < 1.0 {
            return format!("🔥 Due in {diff_minutes} min");
        }
        if diff_hours < 3.0 {
            return format!("🔥 Due in {} hours", diff_hours.floor() as i64);
        }
        return "📅 Due today".to_string();
    }

    if today.succ_opt() == Some(due_day) {
        return "📅 Due tomorrow".to_string();
    }

    if week_start(due_day) == week_start(today) {
        return format!("📅 Due {}", due.with_timezone(&tz).format("%A"));
    }

    if diff_days <= 7 {
        return format!("📅 Due in {diff_days} days");
    }

    format!("📅 Due {}", due.with_timezone(&tz).format("%b %-d"))
}

/// Helper: format a UTC time into RFC3339.
pub fn to_rfc3339_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
