use anyhow::{Context, Result};
use chrono::{NaiveDate, Timelike, Utc};
use clap::{Args, Subcommand};

use steady_core::celebration::time_based_message;
use steady_core::checkins::{daily_summary_for, log_check_in, recent_check_ins_by_type, weekly_trends_for};
use steady_core::time::{format_time, relative_time};
use steady_core::{CheckInType, DailyWellnessSummary, NewCheckIn};

use crate::Session;

#[derive(Args, Debug)]
pub struct CheckinArgs {
    /// hydration, meal, break, medication, mood, energy, custom
    #[arg(value_name = "TYPE")]
    kind: CheckInType,

    /// 1-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    mood: Option<u8>,

    /// 1-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    energy: Option<u8>,

    #[arg(long)]
    notes: Option<String>,

    /// Repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum WellnessCommand {
    /// Today's counts against goals, plus insights
    Today {
        /// Another local day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Per-day totals for the last seven days
    Week,

    /// Latest check-ins of one type
    Recent {
        kind: CheckInType,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

pub fn checkin(session: &mut Session, args: CheckinArgs) -> Result<()> {
    let now = Utc::now();
    let user_id = session.profile.user_id.clone();

    let mut input = NewCheckIn {
        tags: args.tags,
        ..NewCheckIn::default()
    };
    if let Some(m) = args.mood {
        input = input.with_mood(m);
    }
    if let Some(e) = args.energy {
        input = input.with_energy(e);
    }
    if let Some(n) = args.notes {
        input = input.with_notes(n);
    }

    let logged = log_check_in(&mut session.store, &user_id, args.kind, input, now)?;
    println!("Logged {} at {}", logged.check_in_type, format_time(logged.timestamp, session.tz));

    let today = now.with_timezone(&session.tz).date_naive();
    let summary = daily_summary_for(&session.store, &user_id, today, session.tz)?;
    match logged.check_in_type {
        CheckInType::Hydration => println!("Water today: {}/{}", summary.hydration_completed, summary.hydration_goal),
        CheckInType::Meal => println!("Meals today: {}/{}", summary.meals_completed, summary.meals_goal),
        CheckInType::Break => println!("Breaks today: {}/{}", summary.breaks_completed, summary.breaks_goal),
        _ => {}
    }
    Ok(())
}

pub fn run(session: &Session, cmd: WellnessCommand) -> Result<()> {
    let now = Utc::now();
    let tz = session.tz;
    let user_id = session.user_id();

    match cmd {
        WellnessCommand::Today { date } => {
            let local_now = now.with_timezone(&tz);
            let day = match date {
                Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .with_context(|| format!("invalid date {:?} (expected YYYY-MM-DD)", s))?,
                None => {
                    if let Some(greeting) = time_based_message(local_now.hour()) {
                        println!("{}\n", greeting);
                    }
                    local_now.date_naive()
                }
            };
            let summary = daily_summary_for(&session.store, user_id, day, tz)?;
            print_summary(&summary);
        }

        WellnessCommand::Week => {
            let trends = weekly_trends_for(&session.store, user_id, now, tz)?;
            if trends.is_empty() {
                println!("No check-ins in the last seven days.");
                return Ok(());
            }
            println!("{:<12} {:>5} {:>5} {:>6} {:>5} {:>6}", "day", "water", "meals", "breaks", "mood", "energy");
            for d in &trends {
                println!(
                    "{:<12} {:>5} {:>5} {:>6} {:>5} {:>6}",
                    d.date.format("%a %b %-d").to_string(),
                    d.hydration,
                    d.meals,
                    d.breaks,
                    rating(d.average_mood),
                    rating(d.average_energy)
                );
            }
        }

        WellnessCommand::Recent { kind, limit } => {
            let recent = recent_check_ins_by_type(&session.store, user_id, kind, limit)?;
            if recent.is_empty() {
                println!("No {} check-ins yet.", kind);
            }
            for c in &recent {
                let mut line = format!("{}  {}", relative_time(c.timestamp, now), kind);
                if let Some(m) = c.mood {
                    line.push_str(&format!("  mood {}", m));
                }
                if let Some(e) = c.energy {
                    line.push_str(&format!("  energy {}", e));
                }
                if let Some(n) = &c.notes {
                    line.push_str(&format!("  \"{}\"", n));
                }
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn rating(avg: Option<f64>) -> String {
    avg.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

fn print_summary(s: &DailyWellnessSummary) {
    println!("{}", s.date.format("%A, %B %-d"));
    println!("  water:  {}/{}", s.hydration_completed, s.hydration_goal);
    println!("  meals:  {}/{}", s.meals_completed, s.meals_goal);
    println!("  breaks: {}/{}", s.breaks_completed, s.breaks_goal);
    if s.average_mood.is_some() || s.average_energy.is_some() {
        println!("  mood {} / energy {}", rating(s.average_mood), rating(s.average_energy));
    }
    if !s.insights.is_empty() {
        println!();
        for line in &s.insights {
            println!("  {}", line);
        }
    }
}
