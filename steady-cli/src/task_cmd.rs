use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Subcommand;

use steady_core::celebration::{
    focus_mode_celebration, progress_celebration, random_celebration, streak_celebration,
};
use steady_core::tasks::{self, apply_suggestions, completion_streak, focus_tasks};
use steady_core::templates::{all_templates, create_template, find_template, NewTemplate};
use steady_core::time::{due_date_description, format_date_time, parse_due, relative_time};
use steady_core::{
    categorize, suggest_categories, suggest_urgency_at, ConfidenceBand, Frequency, NewTask,
    Recurrence, Task, TaskCategory, TaskFilter, TaskStatus, TaskStore, UrgencyLevel,
    UrgencySource,
};

use crate::Session;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task. Category and urgency are suggested when not given.
    Add {
        /// Title (optional with --template)
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long)]
        category: Option<TaskCategory>,

        #[arg(long)]
        urgency: Option<UrgencyLevel>,

        /// +30m, +3h, +2d, +1w, today, tomorrow, YYYY-MM-DD, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        due: Option<String>,

        /// Repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Estimated minutes
        #[arg(long)]
        estimate: Option<u32>,

        /// Repeatable
        #[arg(long = "subtask")]
        subtasks: Vec<String>,

        /// daily, weekly, monthly, yearly
        #[arg(long)]
        repeat: Option<Frequency>,

        /// Repeat every N periods
        #[arg(long, default_value_t = 1)]
        every: u32,

        /// Stop after this many occurrences
        #[arg(long)]
        times: Option<u32>,

        /// Last date a repeat may fall on
        #[arg(long)]
        until: Option<String>,

        #[arg(long, default_value_t = false)]
        long_term: bool,

        /// Start from a template (name or id)
        #[arg(long)]
        template: Option<String>,
    },

    /// List tasks (open ones unless --status or --all)
    List {
        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long)]
        category: Option<TaskCategory>,

        #[arg(long)]
        urgency: Option<UrgencyLevel>,

        #[arg(long)]
        tag: Option<String>,

        /// Match title or description
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = false)]
        all: bool,

        /// Only the top 3 open tasks
        #[arg(long, default_value_t = false)]
        focus: bool,
    },

    /// Show one task in full
    Show { id: String },

    /// Mark a task completed
    Done { id: String },

    Archive { id: String },

    /// Set any status: pending, in-progress, completed, archived
    Status { id: String, status: TaskStatus },

    Delete { id: String },

    Subtask {
        #[command(subcommand)]
        command: SubtaskCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubtaskCommand {
    Add { id: String, title: String },

    /// Flip a subtask by 1-based position or id prefix
    Toggle { id: String, subtask: String },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    List,

    /// Save an existing task's shape as a reusable template
    Save {
        id: String,

        #[arg(long)]
        name: Option<String>,
    },
}

pub fn run(session: &mut Session, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            title,
            description,
            category,
            urgency,
            due,
            tags,
            estimate,
            subtasks,
            repeat,
            every,
            times,
            until,
            long_term,
            template,
        } => {
            let now = Utc::now();
            let mut input = match template {
                Some(name) => {
                    let templates = all_templates(&session.store, session.user_id())?;
                    let t = find_template(&templates, &name)
                        .with_context(|| format!("no template named {:?} (see: steady templates)", name))?;
                    t.to_new_task(title.as_deref())
                }
                None => NewTask::titled(title.context("a title is required unless --template is given")?),
            };

            if description.is_some() {
                input.description = description;
            }
            if category.is_some() {
                input.category = category;
            }
            if urgency.is_some() {
                input.urgency = urgency;
            }
            if let Some(due) = due {
                input.due_date = Some(parse_due(&due, session.tz, now)?);
            }
            if estimate.is_some() {
                input.estimated_duration = estimate;
            }
            input.tags.extend(tags);
            input.subtasks.extend(subtasks);
            input.is_long_term |= long_term;

            match repeat {
                Some(frequency) => {
                    let mut rule = Recurrence::new(frequency, every);
                    if let Some(n) = times {
                        rule = rule.count(n);
                    }
                    if let Some(u) = until {
                        rule = rule.until(parse_due(&u, session.tz, now)?);
                    }
                    input.recurrence = Some(rule);
                }
                None if times.is_some() || until.is_some() => {
                    tracing::warn!("--times/--until ignored without --repeat");
                }
                None => {}
            }

            add(session, input, now)
        }

        TaskCommand::List {
            status,
            category,
            urgency,
            tag,
            search,
            all,
            focus,
        } => {
            let filter = TaskFilter {
                status,
                category,
                urgency,
                tag,
                search,
            };
            list(session, &filter, all, focus)
        }

        TaskCommand::Show { id } => show(session, &id),

        TaskCommand::Done { id } => done(session, &id),

        TaskCommand::Archive { id } => {
            let task = resolve_task(session, &id)?;
            let task = tasks::archive_task(&mut session.store, &task.task_id, Utc::now())?;
            println!("Archived {}", task.title);
            Ok(())
        }

        TaskCommand::Status { id, status } => {
            if status == TaskStatus::Completed {
                return done(session, &id);
            }
            let task = resolve_task(session, &id)?;
            let task = tasks::set_status(&mut session.store, &task.task_id, status, Utc::now())?;
            println!("{} is now {}", task.title, task.status);
            Ok(())
        }

        TaskCommand::Delete { id } => {
            let task = resolve_task(session, &id)?;
            tasks::delete_task(&mut session.store, &task.task_id)?;
            println!("Deleted {}", task.title);
            Ok(())
        }

        TaskCommand::Subtask { command } => match command {
            SubtaskCommand::Add { id, title } => {
                let task = resolve_task(session, &id)?;
                let sub = tasks::add_subtask(&mut session.store, &task.task_id, &title, Utc::now())?;
                println!("Added subtask {} to {}", short_id(&sub.subtask_id), task.title);
                Ok(())
            }
            SubtaskCommand::Toggle { id, subtask } => {
                let task = resolve_task(session, &id)?;
                let subtask_id = resolve_subtask(&task, &subtask)?;
                let task = tasks::toggle_subtask(&mut session.store, &task.task_id, &subtask_id, Utc::now())?;
                print_subtasks(&task);
                if task.subtask_progress() == Some(100.0) {
                    println!("All steps done. Finish it with: steady task done {}", short_id(&task.task_id));
                }
                Ok(())
            }
        },
    }
}

fn add(session: &mut Session, input: NewTask, now: DateTime<Utc>) -> Result<()> {
    let user_id = session.profile.user_id.clone();
    let input = apply_suggestions(input, &session.config.auto_fill(), now);
    let task = tasks::create_task(&mut session.store, &user_id, input, now)?;

    println!("Added {}  {}", short_id(&task.task_id), task.title);
    match task.category_confidence {
        Some(c) => println!("  category: {} (suggested, {:.0}% confidence)", task.category, c * 100.0),
        None => println!("  category: {}", task.category),
    }
    match task.urgency_source {
        UrgencySource::Suggested => println!("  urgency:  {} (suggested)", task.urgency),
        _ => {
            print!("  urgency:  {}", task.urgency);
            match task.suggested_urgency {
                Some(s) if s != task.urgency => println!(" (suggestion was {})", s),
                _ => println!(),
            }
        }
    }
    if let Some(due) = task.due_date {
        println!("  due:      {}", due_date_description(due, now, session.tz));
    }
    if let Some(rule) = &task.recurrence {
        println!("  repeats:  every {} {:?}", rule.interval, rule.frequency);
    }
    Ok(())
}

fn list(session: &Session, filter: &TaskFilter, all: bool, focus: bool) -> Result<()> {
    let now = Utc::now();
    let user_id = session.user_id();

    if focus {
        let everything = session.store.tasks_for_user(user_id)?;
        let top = focus_tasks(&everything, 3);
        if top.is_empty() {
            if completed_today(&everything, now, session.tz) > 0 {
                println!("{}", focus_mode_celebration());
            } else {
                println!("Nothing open. Add one with: steady task add \"...\"");
            }
            return Ok(());
        }
        for t in top {
            println!("{}", task_line(t, now, session.tz));
        }
        return Ok(());
    }

    let found = tasks::list_tasks(&session.store, user_id, filter)?;
    let shown: Vec<&Task> = found
        .iter()
        .filter(|t| {
            all || filter.status.is_some()
                || matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress)
        })
        .collect();

    if shown.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for t in &shown {
        println!("{}", task_line(t, now, session.tz));
    }
    println!("\n{} task(s)", shown.len());
    Ok(())
}

fn show(session: &Session, id: &str) -> Result<()> {
    let now = Utc::now();
    let tz = session.tz;
    let t = resolve_task(session, id)?;

    println!("{}", t.title);
    println!("  id:        {}", t.task_id);
    if let Some(d) = &t.description {
        println!("  notes:     {}", d);
    }
    println!("  status:    {}", t.status);
    println!("  category:  {} ({})", t.category.label(), t.category);
    println!("  urgency:   {} - {}", t.urgency, t.urgency.description());
    if let Some(due) = t.due_date {
        let open = matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress);
        if open {
            println!("  due:       {} ({})", format_date_time(due, tz), due_date_description(due, now, tz));
        } else {
            println!("  due:       {}", format_date_time(due, tz));
        }
    }
    for at in &t.reminder_times {
        println!("  reminder:  {}", format_date_time(*at, tz));
    }
    if let Some(rule) = &t.recurrence {
        println!("  repeats:   every {} {:?} (occurrence {})", rule.interval, rule.frequency, t.occurrence);
    }
    if !t.tags.is_empty() {
        println!("  tags:      {}", t.tags.join(", "));
    }
    if let Some(m) = t.estimated_duration {
        println!("  estimate:  {} min", m);
    }
    println!("  created:   {}", relative_time(t.created_at, now));
    if let Some(c) = t.completed_at {
        println!("  completed: {}", relative_time(c, now));
    }
    print_subtasks(&t);
    Ok(())
}

fn done(session: &mut Session, id: &str) -> Result<()> {
    let now = Utc::now();
    let tz = session.tz;
    let user_id = session.profile.user_id.clone();
    let task = resolve_task(session, id)?;
    if task.status == TaskStatus::Completed {
        println!("Already done: {}", task.title);
        return Ok(());
    }

    let completion = tasks::complete_task(&mut session.store, &task.task_id, now)?;
    println!("{}  {}", random_celebration(), completion.task.title);

    if let Some(next) = &completion.next {
        let when = next
            .due_date
            .map(|d| due_date_description(d, now, tz))
            .unwrap_or_else(|| "no due date".to_string());
        println!("Next one is queued: {} ({})", short_id(&next.task_id), when);
    }

    let everything = session.store.tasks_for_user(&user_id)?;
    if let Some(msg) = streak_celebration(completion_streak(&everything, now, tz)) {
        println!("{}", msg);
    }

    // Report a progress milestone only when this completion crossed one.
    let done_today = completed_today(&everything, now, tz);
    let open = everything
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
        .count();
    let total = (done_today + open) as f64;
    if total > 0.0 {
        let before = progress_celebration(done_today.saturating_sub(1) as f64 * 100.0 / total);
        let after = progress_celebration(done_today as f64 * 100.0 / total);
        if let Some(msg) = after.filter(|m| Some(*m) != before) {
            println!("{}", msg);
        }
    }
    Ok(())
}

pub fn suggest(session: &Session, title: &str, description: Option<&str>, due: Option<&str>) -> Result<()> {
    let now = Utc::now();
    let due_date = due.map(|d| parse_due(d, session.tz, now)).transpose()?;

    let best = categorize(title, description);
    println!(
        "Category: {} ({:.0}%, {} confidence)",
        best.category,
        best.confidence * 100.0,
        ConfidenceBand::of(best.confidence).as_str()
    );
    let others = suggest_categories(title, description);
    if others.len() > 1 {
        let rest: Vec<String> = others
            .iter()
            .skip(1)
            .map(|c| format!("{} {:.0}%", c.category, c.confidence * 100.0))
            .collect();
        println!("  also: {}", rest.join(", "));
    }

    let s = suggest_urgency_at(title, description, due_date, now);
    println!(
        "Urgency:  {} ({:.0}%, {} confidence)",
        s.urgency,
        s.confidence * 100.0,
        ConfidenceBand::of(s.confidence).as_str()
    );
    println!("  {}", s.reasoning);
    if let Some(words) = &s.detected_keywords {
        println!("  keywords: {}", words.join(", "));
    }
    Ok(())
}

pub fn templates(session: &mut Session, cmd: Option<TemplateCommand>) -> Result<()> {
    match cmd.unwrap_or(TemplateCommand::List) {
        TemplateCommand::List => {
            let templates = all_templates(&session.store, session.user_id())?;
            for t in &templates {
                println!(
                    "{} {} [{} / {}] ~{} min, {} steps{}",
                    t.icon.as_deref().unwrap_or("•"),
                    t.name,
                    t.category,
                    t.urgency,
                    t.estimated_duration.unwrap_or(0),
                    t.subtasks.len(),
                    if t.is_default { "" } else { " (saved)" }
                );
            }
            println!("\nUse one with: steady task add --template \"<name>\"");
        }
        TemplateCommand::Save { id, name } => {
            let user_id = session.profile.user_id.clone();
            let task = resolve_task(session, &id)?;
            let input = NewTemplate {
                name: name.unwrap_or_else(|| task.title.clone()),
                description: task.description.clone(),
                icon: None,
                category: task.category,
                urgency: task.urgency,
                estimated_duration: task.estimated_duration,
                subtasks: task.subtasks.iter().map(|s| s.title.clone()).collect(),
                tags: task.tags.clone(),
            };
            let template = create_template(&mut session.store, &user_id, input, Utc::now())?;
            println!("Saved template {}", template.name);
        }
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Full id or any unique prefix of one of the user's tasks.
fn resolve_task(session: &Session, key: &str) -> Result<Task> {
    let key = key.trim();
    if key.is_empty() {
        bail!("empty task id");
    }
    let candidates: Vec<Task> = session
        .store
        .tasks_for_user(session.user_id())?
        .into_iter()
        .filter(|t| t.task_id.starts_with(key))
        .collect();

    if let Some(exact) = candidates.iter().find(|t| t.task_id == key) {
        return Ok(exact.clone());
    }
    match candidates.len() {
        0 => bail!("no task matches {:?}", key),
        1 => Ok(candidates.into_iter().next().context("no task")?),
        n => bail!("{:?} matches {} tasks; use more of the id", key, n),
    }
}

fn resolve_subtask(task: &Task, key: &str) -> Result<String> {
    if let Ok(position) = key.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| task.subtasks.get(i))
            .map(|s| s.subtask_id.clone())
            .with_context(|| format!("{} has no subtask #{}", task.title, position));
    }
    let hits: Vec<&str> = task
        .subtasks
        .iter()
        .map(|s| s.subtask_id.as_str())
        .filter(|id| id.starts_with(key))
        .collect();
    match hits.as_slice() {
        [one] => Ok(one.to_string()),
        [] => bail!("no subtask matches {:?}", key),
        _ => bail!("{:?} matches several subtasks", key),
    }
}

fn completed_today(tasks: &[Task], now: DateTime<Utc>, tz: Tz) -> usize {
    let today = now.with_timezone(&tz).date_naive();
    tasks
        .iter()
        .filter(|t| {
            t.completed_at
                .is_some_and(|c| c.with_timezone(&tz).date_naive() == today)
        })
        .count()
}

fn task_line(t: &Task, now: DateTime<Utc>, tz: Tz) -> String {
    let mark = match t.status {
        TaskStatus::Pending => " ",
        TaskStatus::InProgress => "~",
        TaskStatus::Completed => "x",
        TaskStatus::Archived => "-",
    };
    let mut line = format!(
        "[{}] {}  {:<8} {}  ({})",
        mark,
        short_id(&t.task_id),
        t.urgency.as_str(),
        t.title,
        t.category
    );
    if let Some(due) = t.due_date {
        if matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress) {
            line.push_str(&format!("  {}", due_date_description(due, now, tz)));
        }
    }
    if let Some(p) = t.subtask_progress() {
        line.push_str(&format!("  {:.0}% of steps", p));
    }
    line
}

fn print_subtasks(task: &Task) {
    if task.subtasks.is_empty() {
        return;
    }
    println!("  steps:");
    for (i, s) in task.subtasks.iter().enumerate() {
        println!(
            "    {}. [{}] {}  {}",
            i + 1,
            if s.completed { "x" } else { " " },
            s.title,
            short_id(&s.subtask_id)
        );
    }
    if let Some(p) = task.subtask_progress() {
        println!("    {:.0}% done", p);
    }
}
