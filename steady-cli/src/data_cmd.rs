use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

use steady_core::data::{
    clear_archived_tasks, clear_completed_tasks, clear_wellness_history, export_tasks_json,
    export_wellness_json, user_data_stats,
};

use crate::Session;

#[derive(Subcommand, Debug)]
pub enum DataCommand {
    /// Counts by status, check-ins, saved templates
    Stats,

    /// Tasks as JSON (stdout unless --out)
    ExportTasks {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check-ins as JSON (stdout unless --out)
    ExportWellness {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    ClearCompleted {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    ClearArchived {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Delete every wellness check-in
    ClearWellness {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

pub fn run(session: &mut Session, cmd: DataCommand) -> Result<()> {
    let user_id = session.profile.user_id.clone();

    match cmd {
        DataCommand::Stats => {
            let stats = user_data_stats(&session.store, &user_id)?;
            println!("Tasks:       {}", stats.total_tasks);
            println!("  pending:     {}", stats.pending_tasks);
            println!("  in progress: {}", stats.in_progress_tasks);
            println!("  completed:   {}", stats.completed_tasks);
            println!("  archived:    {}", stats.archived_tasks);
            println!("Check-ins:   {}", stats.check_ins);
            println!("Templates:   {} saved", stats.custom_templates);
        }

        DataCommand::ExportTasks { out } => {
            let json = export_tasks_json(&session.store, &user_id)?;
            emit(json, out)?;
        }

        DataCommand::ExportWellness { out } => {
            let json = export_wellness_json(&session.store, &user_id)?;
            emit(json, out)?;
        }

        DataCommand::ClearCompleted { yes } => {
            confirm(yes, "clear-completed")?;
            let n = clear_completed_tasks(&mut session.store, &user_id)?;
            println!("Removed {} completed task(s)", n);
        }

        DataCommand::ClearArchived { yes } => {
            confirm(yes, "clear-archived")?;
            let n = clear_archived_tasks(&mut session.store, &user_id)?;
            println!("Removed {} archived task(s)", n);
        }

        DataCommand::ClearWellness { yes } => {
            confirm(yes, "clear-wellness")?;
            let n = clear_wellness_history(&mut session.store, &user_id)?;
            println!("Removed {} check-in(s)", n);
        }
    }
    Ok(())
}

fn confirm(yes: bool, cmd: &str) -> Result<()> {
    if !yes {
        bail!("this cannot be undone. Re-run with: steady data {} --yes", cmd);
    }
    Ok(())
}

fn emit(json: String, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(p) => {
            fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
            println!("Wrote {}", p.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
