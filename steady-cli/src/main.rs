use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod data_cmd;
mod state;
mod store;
mod task_cmd;
mod wellness_cmd;

use config::Config;
use state::Profile;
use store::FileStore;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STEADY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "steady", version = VERSION, about = "Tasks and wellness check-ins with gentle suggestions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create ~/.steady with a profile and default config
    Init {
        /// IANA timezone (default: America/Chicago)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Show category and urgency suggestions for a title without saving
    Suggest {
        title: String,

        #[arg(long, short)]
        description: Option<String>,

        /// Due date: +3h, +2d, today, tomorrow, YYYY-MM-DD, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        due: Option<String>,
    },

    /// Task commands
    Task {
        #[command(subcommand)]
        command: task_cmd::TaskCommand,
    },

    /// Log a wellness check-in (hydration, meal, break, medication, mood, energy, custom)
    Checkin(wellness_cmd::CheckinArgs),

    /// Wellness summaries
    Wellness {
        #[command(subcommand)]
        command: wellness_cmd::WellnessCommand,
    },

    /// List built-in and saved task templates (default), or save one
    Templates {
        #[command(subcommand)]
        command: Option<task_cmd::TemplateCommand>,
    },

    /// Stats, exports, and clearing history
    Data {
        #[command(subcommand)]
        command: data_cmd::DataCommand,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

/// Everything a command needs: who, where, and the store.
pub struct Session {
    pub profile: Profile,
    pub config: Config,
    pub tz: Tz,
    pub store: FileStore,
}

impl Session {
    pub fn open() -> Result<Self> {
        let profile = state::require_profile()?;
        let config = config::load_config()?;
        let tz = match &config.display.timezone_override {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("invalid display.timezone_override {:?}: {}", name, e))?,
            None => profile.tz()?,
        };
        let store = FileStore::open_default()?;
        Ok(Self {
            profile,
            config,
            tz,
            store,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.profile.user_id
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STEADY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Init { timezone } => init(timezone)?,

        Command::Suggest {
            title,
            description,
            due,
        } => {
            let session = Session::open()?;
            task_cmd::suggest(&session, &title, description.as_deref(), due.as_deref())?;
        }

        Command::Task { command } => task_cmd::run(&mut Session::open()?, command)?,

        Command::Checkin(args) => wellness_cmd::checkin(&mut Session::open()?, args)?,

        Command::Wellness { command } => wellness_cmd::run(&Session::open()?, command)?,

        Command::Templates { command } => task_cmd::templates(&mut Session::open()?, command)?,

        Command::Data { command } => data_cmd::run(&mut Session::open()?, command)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn init(timezone: Option<String>) -> Result<()> {
    let home = state::ensure_steady_home()?;

    match state::read_profile()? {
        Some(existing) => {
            println!("Profile already exists for user {}", existing.user_id);
        }
        None => {
            let profile = Profile::new(timezone);
            profile.tz().context("check --timezone")?;
            state::write_profile(&profile)?;
            println!("Wrote {}", state::profile_path()?.display());
        }
    }

    config::init_config()?;
    FileStore::open_default()?;
    println!("Ready. Data lives in {}", home.display());
    Ok(())
}
