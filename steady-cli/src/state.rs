use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// `$STEADY_HOME`, else `~/.steady`.
pub fn steady_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STEADY_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".steady"))
}

pub fn ensure_steady_home() -> Result<PathBuf> {
    let dir = steady_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Local identity. Supplies the user id every store call is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub created_at_utc: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Profile {
    pub fn new(timezone: Option<String>) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            created_at_utc: Some(steady_core::time::to_rfc3339_utc(Utc::now())),
            timezone: timezone.unwrap_or_else(default_timezone),
        }
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid timezone {:?}: {}", self.timezone, e))
    }
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_steady_home()?.join("profile.json"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// The stored profile, or `None` before `steady init`.
pub fn read_profile() -> Result<Option<Profile>> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let profile = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(profile))
}

pub fn require_profile() -> Result<Profile> {
    read_profile()?.context("no profile yet. Run: steady init")
}
