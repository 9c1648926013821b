use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use steady_core::AutoFill;

use crate::state::ensure_steady_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tasks: TasksSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksSection {
    pub auto_categorize: bool,
    pub auto_urgency: bool,
    /// Suggestions under this confidence are shown but not applied.
    pub auto_apply_confidence: f64,
}

impl Default for TasksSection {
    fn default() -> Self {
        let auto = AutoFill::default();
        Self {
            auto_categorize: auto.categorize,
            auto_urgency: auto.urgency,
            auto_apply_confidence: auto.min_confidence,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySection {
    /// IANA zone used instead of the profile's.
    pub timezone_override: Option<String>,
}

impl Config {
    pub fn auto_fill(&self) -> AutoFill {
        AutoFill {
            categorize: self.tasks.auto_categorize,
            urgency: self.tasks.auto_urgency,
            min_confidence: self.tasks.auto_apply_confidence.clamp(0.0, 1.0),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_steady_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    println!("# {}", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str("[tasks]\nauto_urgency = false\n").unwrap();
        assert!(cfg.tasks.auto_categorize);
        assert!(!cfg.tasks.auto_urgency);
        assert_eq!(cfg.tasks.auto_apply_confidence, 0.5);
        assert_eq!(cfg.display.timezone_override, None);
    }

    #[test]
    fn test_empty_config_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.auto_fill(), AutoFill::default());
    }

    #[test]
    fn test_threshold_clamped() {
        let cfg: Config = toml::from_str("[tasks]\nauto_apply_confidence = 3.0\n").unwrap();
        assert_eq!(cfg.auto_fill().min_confidence, 1.0);
    }
}
