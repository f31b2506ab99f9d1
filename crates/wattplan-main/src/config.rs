// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of WattPlan.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use wattplan_core::{DEFAULT_SCHEDULE_PATH, LimitState, SchedulePersistence};

/// Development config file looked up when no path is given
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schedule storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// System configuration
    #[serde(default)]
    pub system: SystemConfig,

    /// Battery charge window used by the limit guard
    #[serde(default)]
    pub battery: BatteryConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Schedule JSON file
    #[serde(default = "default_schedule_path")]
    pub schedule_path: String,

    /// Where pruned entries are archived
    /// Defaults to `<schedule>.archive.json` next to the schedule file
    #[serde(default)]
    pub archive_path: Option<String>,
}

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// IANA timezone used to default the query date and time
    /// (e.g. "Europe/Amsterdam"). Host local time when unset.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Battery charge window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Stop discharging at or below this level (percent)
    #[serde(default = "default_min_charge_level")]
    pub min_charge_level: f32,

    /// Stop charging at or above this level (percent)
    #[serde(default = "default_max_charge_level")]
    pub max_charge_level: f32,
}

fn default_schedule_path() -> String {
    DEFAULT_SCHEDULE_PATH.to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_min_charge_level() -> f32 {
    20.0
}

fn default_max_charge_level() -> f32 {
    90.0
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            schedule_path: default_schedule_path(),
            archive_path: None,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            min_charge_level: default_min_charge_level(),
            max_charge_level: default_max_charge_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// 1. Explicit path (must exist)
    /// 2. config.toml in the working directory
    /// 3. Defaults with environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            config.validate()?;
            return Ok(config);
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            let config = Self::from_file(default_path)?;
            config.validate()?;
            return Ok(config);
        }

        info!("No config file found, using defaults with environment overrides");
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: AppConfig = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults with environment overrides
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("WATTPLAN_SCHEDULE_PATH") {
            config.storage.schedule_path = path;
        }

        if let Ok(tz) = std::env::var("WATTPLAN_TIMEZONE") {
            config.system.timezone = Some(tz);
        }

        if let Ok(level) = std::env::var("WATTPLAN_LOG") {
            config.system.log_level = level;
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.schedule_path.trim().is_empty() {
            anyhow::bail!("storage.schedule_path must not be empty");
        }

        self.timezone()?;

        let battery = &self.battery;
        if !(0.0..=100.0).contains(&battery.min_charge_level)
            || !(0.0..=100.0).contains(&battery.max_charge_level)
        {
            anyhow::bail!("Battery charge levels must be between 0% and 100%");
        }
        if battery.min_charge_level >= battery.max_charge_level {
            anyhow::bail!(
                "battery.min_charge_level ({}%) must be lower than battery.max_charge_level ({}%)",
                battery.min_charge_level,
                battery.max_charge_level
            );
        }

        Ok(())
    }

    /// Parsed timezone, `None` for host local time
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.system
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("Invalid timezone '{name}': {e}"))
            })
            .transpose()
    }

    /// Current wall-clock time in the configured timezone
    pub fn local_now(&self) -> Result<NaiveDateTime> {
        Ok(match self.timezone()? {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        })
    }

    pub fn persistence(&self) -> SchedulePersistence {
        let persistence = SchedulePersistence::new(&self.storage.schedule_path);
        match &self.storage.archive_path {
            Some(archive) => persistence.with_archive_path(archive),
            None => persistence,
        }
    }

    /// Limit state for a state of charge reading
    pub fn limit_state(&self, soc: f32) -> LimitState {
        LimitState::from_soc(
            soc,
            self.battery.min_charge_level,
            self.battery.max_charge_level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.schedule_path, DEFAULT_SCHEDULE_PATH);
        assert!(config.storage.archive_path.is_none());
        assert!(config.system.timezone.is_none());
        assert_eq!(config.system.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [system]
            timezone = "Europe/Amsterdam"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.schedule_path, DEFAULT_SCHEDULE_PATH);
        assert_eq!(config.timezone().unwrap(), Some(chrono_tz::Europe::Amsterdam));
        assert!((config.battery.max_charge_level - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wattplan.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            schedule_path = "/var/lib/wattplan/schedule.json"
            archive_path = "/var/lib/wattplan/archive.json"

            [battery]
            min_charge_level = 15.0
            max_charge_level = 95.0
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        let persistence = config.persistence();
        assert_eq!(
            persistence.path(),
            Path::new("/var/lib/wattplan/schedule.json")
        );
        assert_eq!(
            persistence.archive_path(),
            Path::new("/var/lib/wattplan/archive.json")
        );
        assert_eq!(config.limit_state(96.0), LimitState::AtMaximum);
        assert_eq!(config.limit_state(50.0), LimitState::Normal);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.system.timezone = Some("Mars/Olympus".to_owned());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.schedule_path = "  ".to_owned();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.battery.min_charge_level = 95.0;
        assert!(config.validate().is_err());
    }
}
