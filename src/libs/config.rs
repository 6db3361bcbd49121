//! Application configuration.
//!
//! Settings live in `config.json` inside the data directory (see
//! [`DataStorage`]). A missing file yields the defaults; missing sections or
//! fields inside an existing file fall back to their defaults as well.
//!
//! ```json
//! {
//!   "engine": { "utc_offset_minutes": 0 },
//!   "sweep": { "deletion_interval_hours": 24, "recurrence_interval_hours": 1 },
//!   "default_owner": "local"
//! }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lapse::libs::config::Config;
//!
//! let config = Config::read()?;
//! let engine = config.engine()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::expiration::ExpirationEngine;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_OWNER: &str = "local";
/// Accepted sweep intervals in hours, one hour up to one year.
pub const INTERVAL_HOURS: RangeInclusive<u64> = 1..=8760;

/// A section selectable in the `init` wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Day-boundary settings shared by expiration and recurrence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Minutes east of UTC used for calendar days. 0 means UTC.
    pub utc_offset_minutes: i32,
}

/// Cadence of the watcher's two passes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SweepConfig {
    pub deletion_interval_hours: u64,
    pub recurrence_interval_hours: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            deletion_interval_hours: 24,
            recurrence_interval_hours: 1,
        }
    }
}

impl SweepConfig {
    pub fn deletion_interval(&self) -> Duration {
        hours_to_duration(self.deletion_interval_hours)
    }

    pub fn recurrence_interval(&self) -> Duration {
        hours_to_duration(self.recurrence_interval_hours)
    }
}

fn hours_to_duration(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub sweep: SweepConfig,
    /// Owner used by commands when `--owner` is not given.
    pub default_owner: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineConfig::default(),
            sweep: SweepConfig::default(),
            default_owner: DEFAULT_OWNER.to_string(),
        }
    }
}

impl Config {
    /// Reads `config.json` from the data directory, or the defaults when it
    /// does not exist yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Rejects offsets beyond ±14 hours and sweep intervals outside
    /// [`INTERVAL_HOURS`].
    pub fn validate(&self) -> Result<()> {
        if ExpirationEngine::from_offset_minutes(self.engine.utc_offset_minutes).is_none() {
            msg_bail_anyhow!(Message::ConfigInvalidUtcOffset(self.engine.utc_offset_minutes));
        }
        for hours in [self.sweep.deletion_interval_hours, self.sweep.recurrence_interval_hours] {
            if !INTERVAL_HOURS.contains(&hours) {
                msg_bail_anyhow!(Message::ConfigInvalidInterval(hours));
            }
        }
        Ok(())
    }

    /// The engine for the configured day boundary.
    pub fn engine(&self) -> Result<ExpirationEngine> {
        match ExpirationEngine::from_offset_minutes(self.engine.utc_offset_minutes) {
            Some(engine) => Ok(engine),
            None => msg_bail_anyhow!(Message::ConfigInvalidUtcOffset(self.engine.utc_offset_minutes)),
        }
    }

    /// `owner` when given, else the configured default owner.
    pub fn owner_or_default(&self, owner: Option<String>) -> Result<String> {
        match owner.or_else(|| Some(self.default_owner.clone())).filter(|o| !o.trim().is_empty()) {
            Some(owner) => Ok(owner),
            None => msg_bail_anyhow!(Message::NoOwnerConfigured),
        }
    }

    /// Interactive wizard over the current settings.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "engine".to_string(),
                name: Message::ConfigModuleEngine.to_string(),
            },
            ConfigModule {
                key: "sweep".to_string(),
                name: Message::ConfigModuleSweep.to_string(),
            },
            ConfigModule {
                key: "owner".to_string(),
                name: Message::ConfigModuleOwner.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "engine" => {
                    msg_print!(Message::ConfigModuleEngine);
                    config.engine = EngineConfig {
                        utc_offset_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptUtcOffset.to_string())
                            .default(config.engine.utc_offset_minutes)
                            .validate_with(|minutes: &i32| {
                                ExpirationEngine::from_offset_minutes(*minutes)
                                    .map(|_| ())
                                    .ok_or_else(|| Message::ConfigInvalidUtcOffset(*minutes).to_string())
                            })
                            .interact_text()?,
                    };
                }
                "sweep" => {
                    msg_print!(Message::ConfigModuleSweep);
                    config.sweep = SweepConfig {
                        deletion_interval_hours: prompt_interval(Message::PromptDeletionInterval, config.sweep.deletion_interval_hours)?,
                        recurrence_interval_hours: prompt_interval(Message::PromptRecurrenceInterval, config.sweep.recurrence_interval_hours)?,
                    };
                }
                "owner" => {
                    config.default_owner = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDefaultOwner.to_string())
                        .default(config.default_owner.clone())
                        .interact_text()?;
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

fn prompt_interval(prompt: Message, default: u64) -> Result<u64> {
    Ok(Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(default)
        .validate_with(|hours: &u64| {
            if INTERVAL_HOURS.contains(hours) {
                Ok(())
            } else {
                Err(Message::ConfigInvalidInterval(*hours).to_string())
            }
        })
        .interact_text()?)
}
