//! Runtime configuration.
//!
//! Everything here is plain serde data read from TOML. Discovery of the file
//! to read lives in [`crate::cli::config`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuestlineConfig {
    pub general: GeneralConfig,
    pub duties: DutyConfig,
    pub single_player_duties: SinglePlayerDutyConfig,
    pub timings: TimingConfig,
    pub advanced: AdvancedConfig,
}

/// Which system re-equips recommended gear
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GearsetUpdateSource {
    #[default]
    Vanilla,
    Stylist,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub quest_directory: Option<PathBuf>,
    pub gearset_update_source: GearsetUpdateSource,
    /// Hand dialogue skipping to the dialogue automation plugin while running
    pub configure_text_advance: bool,
    pub dont_skip_cutscenes: bool,
    pub auto_step_refresh_enabled: bool,
    pub auto_step_refresh_delay_seconds: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            quest_directory: None,
            gearset_update_source: GearsetUpdateSource::Vanilla,
            configure_text_advance: true,
            dont_skip_cutscenes: false,
            auto_step_refresh_enabled: false,
            auto_step_refresh_delay_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DutyConfig {
    pub run_instanced_content_with_auto_duty: bool,
    pub blacklisted_duty_cfc_ids: Vec<u32>,
    pub whitelisted_duty_cfc_ids: Vec<u32>,
    pub disable_auto_duty_bare_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SinglePlayerDutyConfig {
    pub run_solo_instances_with_boss_mod: bool,
}

/// Per-task-type waits and retry budgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub default_task_delay_ms: u64,
    pub retry_interval_ms: u64,
    pub max_equip_attempts: u32,
    pub max_dive_attempts: u32,
    pub max_interact_attempts: u32,
    pub max_movement_attempts: u32,
    pub highlight_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_task_delay_ms: 5000,
            retry_interval_ms: 1000,
            max_equip_attempts: 3,
            max_dive_attempts: 3,
            max_interact_attempts: 3,
            max_movement_attempts: 3,
            highlight_interval_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn default_task_delay(&self) -> Duration {
        Duration::from_millis(self.default_task_delay_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn highlight_interval(&self) -> Duration {
        Duration::from_millis(self.highlight_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvancedConfig {
    pub highlight_selected_npc: bool,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            highlight_selected_npc: true,
        }
    }
}

impl QuestlineConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
