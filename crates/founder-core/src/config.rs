//! Configuration loading and typed config structures for Focus Founder.
//!
//! The canonical configuration lives in `founder-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use founder_domain::{EmployeeConfig, ProductivityConfig, RewardConfig};
use founder_types::CurrencyBalance;

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "FOUNDER_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `founder-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FounderConfig {
    /// Focus debounce and anti-cheese session settings.
    #[serde(default)]
    pub focus: FocusConfig,

    /// Starting balance.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Hiring, morale, and leveling parameters.
    #[serde(default)]
    pub employee: EmployeeConfig,

    /// Base productivity formula parameters.
    #[serde(default)]
    pub productivity: ProductivityConfig,

    /// Base reward formula parameters.
    #[serde(default)]
    pub reward: RewardConfig,

    /// Headless host settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FounderConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `FOUNDER_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, f64, bool); 11] = [
            ("focus.debounce_secs", self.focus.debounce_secs, self.focus.debounce_secs >= 0.0),
            ("focus.min_session_secs", self.focus.min_session_secs, self.focus.min_session_secs >= 0.0),
            ("employee.level_xp_factor", self.employee.level_xp_factor, self.employee.level_xp_factor > 0.0),
            ("employee.base_hire_cost", self.employee.base_hire_cost, self.employee.base_hire_cost >= 0.0),
            ("employee.morale_regen_rate", self.employee.morale_regen_rate, self.employee.morale_regen_rate >= 0.0),
            ("employee.celebrate_secs", self.employee.celebrate_secs, self.employee.celebrate_secs >= 0.0),
            (
                "employee.completion_experience",
                self.employee.completion_experience,
                self.employee.completion_experience >= 0.0,
            ),
            (
                "employee.starting_morale",
                self.employee.starting_morale,
                (0.0..=100.0).contains(&self.employee.starting_morale),
            ),
            ("productivity.focus_bonus", self.productivity.focus_bonus, self.productivity.focus_bonus > -1.0),
            (
                "reward.experience_base",
                self.reward.experience_base,
                self.reward.experience_base >= 0.0,
            ),
            (
                "reward.experience_per_duration_sec",
                self.reward.experience_per_duration_sec,
                self.reward.experience_per_duration_sec >= 0.0,
            ),
        ];
        for (field, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(ConfigError::Invalid {
                    reason: format!("{field} out of range: {value}"),
                });
            }
        }
        if !self.economy.starting_balance.is_valid() {
            return Err(ConfigError::Invalid {
                reason: "economy.starting_balance must be non-negative".to_owned(),
            });
        }
        if self.engine.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "engine.frame_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Focus session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Seconds the host must stay focused before focus is accepted.
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: f64,

    /// Seconds a session must last to start and to count toward the daily
    /// total.
    #[serde(default = "default_min_session_secs")]
    pub min_session_secs: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            min_session_secs: default_min_session_secs(),
        }
    }
}

/// Economy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Balance of a new company.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: CurrencyBalance,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
        }
    }
}

/// Headless host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Path of the content catalog YAML.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Where the game snapshot is written on shutdown and read on start.
    #[serde(default)]
    pub save_path: Option<PathBuf>,

    /// Office definition unlocked for a new company.
    #[serde(default = "default_starter_office")]
    pub starter_office: String,

    /// Task definitions queued in the starter office.
    #[serde(default = "default_starter_tasks")]
    pub starter_tasks: Vec<String>,

    /// Archetypes hired into the starter office.
    #[serde(default)]
    pub starter_hires: Vec<String>,

    /// Seed for task duration variation; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            catalog_path: default_catalog_path(),
            save_path: None,
            starter_office: default_starter_office(),
            starter_tasks: default_starter_tasks(),
            starter_hires: Vec::new(),
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV)
            && !level.trim().is_empty()
        {
            self.level = level;
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_debounce_secs() -> f64 {
    1.0
}

const fn default_min_session_secs() -> f64 {
    3.0
}

const fn default_starting_balance() -> CurrencyBalance {
    CurrencyBalance::new(100.0, 0.0, 0.0)
}

const fn default_frame_interval_ms() -> u64 {
    100
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("content/catalog.yaml")
}

fn default_starter_office() -> String {
    "garage".to_owned()
}

fn default_starter_tasks() -> Vec<String> {
    vec!["write-code".to_owned()]
}

fn default_log_level() -> String {
    "info".to_owned()
}
