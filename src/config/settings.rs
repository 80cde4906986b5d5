//! Application settings and configuration types.
//!
//! Settings are persisted to `~/.config/sift/settings.json` (or XDG
//! equivalent) and loaded at startup. Missing files fall back to defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{RuleSet, ScoringPolicy};

/// Errors that can occur loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure reading or writing a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File exists but is not valid JSON for the expected type.
    #[error("invalid config file: {0}")]
    Invalid(#[from] serde_json::Error),

    /// No usable home directory to resolve default paths against.
    #[error("could not determine a config directory for this platform")]
    NoProjectDirs,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Feedback scoring constants.
    #[serde(default)]
    pub scoring: ScoringPolicy,
    /// Database location.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Classification rule configuration.
    #[serde(default)]
    pub rules: RulesSettings,
}

/// Database location settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit database path; the platform data dir is used when unset.
    pub db_path: Option<PathBuf>,
}

/// Classification rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSettings {
    /// Path to a custom rule set JSON file; built-in rules are used when
    /// unset.
    pub rules_path: Option<PathBuf>,
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("com", "sift", "sift").ok_or(ConfigError::NoProjectDirs)
}

impl Settings {
    /// Default settings file location for this platform.
    pub fn default_path() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("settings.json"))
    }

    /// Loads settings from the given path, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saves settings as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolves the database path, preferring the explicit setting.
    pub fn db_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.db_path {
            return Ok(path.clone());
        }
        Ok(project_dirs()?.data_dir().join("sift.db"))
    }

    /// Loads the rule set, preferring the configured custom file.
    pub fn rule_set(&self) -> ConfigResult<RuleSet> {
        match &self.rules.rules_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
            None => Ok(RuleSet::default()),
        }
    }
}
