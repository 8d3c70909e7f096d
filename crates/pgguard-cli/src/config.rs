//! Configuration file support
//!
//! Settings come from an optional TOML file; command-line flags override
//! them. Every section falls back to defaults when absent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_COST: f64 = 5000.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Total cost above which a query fails the gate
    pub max_cost: f64,
    /// Environment tag stamped on reports
    pub environment: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_cost: DEFAULT_MAX_COST,
            environment: Some("demo".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How reports are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tables for humans
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// Also write JSON logs to daily rolling files
    pub json_file: bool,
    /// Directory for JSON log files
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_file: false,
            log_dir: default_log_dir(),
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pgguard"))
}

pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pgguard")
        .join("logs")
}

impl Config {
    /// Parses a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration file")
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_config_file() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("In config file {:?}", path))
    }
}
