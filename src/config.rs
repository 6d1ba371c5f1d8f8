//! Configuration management for the application.
//!
//! This module handles loading and saving user defaults in TOML format with
//! platform-specific directory resolution. The file only supplies defaults;
//! anything given in a mapping request or on the command line wins.

use crate::constants::{APP_NAME, CONFIG_PATH_ENV, DEFAULT_VERSION_LABELS};
use crate::models::{NeuroscopeParams, VersionLabels};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Output defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated files (current directory when unset)
    pub out_dir: Option<PathBuf>,
    /// Write `.txt` shank files
    pub export_txt: bool,
    /// Write Neuroscope `.xml` files
    pub export_xml: bool,
    /// Labels of the normal and flipped outputs
    pub version_labels: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: None,
            export_txt: false,
            export_xml: true,
            version_labels: DEFAULT_VERSION_LABELS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ProbeMapper/config.toml`
/// - macOS: `~/Library/Application Support/ProbeMapper/config.toml`
/// - Windows: `%APPDATA%\ProbeMapper\config.toml`
///
/// `PROBEMAPPER_CONFIG` overrides the location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output defaults
    pub output: OutputConfig,
    /// Neuroscope parameter defaults
    pub neuroscope: NeuroscopeParams,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<PathBuf> {
        self.validate()?;

        let config_path = Self::config_file_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(config_path)
    }

    /// Validates configuration values.
    ///
    /// Checks that the version labels form a valid pair.
    pub fn validate(&self) -> Result<()> {
        self.version_labels()?;
        Ok(())
    }

    /// Configured version labels.
    pub fn version_labels(&self) -> Result<VersionLabels> {
        VersionLabels::new(&self.output.version_labels)
            .context("Invalid [output] version_labels in config")
    }

    /// Configured output directory, or the current directory.
    pub fn out_dir(&self) -> PathBuf {
        self.output
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
