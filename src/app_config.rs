use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings applied when writing a document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Sort events by start time before export
    #[serde(default = "default_true")]
    pub sort: bool,

    /// Drop commented-out and empty events
    #[serde(default = "default_true")]
    pub strip_comments: bool,

    /// Split overlapping events into non-overlapping cues
    #[serde(default = "default_true")]
    pub recombine_overlaps: bool,

    /// Merge back-to-back events with identical text
    #[serde(default = "default_true")]
    pub merge_identical: bool,

    /// Log every override tag parameter at debug level while serializing
    #[serde(default)]
    pub trace_overrides: bool,
}

impl ExportConfig {
    /// Export settings with every normalisation pass disabled
    pub fn raw() -> Self {
        Self {
            sort: false,
            strip_comments: false,
            recombine_overlaps: false,
            merge_identical: false,
            trace_overrides: false,
        }
    }

    // @returns: Whether any normalisation pass is enabled
    pub fn normalizes(&self) -> bool {
        self.sort || self.strip_comments || self.recombine_overlaps || self.merge_identical
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sort: true,
            strip_comments: true,
            recombine_overlaps: true,
            merge_identical: true,
            trace_overrides: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file, or create it with defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        // Overlap recombination only compares neighbours, so input must be ordered
        if self.export.recombine_overlaps && !self.export.sort {
            return Err(anyhow!("recombine_overlaps requires sort to be enabled"));
        }
        Ok(())
    }
}
