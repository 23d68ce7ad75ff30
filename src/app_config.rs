use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::ingest::{CsvMode, DataFormat, ImportPolicy, PipelineOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Owner the imported words belong to
    #[serde(default = "default_owner_id")]
    pub owner_id: String,

    /// Word store location; the user data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Import configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
    // @field: Commit policy when rows have errors
    #[serde(default)]
    pub policy: ImportPolicy,

    // @field: CSV tokenizer
    #[serde(default)]
    pub csv_mode: CsvMode,

    // @field: Row count from which validation runs in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            policy: ImportPolicy::default(),
            csv_mode: CsvMode::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ExportConfig {
    // @field: Format for templates and exports
    #[serde(default)]
    pub format: DataFormat,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
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
    // @returns: Filter for the `log` facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_owner_id() -> String {
    "local".to_string()
}

fn default_parallel_threshold() -> usize {
    PipelineOptions::default().parallel_threshold
}

impl Config {
    /// Load the configuration file, writing a default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(anyhow!("Owner id must not be empty"));
        }

        if self.import.parallel_threshold == 0 {
            return Err(anyhow!("Import parallel_threshold must be greater than zero"));
        }

        Ok(())
    }

    /// Pipeline options derived from the import settings
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            csv_mode: self.import.csv_mode,
            parallel_threshold: self.import.parallel_threshold,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            owner_id: default_owner_id(),
            database_path: None,
            import: ImportConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
