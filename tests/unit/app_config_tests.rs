/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use vocabport::app_config::{Config, LogLevel};
use vocabport::ingest::{CsvMode, DataFormat, ImportPolicy};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.owner_id, "local");
    assert_eq!(config.database_path, None);
    assert_eq!(config.import.policy, ImportPolicy::BlockOnErrors);
    assert_eq!(config.import.csv_mode, CsvMode::Naive);
    assert_eq!(config.import.parallel_threshold, 5000);
    assert_eq!(config.export.format, DataFormat::Csv);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// A missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path)?, config);

    Ok(())
}

/// Saved settings load back
#[test]
fn test_loadOrCreate_withExistingFile_shouldReadSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "owner_id": "reza",
            "database_path": "/tmp/words.db",
            "import": { "policy": "accept_valid", "csv_mode": "quote_aware", "parallel_threshold": 100 },
            "export": { "format": "json" },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.owner_id, "reza");
    assert_eq!(config.import.policy, ImportPolicy::AcceptValid);
    assert_eq!(config.pipeline_options().csv_mode, CsvMode::QuoteAware);
    assert_eq!(config.pipeline_options().parallel_threshold, 100);
    assert_eq!(config.export.format, DataFormat::Json);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());

    Ok(())
}

/// Malformed files are reported, not replaced
#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");

    Ok(())
}
