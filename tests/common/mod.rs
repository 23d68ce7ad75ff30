/*!
 * Common test utilities for the vocabport test suite
 */

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use vocabport::app_config::Config;
use vocabport::app_controller::Controller;
use vocabport::store::WordRepository;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small, fully valid CSV vocabulary file
pub fn create_test_csv(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "english_word,persian_meaning,example_sentences,total_attempts,correct_answers\n\
                   \"cat\",\"گربه\",\"The cat sleeps;A black cat\",4,3\n\
                   \"dog\",\"سگ\",\"\",0,0\n";
    create_test_file(dir, filename, content)
}

/// Fixed clock for deterministic default timestamps
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Route library logs through env_logger (RUST_LOG) once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Controller over a fresh in-memory store
pub fn in_memory_controller(owner_id: &str) -> Result<Controller> {
    init_logging();
    let config = Config {
        owner_id: owner_id.to_string(),
        ..Config::default()
    };
    Ok(Controller::with_store(config, Arc::new(WordRepository::new_in_memory()?)))
}
