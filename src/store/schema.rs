/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for the word store tables
 * and handles schema versioning.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Foreign keys are a per-connection setting
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        anyhow::bail!(
            "Database schema v{} is newer than supported v{}",
            current_version,
            SCHEMA_VERSION
        );
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Timestamps are canonical ISO-8601 strings, so text order is time order
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            english_word TEXT NOT NULL CHECK (length(trim(english_word)) > 0),
            persian_meaning TEXT NOT NULL CHECK (length(trim(persian_meaning)) > 0),
            example_sentences TEXT NOT NULL DEFAULT '[]',
            total_attempts INTEGER NOT NULL DEFAULT 0 CHECK (total_attempts >= 0),
            correct_answers INTEGER NOT NULL DEFAULT 0 CHECK (correct_answers >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_words_owner_created ON words(owner_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_words_owner_updated ON words(owner_id, updated_at);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_attempts (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            is_correct INTEGER NOT NULL,
            attempt_type TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_quiz_attempts_word ON quiz_attempts(word_id);
        "#,
    )?;

    Ok(())
}
