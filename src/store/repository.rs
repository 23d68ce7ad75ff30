/*!
 * Repository layer for word store operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::model::{format_timestamp, VocabularyEntry};

use super::connection::StoreConnection;
use super::models::{AttemptType, QuizAttemptRecord, VocabularyStats, WordRecord, WordUpdate};

const WORD_COLUMNS: &str = "id, owner_id, english_word, persian_meaning, example_sentences, \
     total_attempts, correct_answers, created_at, updated_at";

/// Counters are read back as u32
const COUNTER_MAX: i64 = u32::MAX as i64;

/// Repository for word store operations
#[derive(Clone)]
pub struct WordRepository {
    db: StoreConnection,
}

impl WordRepository {
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Repository over the database file at `location`
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self, StoreError> {
        Ok(Self::new(StoreConnection::open(location)?))
    }

    /// Repository over the default database location
    pub fn new_default() -> Result<Self, StoreError> {
        Ok(Self::new(StoreConnection::open_default()?))
    }

    /// Repository over an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(StoreConnection::in_memory()?))
    }

    // =========================================================================
    // Word Operations
    // =========================================================================

    /// Insert a batch of entries for one owner; all rows or none are written
    pub async fn insert_batch(&self, owner_id: &str, entries: &[VocabularyEntry]) -> Result<Vec<WordRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        let entries = entries.to_vec();

        self.db
            .write(move |tx| {
                // Stored timestamps keep millisecond precision
                let now = Utc::now().trunc_subsecs(3);
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO words ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    WORD_COLUMNS
                ))?;

                let mut records = Vec::with_capacity(entries.len());
                for mut entry in entries {
                    entry.created_at = entry.created_at.trunc_subsecs(3);
                    let record = WordRecord {
                        id: Uuid::new_v4().to_string(),
                        owner_id: owner_id.clone(),
                        entry,
                        updated_at: now,
                    };
                    stmt.execute(params![
                        record.id,
                        record.owner_id,
                        record.entry.english_word,
                        record.entry.meaning,
                        serde_json::to_string(&record.entry.example_sentences)?,
                        record.entry.total_attempts,
                        record.entry.correct_answers,
                        record.entry.created_at_iso(),
                        format_timestamp(&record.updated_at),
                    ])?;
                    records.push(record);
                }

                debug!("Inserted {} word(s) for owner {}", records.len(), owner_id);
                Ok(records)
            })
            .await
    }

    /// Add one hand-entered word; texts are trimmed and blank sentences dropped
    pub async fn add_word(&self, owner_id: &str, entry: VocabularyEntry) -> Result<WordRecord, StoreError> {
        let entry = entry.normalized();
        ensure_complete(&entry)?;

        let mut records = self.insert_batch(owner_id, std::slice::from_ref(&entry)).await?;
        records
            .pop()
            .ok_or_else(|| StoreError::Batch("word was not stored".to_string()))
    }

    /// Edit the content of one word; practice counters are left alone
    pub async fn update_word(&self, owner_id: &str, word_id: &str, update: WordUpdate) -> Result<WordRecord, StoreError> {
        let owner_id = owner_id.to_string();
        let word_id = word_id.to_string();

        self.db
            .write(move |tx| {
                let mut record = Self::get_word_sync(tx, &owner_id, &word_id)?
                    .ok_or_else(|| StoreError::NotFound(word_id.clone()))?;

                update.apply_to(&mut record.entry);
                ensure_complete(&record.entry)?;
                record.updated_at = Utc::now().trunc_subsecs(3);

                tx.execute(
                    r#"
                    UPDATE words
                    SET english_word = ?1, persian_meaning = ?2, example_sentences = ?3, updated_at = ?4
                    WHERE owner_id = ?5 AND id = ?6
                    "#,
                    params![
                        record.entry.english_word,
                        record.entry.meaning,
                        serde_json::to_string(&record.entry.example_sentences)?,
                        format_timestamp(&record.updated_at),
                        owner_id,
                        word_id,
                    ],
                )?;

                debug!("Updated word {} for owner {}", word_id, owner_id);
                Ok(record)
            })
            .await
    }

    /// All words of an owner, newest first
    pub async fn list_words(&self, owner_id: &str) -> Result<Vec<WordRecord>, StoreError> {
        let owner_id = owner_id.to_string();

        self.db
            .read(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM words WHERE owner_id = ?1 ORDER BY created_at DESC, id",
                    WORD_COLUMNS
                ))?;
                let words = stmt
                    .query_map([&owner_id], word_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(words)
            })
            .await
    }

    /// Least recently practiced words first, for flashcard review
    pub async fn practice_queue(&self, owner_id: &str, limit: usize) -> Result<Vec<WordRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.db
            .read(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM words WHERE owner_id = ?1 ORDER BY updated_at ASC, id LIMIT ?2",
                    WORD_COLUMNS
                ))?;
                let words = stmt
                    .query_map(params![owner_id, limit], word_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(words)
            })
            .await
    }

    /// Get one word of an owner
    pub async fn get_word(&self, owner_id: &str, word_id: &str) -> Result<Option<WordRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        let word_id = word_id.to_string();

        self.db
            .read(move |conn| Self::get_word_sync(conn, &owner_id, &word_id))
            .await
    }

    /// Get one word (synchronous version for use within transactions)
    fn get_word_sync(conn: &Connection, owner_id: &str, word_id: &str) -> Result<Option<WordRecord>> {
        let word = conn
            .query_row(
                &format!("SELECT {} FROM words WHERE owner_id = ?1 AND id = ?2", WORD_COLUMNS),
                [owner_id, word_id],
                word_from_row,
            )
            .optional()?;
        Ok(word)
    }

    /// Delete one word of an owner together with its logged attempts
    pub async fn delete_word(&self, owner_id: &str, word_id: &str) -> Result<(), StoreError> {
        let owner_id = owner_id.to_string();
        let word_id = word_id.to_string();

        self.db
            .write(move |tx| {
                let deleted = tx.execute(
                    "DELETE FROM words WHERE owner_id = ?1 AND id = ?2",
                    [&owner_id, &word_id],
                )?;
                if deleted == 0 {
                    return Err(StoreError::NotFound(word_id).into());
                }
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Practice Operations
    // =========================================================================

    /// Record one practice answer and return the updated word
    pub async fn record_attempt(
        &self,
        owner_id: &str,
        word_id: &str,
        is_correct: bool,
        attempt_type: AttemptType,
    ) -> Result<WordRecord, StoreError> {
        let owner_id = owner_id.to_string();
        let word_id = word_id.to_string();

        self.db
            .write(move |tx| {
                let now = format_timestamp(&Utc::now());

                let updated = tx.execute(
                    r#"
                    UPDATE words
                    SET total_attempts = MIN(total_attempts + 1, ?5),
                        correct_answers = MIN(correct_answers + ?1, ?5),
                        updated_at = ?2
                    WHERE owner_id = ?3 AND id = ?4
                    "#,
                    params![is_correct as i64, now, owner_id, word_id, COUNTER_MAX],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound(word_id).into());
                }

                tx.execute(
                    r#"
                    INSERT INTO quiz_attempts (id, owner_id, word_id, is_correct, attempt_type, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        Uuid::new_v4().to_string(),
                        owner_id,
                        word_id,
                        is_correct,
                        attempt_type.to_string(),
                        now,
                    ],
                )?;

                Self::get_word_sync(tx, &owner_id, &word_id)?
                    .ok_or_else(|| StoreError::NotFound(word_id.clone()).into())
            })
            .await
    }

    /// Logged attempts for a word, oldest first
    pub async fn list_attempts(&self, owner_id: &str, word_id: &str) -> Result<Vec<QuizAttemptRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        let word_id = word_id.to_string();

        self.db
            .read(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, owner_id, word_id, is_correct, attempt_type, created_at
                    FROM quiz_attempts
                    WHERE owner_id = ?1 AND word_id = ?2
                    ORDER BY created_at ASC, rowid ASC
                    "#,
                )?;
                let attempts = stmt
                    .query_map([&owner_id, &word_id], |row| {
                        let attempt_type: String = row.get(4)?;
                        Ok(QuizAttemptRecord {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            word_id: row.get(2)?,
                            is_correct: row.get(3)?,
                            attempt_type: attempt_type.parse::<AttemptType>().map_err(|e: anyhow::Error| {
                                conversion_error(4, std::io::Error::other(e.to_string()))
                            })?,
                            created_at: row.get(5)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(attempts)
            })
            .await
    }

    /// Aggregate statistics for an owner
    pub async fn stats(&self, owner_id: &str) -> Result<VocabularyStats, StoreError> {
        let owner_id = owner_id.to_string();

        self.db
            .read(move |conn| {
                let (words, attempts, correct): (i64, i64, i64) = conn.query_row(
                    r#"
                    SELECT COUNT(*), COALESCE(SUM(total_attempts), 0), COALESCE(SUM(correct_answers), 0)
                    FROM words WHERE owner_id = ?1
                    "#,
                    [&owner_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;
                Ok(VocabularyStats::new(words as u64, attempts as u64, correct as u64))
            })
            .await
    }
}

fn ensure_complete(entry: &VocabularyEntry) -> Result<(), StoreError> {
    if entry.english_word.is_empty() {
        return Err(StoreError::InvalidWord("English word cannot be empty".to_string()));
    }
    if entry.meaning.is_empty() {
        return Err(StoreError::InvalidWord("Persian meaning cannot be empty".to_string()));
    }
    Ok(())
}

fn conversion_error<E>(index: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

fn timestamp_column(row: &Row, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(index, e))
}

fn word_from_row(row: &Row) -> rusqlite::Result<WordRecord> {
    let sentences: String = row.get(4)?;
    let example_sentences: Vec<String> =
        serde_json::from_str(&sentences).map_err(|e| conversion_error(4, e))?;

    Ok(WordRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        entry: VocabularyEntry {
            english_word: row.get(2)?,
            meaning: row.get(3)?,
            example_sentences,
            total_attempts: row.get(5)?,
            correct_answers: row.get(6)?,
            created_at: timestamp_column(row, 7)?,
        },
        updated_at: timestamp_column(row, 8)?,
    })
}
