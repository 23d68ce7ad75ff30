/*!
 * Word store for imported vocabulary.
 *
 * This module provides SQLite-based persistence for:
 * - Words owned by a user, written in all-or-nothing batches
 * - Hand-entered words, edits and deletions
 * - Practice attempts and the counters they update
 * - Per-owner statistics
 */

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::VocabularyEntry;

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::StoreConnection;
pub use models::{AttemptType, VocabularyStats, WordRecord, WordUpdate};
pub use repository::WordRepository;

/// Persistence seam used by the import, editing and practice flows
///
/// Implementations must write a batch atomically: either every entry is
/// stored or none is.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Store a batch of validated entries for one owner
    async fn insert_batch(&self, owner_id: &str, entries: &[VocabularyEntry]) -> Result<Vec<WordRecord>, StoreError>;

    /// Store one hand-entered word after trimming it
    async fn add_word(&self, owner_id: &str, entry: VocabularyEntry) -> Result<WordRecord, StoreError>;

    async fn get_word(&self, owner_id: &str, word_id: &str) -> Result<Option<WordRecord>, StoreError>;

    /// Change a word's text; counters are untouched
    async fn update_word(&self, owner_id: &str, word_id: &str, update: WordUpdate) -> Result<WordRecord, StoreError>;

    async fn delete_word(&self, owner_id: &str, word_id: &str) -> Result<(), StoreError>;

    /// All words of an owner, newest first
    async fn list_words(&self, owner_id: &str) -> Result<Vec<WordRecord>, StoreError>;

    /// Words to review, least recently practiced first
    async fn practice_queue(&self, owner_id: &str, limit: usize) -> Result<Vec<WordRecord>, StoreError>;

    /// Record one practice answer
    async fn record_attempt(
        &self,
        owner_id: &str,
        word_id: &str,
        is_correct: bool,
        attempt_type: AttemptType,
    ) -> Result<WordRecord, StoreError>;

    /// Aggregate statistics for an owner
    async fn stats(&self, owner_id: &str) -> Result<VocabularyStats, StoreError>;
}

#[async_trait]
impl WordStore for WordRepository {
    async fn insert_batch(&self, owner_id: &str, entries: &[VocabularyEntry]) -> Result<Vec<WordRecord>, StoreError> {
        WordRepository::insert_batch(self, owner_id, entries).await
    }

    async fn add_word(&self, owner_id: &str, entry: VocabularyEntry) -> Result<WordRecord, StoreError> {
        WordRepository::add_word(self, owner_id, entry).await
    }

    async fn get_word(&self, owner_id: &str, word_id: &str) -> Result<Option<WordRecord>, StoreError> {
        WordRepository::get_word(self, owner_id, word_id).await
    }

    async fn update_word(&self, owner_id: &str, word_id: &str, update: WordUpdate) -> Result<WordRecord, StoreError> {
        WordRepository::update_word(self, owner_id, word_id, update).await
    }

    async fn delete_word(&self, owner_id: &str, word_id: &str) -> Result<(), StoreError> {
        WordRepository::delete_word(self, owner_id, word_id).await
    }

    async fn list_words(&self, owner_id: &str) -> Result<Vec<WordRecord>, StoreError> {
        WordRepository::list_words(self, owner_id).await
    }

    async fn practice_queue(&self, owner_id: &str, limit: usize) -> Result<Vec<WordRecord>, StoreError> {
        WordRepository::practice_queue(self, owner_id, limit).await
    }

    async fn record_attempt(
        &self,
        owner_id: &str,
        word_id: &str,
        is_correct: bool,
        attempt_type: AttemptType,
    ) -> Result<WordRecord, StoreError> {
        WordRepository::record_attempt(self, owner_id, word_id, is_correct, attempt_type).await
    }

    async fn stats(&self, owner_id: &str) -> Result<VocabularyStats, StoreError> {
        WordRepository::stats(self, owner_id).await
    }
}
