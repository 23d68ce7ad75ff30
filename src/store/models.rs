/*!
 * Store entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{accuracy_percentage, clean_sentences, iso_timestamp, VocabularyEntry};

/// A stored word owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Server-assigned identifier (UUID v4)
    pub id: String,
    /// Owner identifier
    pub owner_id: String,
    /// Word content and practice counters
    #[serde(flatten)]
    pub entry: VocabularyEntry,
    /// Last modification time
    #[serde(with = "iso_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Edit of a stored word; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordUpdate {
    pub english_word: Option<String>,
    pub meaning: Option<String>,
    /// Replaces the whole list
    pub example_sentences: Option<Vec<String>>,
}

impl WordUpdate {
    pub fn is_empty(&self) -> bool {
        self.english_word.is_none() && self.meaning.is_none() && self.example_sentences.is_none()
    }

    /// Applies the edit to `entry` with the same cleanup as a newly added word
    pub fn apply_to(self, entry: &mut VocabularyEntry) {
        if let Some(english_word) = self.english_word {
            entry.english_word = english_word.trim().to_string();
        }
        if let Some(meaning) = self.meaning {
            entry.meaning = meaning.trim().to_string();
        }
        if let Some(sentences) = self.example_sentences {
            entry.example_sentences = clean_sentences(sentences);
        }
    }
}

/// How a practice attempt was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttemptType {
    /// Self-graded flashcard review
    #[default]
    Flashcard,
    /// Multiple-choice quiz question
    Quiz,
}

impl fmt::Display for AttemptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptType::Flashcard => write!(f, "flashcard"),
            AttemptType::Quiz => write!(f, "quiz"),
        }
    }
}

impl std::str::FromStr for AttemptType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flashcard" => Ok(AttemptType::Flashcard),
            "quiz" => Ok(AttemptType::Quiz),
            _ => Err(anyhow::anyhow!("Invalid attempt type: {}", s)),
        }
    }
}

/// One logged practice attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub id: String,
    pub owner_id: String,
    pub word_id: String,
    pub is_correct: bool,
    pub attempt_type: AttemptType,
    pub created_at: String,
}

/// Aggregate practice statistics for one owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VocabularyStats {
    pub total_words: u64,
    pub total_attempts: u64,
    pub total_correct: u64,
    /// Rounded percentage, 0 when nothing was attempted
    pub average_accuracy: u32,
}

impl VocabularyStats {
    pub fn new(total_words: u64, total_attempts: u64, total_correct: u64) -> Self {
        Self {
            total_words,
            total_attempts,
            total_correct,
            average_accuracy: accuracy_percentage(total_correct, total_attempts),
        }
    }
}
