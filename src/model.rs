use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// @module: Vocabulary domain types

/// One validated, normalized word record ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// English word, trimmed and non-empty
    pub english_word: String,

    /// Persian translation, trimmed and non-empty
    #[serde(rename = "persian_meaning")]
    pub meaning: String,

    /// Example sentences in file order
    #[serde(default)]
    pub example_sentences: Vec<String>,

    /// Practice attempts so far
    #[serde(default)]
    pub total_attempts: u32,

    /// Correct practice answers so far
    #[serde(default)]
    pub correct_answers: u32,

    /// Creation time
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl VocabularyEntry {
    /// Creates an entry with zeroed counters and no examples
    pub fn new(english_word: &str, meaning: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            english_word: english_word.to_string(),
            meaning: meaning.to_string(),
            example_sentences: Vec::new(),
            total_attempts: 0,
            correct_answers: 0,
            created_at,
        }
    }

    /// Hand-entered form of an entry: texts trimmed, blank sentences dropped
    pub fn normalized(mut self) -> Self {
        self.english_word = self.english_word.trim().to_string();
        self.meaning = self.meaning.trim().to_string();
        self.example_sentences = clean_sentences(self.example_sentences);
        self
    }

    /// Canonical ISO-8601 rendering of `created_at`
    pub fn created_at_iso(&self) -> String {
        format_timestamp(&self.created_at)
    }

    /// Accuracy of this entry's practice history in percent
    pub fn accuracy(&self) -> u32 {
        accuracy_percentage(self.correct_answers as u64, self.total_attempts as u64)
    }
}

/// Trims each sentence and drops the blank ones
pub fn clean_sentences(sentences: Vec<String>) -> Vec<String> {
    sentences
        .into_iter()
        .map(|sentence| sentence.trim().to_string())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Renders a timestamp the way browsers' `toISOString` does: millisecond
/// precision with a `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rounded percentage of correct answers, 0 when nothing was attempted
pub fn accuracy_percentage(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Serde adapter storing timestamps as canonical ISO-8601 strings
pub mod iso_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
