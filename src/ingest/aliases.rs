/*!
 * Field aliasing.
 *
 * Files in the wild use a handful of column names for the same thing. This
 * module maps them onto the canonical vocabulary fields before validation,
 * independent of the file format.
 */

use serde::Serialize;
use std::fmt;

use super::value::{RawRow, RawValue};

/// Canonical vocabulary fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EnglishWord,
    PersianMeaning,
    ExampleSentences,
    TotalAttempts,
    CorrectAnswers,
    CreatedAt,
}

impl Field {
    /// All fields in template column order
    pub const ALL: [Field; 6] = [
        Field::EnglishWord,
        Field::PersianMeaning,
        Field::ExampleSentences,
        Field::TotalAttempts,
        Field::CorrectAnswers,
        Field::CreatedAt,
    ];

    /// Canonical snake-case column name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnglishWord => "english_word",
            Self::PersianMeaning => "persian_meaning",
            Self::ExampleSentences => "example_sentences",
            Self::TotalAttempts => "total_attempts",
            Self::CorrectAnswers => "correct_answers",
            Self::CreatedAt => "created_at",
        }
    }

    /// Human-readable label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::EnglishWord => "English word",
            Self::PersianMeaning => "Persian meaning",
            Self::ExampleSentences => "Example sentences",
            Self::TotalAttempts => "Total attempts",
            Self::CorrectAnswers => "Correct answers",
            Self::CreatedAt => "Created date",
        }
    }

    /// Accepted source names, highest priority first
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::EnglishWord => &["english_word", "english", "word"],
            Self::PersianMeaning => &["persian_meaning", "persian", "meaning"],
            Self::ExampleSentences => &["example_sentences"],
            Self::TotalAttempts => &["total_attempts"],
            Self::CorrectAnswers => &["correct_answers"],
            Self::CreatedAt => &["created_at"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw row with every canonical field resolved to at most one value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    pub english_word: Option<RawValue>,
    pub meaning: Option<RawValue>,
    pub example_sentences: Option<RawValue>,
    pub total_attempts: Option<RawValue>,
    pub correct_answers: Option<RawValue>,
    pub created_at: Option<RawValue>,
}

impl NormalizedRow {
    /// Resolved value for a field
    pub fn get(&self, field: Field) -> Option<&RawValue> {
        match field {
            Field::EnglishWord => self.english_word.as_ref(),
            Field::PersianMeaning => self.meaning.as_ref(),
            Field::ExampleSentences => self.example_sentences.as_ref(),
            Field::TotalAttempts => self.total_attempts.as_ref(),
            Field::CorrectAnswers => self.correct_answers.as_ref(),
            Field::CreatedAt => self.created_at.as_ref(),
        }
    }
}

/// Picks the first alias carrying a present value
fn resolve(row: &RawRow, field: Field) -> Option<RawValue> {
    field
        .aliases()
        .iter()
        .filter_map(|name| row.get(name))
        .find(|value| value.is_present())
        .cloned()
}

/// Maps alternate column names onto canonical fields
pub fn normalize(row: &RawRow) -> NormalizedRow {
    NormalizedRow {
        english_word: resolve(row, Field::EnglishWord),
        meaning: resolve(row, Field::PersianMeaning),
        example_sentences: resolve(row, Field::ExampleSentences),
        total_attempts: resolve(row, Field::TotalAttempts),
        correct_answers: resolve(row, Field::CorrectAnswers),
        created_at: resolve(row, Field::CreatedAt),
    }
}
