/*!
 * Row validation.
 *
 * Every rule runs on every row; a row can collect several errors. Only the
 * required fields decide whether the row is accepted. Optional fields that
 * fail fall back to their defaults and the row carries on.
 */

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::debug;
use serde::Serialize;
use std::fmt;

use crate::model::VocabularyEntry;

use super::aliases::{Field, NormalizedRow};
use super::value::RawValue;

/// Naive date-time layouts accepted for `created_at`, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A row-and-field level problem found during validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// 1-based data row number (header excluded)
    pub row: usize,
    /// Canonical field the error is about
    pub field: Field,
    /// Original offending value
    pub value: RawValue,
    /// Human-readable reason
    pub message: String,
}

impl ValidationError {
    fn new(row: usize, field: Field, value: RawValue, message: String) -> Self {
        Self {
            row,
            field,
            value,
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)?;
        if !self.value.is_blank() {
            write!(f, " (value: \"{}\")", self.value)?;
        }
        Ok(())
    }
}

/// Result of validating one row
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    /// 1-based data row number
    pub row: usize,
    /// The entry, present iff both required fields passed
    pub entry: Option<VocabularyEntry>,
    /// Every error found on this row
    pub errors: Vec<ValidationError>,
}

impl RowOutcome {
    /// Whether the row makes it into the accepted list
    pub fn is_accepted(&self) -> bool {
        self.entry.is_some()
    }
}

/// Validates normalized rows against the vocabulary schema
#[derive(Debug, Clone)]
pub struct RowValidator {
    now: DateTime<Utc>,
}

impl RowValidator {
    /// Creates a validator that stamps undated rows with `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Validate one row
    pub fn validate(&self, row: usize, input: &NormalizedRow) -> RowOutcome {
        let mut errors = Vec::new();
        let mut report = |field: Field, value: &RawValue, message: String| {
            errors.push(ValidationError::new(row, field, value.clone(), message));
        };

        let english_word = match required_text(Field::EnglishWord, input.english_word.as_ref()) {
            Ok(text) => Some(text),
            Err((value, message)) => {
                report(Field::EnglishWord, &value, message);
                None
            }
        };

        let meaning = match required_text(Field::PersianMeaning, input.meaning.as_ref()) {
            Ok(text) => Some(text),
            Err((value, message)) => {
                report(Field::PersianMeaning, &value, message);
                None
            }
        };

        let example_sentences = match input.example_sentences.as_ref() {
            None => Vec::new(),
            Some(value) => sentences(value).unwrap_or_else(|| {
                report(
                    Field::ExampleSentences,
                    value,
                    "Example sentences must be a string (semicolon-separated) or array of strings"
                        .to_string(),
                );
                Vec::new()
            }),
        };

        let total_attempts = count(input.total_attempts.as_ref());
        if total_attempts.is_none() {
            if let Some(value) = input.total_attempts.as_ref() {
                report(Field::TotalAttempts, value, non_negative_message(Field::TotalAttempts));
            }
        }

        let correct_answers = count(input.correct_answers.as_ref());
        if correct_answers.is_none() {
            if let Some(value) = input.correct_answers.as_ref() {
                report(Field::CorrectAnswers, value, non_negative_message(Field::CorrectAnswers));
            }
        }

        if let (Some(correct), Some(total)) = (correct_answers, total_attempts) {
            if correct > total {
                report(
                    Field::CorrectAnswers,
                    &RawValue::Number(correct.into()),
                    "Correct answers cannot be greater than total attempts".to_string(),
                );
            }
        }

        let created_at = match input.created_at.as_ref() {
            Some(value) if !value.is_blank() => timestamp(value).unwrap_or_else(|| {
                report(
                    Field::CreatedAt,
                    value,
                    "Created date must be a valid ISO date format (e.g., 2024-01-15T10:30:00Z)"
                        .to_string(),
                );
                self.now
            }),
            _ => self.now,
        };

        let entry = match (english_word, meaning) {
            (Some(english_word), Some(meaning)) => Some(VocabularyEntry {
                english_word,
                meaning,
                example_sentences,
                total_attempts: total_attempts.unwrap_or(0),
                correct_answers: correct_answers.unwrap_or(0),
                created_at,
            }),
            _ => None,
        };

        if !errors.is_empty() {
            debug!(
                "Row {}: {} error(s), {}",
                row,
                errors.len(),
                if entry.is_some() { "accepted with defaults" } else { "rejected" }
            );
        }

        RowOutcome { row, entry, errors }
    }
}

fn non_negative_message(field: Field) -> String {
    format!("{} must be a non-negative integer", field.label())
}

/// Checks a required text field, returning the offending value on failure
fn required_text(field: Field, value: Option<&RawValue>) -> Result<String, (RawValue, String)> {
    let required = || format!("{} is required and cannot be empty", field.label());

    match value {
        None => Err((RawValue::text(""), required())),
        Some(RawValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err((RawValue::Text(text.clone()), required()))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(RawValue::Number(n)) => Ok(n.to_string()),
        Some(other) => Err((other.clone(), format!("{} must be a text value", field.label()))),
    }
}

/// Normalizes example sentences; `None` means the value has the wrong type
fn sentences(value: &RawValue) -> Option<Vec<String>> {
    match value {
        RawValue::Null => Some(Vec::new()),
        RawValue::Text(text) => Some(
            text.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        RawValue::List(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    RawValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Parses an attempt counter; absent or blank counts as zero
fn count(value: Option<&RawValue>) -> Option<u32> {
    let value = match value {
        None => return Some(0),
        Some(v) if v.is_blank() => return Some(0),
        Some(v) => v,
    };

    let parsed = match value {
        RawValue::Text(text) => {
            let text = text.trim();
            match text.parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => text.parse::<f64>().ok().and_then(integral),
            }
        }
        RawValue::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
        _ => None,
    };

    parsed.and_then(|n| u32::try_from(n).ok())
}

fn integral(n: f64) -> Option<u64> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

fn timestamp(value: &RawValue) -> Option<DateTime<Utc>> {
    match value {
        RawValue::Text(text) => parse_created_at(text),
        RawValue::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Parses the date formats accepted for `created_at`.
///
/// Accepts RFC 3339, RFC 2822, naive date-times (taken as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_created_at(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
