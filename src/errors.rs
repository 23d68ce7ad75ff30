/*!
 * Error types for the vocabport application.
 *
 * File-level import failures, commit-policy refusals and store failures each
 * get their own enum, using the thiserror crate for ergonomic definitions.
 * Row-level validation problems are not errors in this sense: they are
 * collected as data in [`crate::ingest::ValidationError`].
 */

use thiserror::Error;

/// Fatal, file-level errors raised before any row is validated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// File type could not be recognized as CSV or JSON
    #[error("Unsupported file type: {0} (expected .csv or .json)")]
    UnsupportedFileType(String),

    /// File has no content
    #[error("File is empty")]
    EmptyFile,

    /// File bytes are not valid UTF-8
    #[error("File is not valid UTF-8 text: {0}")]
    Encoding(String),

    /// CSV file lacks a header row or any data row
    #[error("CSV file must have at least a header row and one data row")]
    MissingRows,

    /// CSV tokenizer failure (quote-aware mode only)
    #[error("Invalid CSV: {0}")]
    Csv(String),

    /// JSON could not be parsed
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// JSON root is not an array
    #[error("Invalid JSON: expected an array of vocabulary objects")]
    NotAnArray,

    /// JSON array element is not an object
    #[error("Invalid JSON: element {index} is not a vocabulary object")]
    NotAnObject {
        /// 1-based position of the element in the array
        index: usize,
    },
}

/// Refusals raised when a report is not committable under the chosen policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportRejected {
    /// Validation errors block the import
    #[error("Found {error_count} validation error(s); fix them before importing")]
    ValidationFailed {
        /// Number of collected validation errors
        error_count: usize,
    },

    /// No row passed the required-field checks
    #[error("No valid words found in the file")]
    NothingToImport,
}

/// Errors reported by a word store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write failed as a whole and was rolled back
    #[error("Write rolled back: {0}")]
    Batch(String),

    /// A hand-entered word is missing its English word or meaning
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    /// The referenced word does not exist for this owner
    #[error("Word not found: {0}")]
    NotFound(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// File-level import error
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Import refused by the commit policy
    #[error("Import rejected: {0}")]
    Rejected(#[from] ImportRejected),

    /// Error from the word store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}
