/*!
 * # vocabport - vocabulary import, export and practice
 *
 * A Rust library for bulk-importing English/Persian vocabulary lists.
 *
 * ## Features
 *
 * - Import vocabulary from CSV or JSON files
 * - Accept alternate column names (`word`, `english`, `meaning`, ...)
 * - Collect every row-level problem instead of stopping at the first one
 * - Keep the valid rows of a partially broken file
 * - Store words in SQLite, add, edit or delete them by hand
 * - Quiz on stored words and record practice attempts
 * - Export stored words and generate sample templates
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `ingest`: parse -> normalize -> validate pipeline:
 *   - `ingest::parser`: CSV and JSON tokenizing into raw rows
 *   - `ingest::aliases`: column alias resolution
 *   - `ingest::validator`: per-row schema checks
 *   - `ingest::pipeline`: orchestration and commit policy
 * - `model`: the validated vocabulary entry
 * - `export`: template and export rendering
 * - `store`: SQLite word store behind the `WordStore` trait
 * - `practice`: quiz questions and answer checking
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod ingest;
pub mod model;
pub mod export;
pub mod store;
pub mod practice;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, FormatError, ImportRejected, StoreError};
pub use ingest::{ingest, DataFormat, ImportPolicy, IngestPipeline, IngestReport, ValidationError};
pub use model::VocabularyEntry;
pub use store::{WordRepository, WordStore};
