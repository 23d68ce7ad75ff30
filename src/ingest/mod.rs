/*!
 * Bulk vocabulary import.
 *
 * This module turns a user-supplied CSV or JSON file into validated
 * vocabulary entries plus an itemized list of row-level problems:
 * - `parser`: format-specific tokenizing into raw rows
 * - `aliases`: alternate column names mapped to canonical fields
 * - `validator`: per-row schema checks with degrade-and-continue semantics
 * - `pipeline`: orchestration, aggregation and commit policy
 * - `value`: the untyped value model shared by all stages
 */

pub mod value;
pub mod parser;
pub mod aliases;
pub mod validator;
pub mod pipeline;

// Re-export main types
pub use aliases::Field;
pub use parser::{CsvMode, DataFormat};
pub use pipeline::{ingest, ImportPolicy, IngestPipeline, IngestReport, PipelineOptions};
pub use validator::{ValidationError, RowValidator};
pub use value::{RawRow, RawValue};
