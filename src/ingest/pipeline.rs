/*!
 * Ingestion pipeline orchestrator.
 *
 * Runs parse -> normalize -> validate over every row and aggregates the
 * results. A file-level [`FormatError`] aborts before any row is looked at;
 * row-level problems are collected and never stop the run.
 */

use chrono::{DateTime, Utc};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::{FormatError, ImportRejected};
use crate::model::VocabularyEntry;

use super::aliases::normalize;
use super::parser::{parse_rows, CsvMode, DataFormat};
use super::validator::{RowOutcome, RowValidator, ValidationError};
use super::value::RawRow;

/// What to do with a report that has validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Refuse to commit while any validation error is present
    #[default]
    BlockOnErrors,
    /// Commit the accepted rows and ignore the rest
    AcceptValid,
}

/// Pipeline tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// CSV tokenizer
    #[serde(default)]
    pub csv_mode: CsvMode,

    /// Row count from which validation runs on the rayon pool
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize {
    5000
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            csv_mode: CsvMode::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

/// Aggregated outcome of one ingest call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    /// Accepted entries, in input order
    pub accepted: Vec<VocabularyEntry>,
    /// Every validation error, ordered by row
    pub errors: Vec<ValidationError>,
    /// Number of data rows examined
    pub total_rows: usize,
}

impl IngestReport {
    fn from_outcomes(outcomes: Vec<RowOutcome>) -> Self {
        let total_rows = outcomes.len();
        let mut accepted = Vec::new();
        let mut errors = Vec::new();

        for outcome in outcomes {
            errors.extend(outcome.errors);
            if let Some(entry) = outcome.entry {
                accepted.push(entry);
            }
        }

        Self {
            accepted,
            errors,
            total_rows,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of rows left out of `accepted`
    pub fn rejected_count(&self) -> usize {
        self.total_rows - self.accepted.len()
    }

    /// Row numbers with at least one error
    pub fn rows_with_errors(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|e| e.row).collect()
    }

    /// Errors reported for one row
    pub fn errors_for_row(&self, row: usize) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.row == row).collect()
    }

    /// Entries to commit under the given policy
    pub fn entries_for_commit(&self, policy: ImportPolicy) -> Result<&[VocabularyEntry], ImportRejected> {
        if policy == ImportPolicy::BlockOnErrors && self.has_errors() {
            return Err(ImportRejected::ValidationFailed {
                error_count: self.errors.len(),
            });
        }

        if self.accepted.is_empty() {
            return Err(ImportRejected::NothingToImport);
        }

        Ok(&self.accepted)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "Import: {}/{} rows accepted, {} rejected, {} validation error(s)",
            self.accepted.len(),
            self.total_rows,
            self.rejected_count(),
            self.errors.len()
        )
    }
}

/// Bulk import pipeline for vocabulary files
#[derive(Debug, Clone, Default)]
pub struct IngestPipeline {
    options: PipelineOptions,
}

impl IngestPipeline {
    /// Create a pipeline with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom options
    pub fn with_options(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Ingest file bytes, stamping undated rows with the current time
    pub fn ingest(&self, bytes: &[u8], format: DataFormat) -> Result<IngestReport, FormatError> {
        self.ingest_at(bytes, format, Utc::now())
    }

    /// Ingest file bytes with an explicit default timestamp
    pub fn ingest_at(
        &self,
        bytes: &[u8],
        format: DataFormat,
        now: DateTime<Utc>,
    ) -> Result<IngestReport, FormatError> {
        let rows = parse_rows(bytes, format, self.options.csv_mode)?;
        let report = self.validate_rows(&rows, now);

        info!("{}", report.summary());
        Ok(report)
    }

    /// Validate already-parsed rows
    pub fn validate_rows(&self, rows: &[RawRow], now: DateTime<Utc>) -> IngestReport {
        let validator = RowValidator::new(now);
        let check = |(index, row): (usize, &RawRow)| validator.validate(index + 1, &normalize(row));

        let outcomes: Vec<RowOutcome> = if rows.len() >= self.options.parallel_threshold {
            debug!("Validating {} rows in parallel", rows.len());
            // Indexed collect keeps input order
            rows.par_iter().enumerate().map(check).collect()
        } else {
            rows.iter().enumerate().map(check).collect()
        };

        IngestReport::from_outcomes(outcomes)
    }
}

/// Ingest with default options
pub fn ingest(bytes: &[u8], format: DataFormat) -> Result<IngestReport, FormatError> {
    IngestPipeline::new().ingest(bytes, format)
}
