/*!
 * Format parsers turning file bytes into raw rows.
 *
 * Two CSV tokenizers are available. The naive one splits lines on `\n` and
 * cells on `,`, exactly like the files the web app exports; it does not
 * understand commas or quotes embedded inside quoted fields. The quote-aware
 * one follows RFC 4180 and is opt-in.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::FormatError;

use super::value::{RawRow, RawValue};

/// Supported file formats for import, export and templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Csv,
    Json,
}

impl DataFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// MIME type used when the file is offered for download
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    /// Resolves the format from a file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| FormatError::UnsupportedFileType(path.display().to_string()))
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for DataFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(FormatError::UnsupportedFileType(other.to_string())),
        }
    }
}

/// How CSV text is split into cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CsvMode {
    /// Split on `,` and strip surrounding quotes; embedded commas are not supported
    #[default]
    Naive,
    /// RFC 4180 tokenizer
    QuoteAware,
}

/// Parses file bytes into rows according to the declared format
pub fn parse_rows(bytes: &[u8], format: DataFormat, csv_mode: CsvMode) -> Result<Vec<RawRow>, FormatError> {
    let text = decode(bytes)?;

    let rows = match format {
        DataFormat::Csv => match csv_mode {
            CsvMode::Naive => parse_csv_naive(text)?,
            CsvMode::QuoteAware => parse_csv_quoted(text)?,
        },
        DataFormat::Json => parse_json(text)?,
    };

    debug!("Parsed {} {} row(s)", rows.len(), format);
    Ok(rows)
}

/// Decodes UTF-8, skipping a byte order mark
fn decode(bytes: &[u8]) -> Result<&str, FormatError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| FormatError::Encoding(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(FormatError::EmptyFile);
    }

    Ok(text)
}

fn unquote(cell: &str) -> String {
    cell.trim().trim_matches('"').to_string()
}

/// Builds a row by zipping header names with positional values
fn zip_row<S: AsRef<str>>(headers: &[String], values: &[S]) -> RawRow {
    let mut row = RawRow::new();
    for (index, header) in headers.iter().enumerate() {
        let value = values.get(index).map(|v| v.as_ref()).unwrap_or("");
        row.insert(header, RawValue::text(value));
    }
    row
}

fn parse_csv_naive(text: &str) -> Result<Vec<RawRow>, FormatError> {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(FormatError::MissingRows);
    }

    let headers: Vec<String> = lines[0].split(',').map(unquote).collect();

    Ok(lines[1..]
        .iter()
        .map(|line| {
            let values: Vec<String> = line.split(',').map(unquote).collect();
            zip_row(&headers, &values)
        })
        .collect())
}

fn parse_csv_quoted(text: &str) -> Result<Vec<RawRow>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FormatError::Csv(e.to_string()))?;
        // A blank or whitespace-only line; `,` is still a data row
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }
        records.push(record);
    }

    if records.len() < 2 {
        return Err(FormatError::MissingRows);
    }

    let headers: Vec<String> = records[0].iter().map(|h| h.to_string()).collect();

    Ok(records[1..]
        .iter()
        .map(|record| {
            let values: Vec<&str> = record.iter().collect();
            zip_row(&headers, &values)
        })
        .collect())
}

fn parse_json(text: &str) -> Result<Vec<RawRow>, FormatError> {
    let value: Value = serde_json::from_str(text).map_err(|e| FormatError::Json(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(FormatError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(RawRow::from(map)),
            _ => Err(FormatError::NotAnObject { index: index + 1 }),
        })
        .collect()
}
