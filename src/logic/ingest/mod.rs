//! Ingest Module - Source normalization
//!
//! Every supported source kind has its own normalizer; all of them converge
//! on the canonical [`Table`]. New source kinds are new [`RawSource`]
//! variants, never branches inside feature extraction.

pub mod table;
pub mod delimited;
pub mod json;
pub mod pdf;
pub mod pdf_runs;
pub mod record;


use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{SentinelError, SentinelResult};

pub use pdf::{PdfTextExtractor, RawTable, TableExtractor};
pub use record::IpdrRecord;
pub use table::{Cell, Table};

// ============================================================================
// SOURCE KINDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    DelimitedText,
    JsonArray,
    PdfTable,
}

impl SourceKind {
    /// Detect kind from an upload's file name extension
    pub fn from_file_name(name: &str) -> SentinelResult<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        ext.parse()
            .map_err(|_| SentinelError::UnsupportedFormat(name.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::DelimitedText => "csv",
            SourceKind::JsonArray => "json",
            SourceKind::PdfTable => "pdf",
        }
    }
}

impl FromStr for SourceKind {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "delimited" | "delimited-text" => Ok(SourceKind::DelimitedText),
            "json" | "json-array" => Ok(SourceKind::JsonArray),
            "pdf" | "pdf-table" => Ok(SourceKind::PdfTable),
            other => Err(SentinelError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RAW SOURCE
// ============================================================================

/// Uploaded bytes tagged with their source kind
#[derive(Debug, Clone)]
pub enum RawSource {
    DelimitedText(Vec<u8>),
    JsonArray(Vec<u8>),
    PdfTable(Vec<u8>),
}

impl RawSource {
    pub fn new(kind: SourceKind, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        match kind {
            SourceKind::DelimitedText => RawSource::DelimitedText(bytes),
            SourceKind::JsonArray => RawSource::JsonArray(bytes),
            SourceKind::PdfTable => RawSource::PdfTable(bytes),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            RawSource::DelimitedText(_) => SourceKind::DelimitedText,
            RawSource::JsonArray(_) => SourceKind::JsonArray,
            RawSource::PdfTable(_) => SourceKind::PdfTable,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            RawSource::DelimitedText(b) | RawSource::JsonArray(b) | RawSource::PdfTable(b) => b,
        }
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize any source into the canonical table and check required columns
pub fn normalize(source: &RawSource, extractor: &dyn TableExtractor) -> SentinelResult<Table> {
    let table = match source {
        RawSource::DelimitedText(bytes) => delimited::parse_delimited(bytes)?,
        RawSource::JsonArray(bytes) => json::parse_json_array(bytes)?,
        RawSource::PdfTable(bytes) => pdf::parse_pdf(bytes, extractor)?,
    };

    // `[]` carries no keys at all; it is an empty batch, not a malformed one
    let keyless_empty = table.is_empty() && table.columns().is_empty();
    if !keyless_empty {
        table.require_columns(REQUIRED_COLUMNS)?;
    }

    tracing::debug!(kind = %source.kind(), rows = table.len(), "Normalized source");
    Ok(table)
}

/// Typed records into the canonical table
pub fn records_to_table(records: &[IpdrRecord]) -> SentinelResult<Table> {
    let value = serde_json::to_value(records)?;
    json::table_from_value(value)
}

/// Read a baseline corpus (JSON array of records) from disk
pub fn load_baseline_corpus(path: &Path) -> SentinelResult<Table> {
    let bytes = std::fs::read(path)?;
    let table = json::parse_json_array(&bytes)?;
    table.require_columns(REQUIRED_COLUMNS)?;

    tracing::info!(path = %path.display(), records = table.len(), "Loaded baseline corpus");
    Ok(table)
}
