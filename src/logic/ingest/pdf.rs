//! PDF table sources
//!
//! Extraction yields zero or more independent tables (one per page with
//! text). They are concatenated row-wise and the first row of the result
//! becomes the header.
//!
//! Pages are read from their content streams by text position (see
//! `pdf_runs`); the flat text layer is used only when that yields nothing.

use std::io::Write;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use super::pdf_runs::{runs_from_operations, runs_to_rows};
use super::table::{Cell, Table};
use crate::error::{SentinelError, SentinelResult};

/// Raw extracted table: rows of cell strings, header not yet identified
pub type RawTable = Vec<Vec<String>>;

/// Cell separators in extracted page text: tabs, pipes, or 2+ spaces
static CELL_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\t+|\s*\|\s*|\s{2,}").expect("cell separator pattern is valid")
});

// ============================================================================
// EXTRACTOR TRAIT
// ============================================================================

/// Pulls tables out of a PDF document
pub trait TableExtractor: Send + Sync {
    fn extract_tables(&self, bytes: &[u8]) -> SentinelResult<Vec<RawTable>>;
}

// ============================================================================
// LOPDF IMPLEMENTATION
// ============================================================================

/// Extractor backed by `lopdf`.
///
/// Bytes are staged in a temp file that lives only for the call and is
/// removed on every exit path.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    staging_dir: Option<PathBuf>,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_staging_dir(dir: impl Into<PathBuf>) -> Self {
        Self { staging_dir: Some(dir.into()) }
    }

    fn stage(&self, bytes: &[u8]) -> SentinelResult<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ipdr-upload-").suffix(".pdf");
        let mut staged = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        staged.write_all(bytes)?;
        staged.flush()?;
        Ok(staged)
    }

    fn page_rows(
        doc: &lopdf::Document,
        page_number: u32,
        page_id: lopdf::ObjectId,
    ) -> SentinelResult<RawTable> {
        let positioned = match doc.get_and_decode_page_content(page_id) {
            Ok(content) => runs_to_rows(runs_from_operations(&content.operations)),
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "Page content not decodable");
                Vec::new()
            }
        };
        if !positioned.is_empty() {
            return Ok(positioned);
        }

        let text = doc
            .extract_text(&[page_number])
            .map_err(|e| SentinelError::parse(format!("page {}: {}", page_number, e)))?;
        Ok(text_to_rows(&text))
    }
}

impl TableExtractor for PdfTextExtractor {
    fn extract_tables(&self, bytes: &[u8]) -> SentinelResult<Vec<RawTable>> {
        let staged = self.stage(bytes)?;

        let doc = lopdf::Document::load(staged.path())
            .map_err(|e| SentinelError::parse(format!("unreadable PDF: {}", e)))?;

        let mut tables = Vec::new();
        for (page_number, page_id) in doc.get_pages() {
            let table = Self::page_rows(&doc, page_number, page_id)?;
            if !table.is_empty() {
                tables.push(table);
            }
        }

        tracing::debug!(tables = tables.len(), "Extracted PDF tables");
        Ok(tables)
    }
}

/// Split one line of text into cells
pub(crate) fn split_line(line: &str) -> Vec<String> {
    CELL_SPLIT
        .split(line.trim().trim_matches('|'))
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Split page text into rows of cells
pub fn text_to_rows(text: &str) -> RawTable {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(split_line)
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect()
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Concatenate extracted tables and promote the first row to the header
pub fn tables_to_table(tables: Vec<RawTable>) -> SentinelResult<Table> {
    if tables.is_empty() {
        return Err(SentinelError::parse("No tables found in PDF"));
    }

    let piece_count = tables.len();
    let mut rows = tables.into_iter().flatten();
    let header = rows
        .next()
        .ok_or_else(|| SentinelError::parse("Extracted PDF tables contain no rows"))?;

    let rows: Vec<Vec<String>> = rows.collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(header.len());

    let mut columns: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();
    columns.resize(width, String::new());

    let mut table = Table::with_capacity(columns, rows.len());
    for row in rows {
        table.push_row(row.iter().map(|s| Cell::from_text(s)).collect())?;
    }

    tracing::debug!(pieces = piece_count, rows = table.len(), "Concatenated PDF tables");
    Ok(table)
}

/// Extract and normalize in one step
pub fn parse_pdf(bytes: &[u8], extractor: &dyn TableExtractor) -> SentinelResult<Table> {
    let tables = extractor.extract_tables(bytes)?;
    tables_to_table(tables)
}
