//! Delimited text (CSV) sources

use csv::{ReaderBuilder, Trim};

use super::table::{Cell, Table};
use crate::error::{SentinelError, SentinelResult};

/// Parse comma-delimited text with a header row
pub fn parse_delimited(bytes: &[u8]) -> SentinelResult<Table> {
    parse_with_delimiter(bytes, b',')
}

pub fn parse_with_delimiter(bytes: &[u8], delimiter: u8) -> SentinelResult<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(SentinelError::parse("delimited text has no header row"));
    }

    let mut table = Table::new(headers);
    for result in rdr.records() {
        let record = result?;
        let row = record.iter().map(Cell::from_text).collect();
        table.push_row(row)?;
    }

    tracing::debug!(rows = table.len(), columns = table.columns().len(), "Parsed delimited source");
    Ok(table)
}
