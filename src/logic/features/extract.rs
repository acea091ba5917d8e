//! Table → feature matrix
//!
//! Pure and order-preserving: row `i` of the output is row `i` of the
//! table. Any bad value fails the whole batch.

use super::access::{encode_access_type, UNMAPPED};
use super::timestamp::SessionTime;
use super::vector::{FeatureMatrix, FeatureVector, FeatureVectorBuilder};
use crate::constants::REQUIRED_COLUMNS;
use crate::error::{SentinelError, SentinelResult};
use crate::logic::ingest::{Cell, Table};

struct Columns {
    start: usize,
    end: usize,
    uplink: usize,
    downlink: usize,
    access_type: usize,
}

impl Columns {
    fn locate(table: &Table) -> SentinelResult<Self> {
        table.require_columns(REQUIRED_COLUMNS)?;
        let idx = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| SentinelError::MissingColumns(vec![name.to_string()]))
        };
        Ok(Self {
            start: idx("startTime")?,
            end: idx("endTime")?,
            uplink: idx("uplinkVolume")?,
            downlink: idx("downlinkVolume")?,
            access_type: idx("accessType")?,
        })
    }
}

pub fn extract_features(table: &Table) -> SentinelResult<FeatureMatrix> {
    let cols = Columns::locate(table)?;

    let mut vectors = Vec::with_capacity(table.len());
    for (row_idx, row) in table.rows().iter().enumerate() {
        vectors.push(extract_row(row, row_idx, &cols)?);
    }

    Ok(FeatureMatrix::from_vectors(&vectors))
}

fn extract_row(row: &[Cell], row_idx: usize, cols: &Columns) -> SentinelResult<FeatureVector> {
    let start = parse_time(&row[cols.start], row_idx, "startTime")?;
    let end = parse_time(&row[cols.end], row_idx, "endTime")?;

    Ok(FeatureVectorBuilder::new()
        .duration(start.seconds_until(&end))
        .uplink_volume(parse_volume(&row[cols.uplink], row_idx, "uplinkVolume")?)
        .downlink_volume(parse_volume(&row[cols.downlink], row_idx, "downlinkVolume")?)
        .hour_of_day(start.hour())
        .access_type_encoded(encode_cell(&row[cols.access_type]))
        .build())
}

fn parse_time(cell: &Cell, row_idx: usize, column: &str) -> SentinelResult<SessionTime> {
    match cell {
        Cell::Text(raw) => SessionTime::parse(raw).ok_or_else(|| {
            SentinelError::parse(format!(
                "row {}: {} {:?} is not a timestamp",
                row_idx, column, raw
            ))
        }),
        Cell::Number(n) => Err(SentinelError::parse(format!(
            "row {}: {} is numeric ({}), expected timestamp text",
            row_idx, column, n
        ))),
        Cell::Null => Err(SentinelError::parse(format!(
            "row {}: {} is empty",
            row_idx, column
        ))),
    }
}

fn parse_volume(cell: &Cell, row_idx: usize, column: &str) -> SentinelResult<f64> {
    if cell.is_null() {
        return Err(SentinelError::validation(format!(
            "row {}: {} is missing",
            row_idx, column
        )));
    }
    cell.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
        SentinelError::validation(format!(
            "row {}: {} {:?} is not numeric",
            row_idx,
            column,
            cell.as_text().unwrap_or_default()
        ))
    })
}

fn encode_cell(cell: &Cell) -> i32 {
    match cell {
        Cell::Text(label) => encode_access_type(label),
        Cell::Number(_) | Cell::Null => UNMAPPED,
    }
}
