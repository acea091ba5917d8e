//! JSON array-of-records sources

use serde_json::{Map, Value};

use super::table::{Cell, Table};
use crate::error::{SentinelError, SentinelResult};

/// Parse a JSON array of record objects
pub fn parse_json_array(bytes: &[u8]) -> SentinelResult<Table> {
    let value: Value = serde_json::from_slice(bytes)?;
    table_from_value(value)
}

/// Build a table from an already-decoded JSON value.
/// Columns are the union of record keys in first-seen order.
pub fn table_from_value(value: Value) -> SentinelResult<Table> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SentinelError::parse(format!(
                "Expected a list of records, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut records: Vec<Map<String, Value>> = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => {
                return Err(SentinelError::parse(format!(
                    "record {} is {}, expected an object",
                    idx,
                    kind_of(&other)
                )))
            }
        }
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::with_capacity(columns.clone(), records.len());
    for mut record in records {
        let row = columns
            .iter()
            .map(|col| record.remove(col).map(cell_from_value).unwrap_or(Cell::Null))
            .collect();
        table.push_row(row)?;
    }

    tracing::debug!(rows = table.len(), columns = table.columns().len(), "Parsed JSON source");
    Ok(table)
}

fn cell_from_value(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        Value::String(s) => Cell::from_text(&s),
        Value::Bool(b) => Cell::Text(b.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Cell::Text(nested.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
