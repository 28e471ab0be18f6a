//! Line-delimited JSON exporter
//!
//! One JSON object per row, one row per line. This is deliberately a
//! record stream, not a single pretty-printed JSON array: each line stands
//! alone and the output can be consumed incrementally. Key order follows
//! column order.

use serde_json::{Map, Number, Value};

use crate::error::{Result, SieveError};
use crate::table::{Cell, Table};

/// Serializes the table as newline-delimited JSON records
pub(super) fn write(table: &Table) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for row in table.rows() {
        let mut record = Map::with_capacity(table.column_count());
        for (column, cell) in table.columns().iter().zip(row) {
            record.insert(column.clone(), cell_value(cell));
        }
        let line = serde_json::to_vec(&Value::Object(record)).map_err(SieveError::from)?;
        out.extend_from_slice(&line);
        out.push(b'\n');
    }
    Ok(out)
}

/// Maps a cell to its JSON representation
///
/// Text stays a string, numbers stay numbers, empty cells become null.
fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Number(n) => Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Empty => Value::Null,
    }
}
