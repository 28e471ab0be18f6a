//! In-memory tabular store
//!
//! This module defines the [`Table`] type used throughout the application:
//! an ordered set of named columns with rows of scalar cells, loaded from
//! an uploaded spreadsheet and queried by the selection flow.
//!
//! Loading from xlsx bytes lives in the [`xlsx`] submodule; csv ingestion
//! (the inverse of the csv exporter) is provided here directly.

pub mod xlsx;

use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, SieveError};

/// Maximum number of distinct values offered for selection per column
///
/// This is a hardcoded presentation cap: columns with more distinct values
/// silently truncate the offered choices.
pub const MAX_VALUE_CHOICES: usize = 20;

/// A single scalar cell value
///
/// Numeric and date formatting is pass-through: a cell renders as its
/// string representation and no further coercion rules apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Textual value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Missing or blank cell
    Empty,
}

impl Cell {
    /// Returns true if the cell holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Integral floats in i64 range render without the trailing
            // ".0" so exported text matches what a user sees in the sheet.
            // Larger magnitudes would saturate the cast, so they keep the
            // plain float rendering.
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e18 => {
                write!(f, "{}", *n as i64)
            }
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => Ok(()),
        }
    }
}

/// An in-memory columnar dataset with named columns and aligned rows
///
/// Invariant: every row has exactly `columns().len()` cells. Construction
/// through [`Table::new`] enforces this; the ingestion paths pad or reject
/// as appropriate.
///
/// # Examples
///
/// ```
/// use sheetsieve::table::{Cell, Table};
///
/// let table = Table::new(
///     vec!["Name".to_string(), "Dept".to_string()],
///     vec![
///         vec![Cell::Text("Al".into()), Cell::Text("Eng".into())],
///         vec![Cell::Text("Bo".into()), Cell::Text("Sales".into())],
///     ],
/// )
/// .unwrap();
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.columns(), ["Name", "Dept"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table from column names and rows
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::Parse`] if any row's width differs from the
    /// number of columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(SieveError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                ))
                .into());
            }
        }
        Ok(Self { columns, rows })
    }

    /// Ordered column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows, aligned with [`Table::columns`]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Resolves a column name to its positional index
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Parses csv bytes into a table
    ///
    /// The first record is the header row; every cell is ingested as text.
    /// This is the inverse of the csv exporter and is what makes the
    /// export/re-ingest round trip testable.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(SieveError::from)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(SieveError::from)?;
            let row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    /// Distinct non-empty values of a column, as strings, in first-seen order
    ///
    /// At most [`MAX_VALUE_CHOICES`] values are returned; columns with more
    /// distinct values silently truncate the offered choices.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::MissingColumn`] if the column does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetsieve::table::{Cell, Table};
    ///
    /// let table = Table::new(
    ///     vec!["Dept".to_string()],
    ///     vec![
    ///         vec![Cell::Text("Eng".into())],
    ///         vec![Cell::Text("Sales".into())],
    ///         vec![Cell::Text("Eng".into())],
    ///     ],
    /// )
    /// .unwrap();
    /// let values = table.unique_values("Dept").unwrap();
    /// assert_eq!(values, vec!["Eng".to_string(), "Sales".to_string()]);
    /// ```
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| SieveError::MissingColumn(column.to_string()))?;

        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in &self.rows {
            let cell = &row[idx];
            if cell.is_empty() {
                continue;
            }
            let text = cell.to_string();
            if seen.insert(text.clone()) {
                values.push(text);
                if values.len() == MAX_VALUE_CHOICES {
                    break;
                }
            }
        }
        Ok(values)
    }

    /// Returns the rows whose stringified value in `column` is in `values`
    ///
    /// Row order is preserved from the source table.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::EmptySelection`] if `values` is empty (callers
    /// are expected to prevent this case) and [`SieveError::MissingColumn`]
    /// if the column does not exist.
    pub fn filter(&self, column: &str, values: &[String]) -> Result<Self> {
        if values.is_empty() {
            return Err(SieveError::EmptySelection.into());
        }
        let idx = self
            .column_index(column)
            .ok_or_else(|| SieveError::MissingColumn(column.to_string()))?;

        let wanted: HashSet<&str> = values.iter().map(|v| v.as_str()).collect();
        let rows: Vec<Vec<Cell>> = self
            .rows
            .iter()
            .filter(|row| wanted.contains(row[idx].to_string().as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            column = %column,
            selected = values.len(),
            matched = rows.len(),
            "Filtered table"
        );

        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }
}
