//! Table exporters
//!
//! Serializes a [`Table`] into one of the three downloadable formats:
//! styled xlsx, csv, or line-delimited JSON records. Each format lives in
//! its own submodule; this module owns the [`ExportFormat`] token and the
//! dispatching [`export`] entry point.

mod csv;
mod json;
mod xlsx;

use std::fmt;

use crate::error::{Result, SieveError};
use crate::table::Table;

/// Output format chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Spreadsheet with header styling and auto-sized columns
    Xlsx,
    /// Comma-separated values with a header row
    Csv,
    /// One JSON object per row, newline-delimited
    Json,
}

impl ExportFormat {
    /// All formats, in the order they are offered to the user
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json];

    /// Parses a format token (`xlsx`, `csv`, `json`)
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::UnsupportedFormat`] for any other token.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetsieve::export::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::parse_token("csv").unwrap(), ExportFormat::Csv);
    /// assert!(ExportFormat::parse_token("pdf").is_err());
    /// ```
    pub fn parse_token(token: &str) -> Result<Self> {
        match token {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(SieveError::UnsupportedFormat(other.to_string()).into()),
        }
    }

    /// The token used in callback data and as the output file extension
    pub fn token(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Button label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Xlsx => "📄 Excel (.xlsx)",
            Self::Csv => "📄 CSV",
            Self::Json => "📄 JSON",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Serializes a table into the chosen format
///
/// # Examples
///
/// ```
/// use sheetsieve::export::{export, ExportFormat};
/// use sheetsieve::table::{Cell, Table};
///
/// let table = Table::new(
///     vec!["Name".to_string()],
///     vec![vec![Cell::Text("Al".into())]],
/// )
/// .unwrap();
/// let bytes = export(&table, ExportFormat::Csv).unwrap();
/// assert_eq!(bytes, b"Name\nAl\n");
/// ```
pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Xlsx => xlsx::write(table)?,
        ExportFormat::Csv => csv::write(table)?,
        ExportFormat::Json => json::write(table)?,
    };
    tracing::debug!(
        format = %format,
        rows = table.row_count(),
        bytes = bytes.len(),
        "Exported table"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_table;

    #[test]
    fn test_parse_token_round_trip() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::parse_token(format.token()).unwrap(), format);
        }
    }

    #[test]
    fn test_parse_token_rejects_unknown() {
        let err = ExportFormat::parse_token("parquet").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported export format: parquet");
    }

    #[test]
    fn test_export_produces_bytes_for_all_formats() {
        let table = sample_table();
        for format in ExportFormat::ALL {
            let bytes = export(&table, format).expect("export succeeds");
            assert!(!bytes.is_empty(), "{} export was empty", format);
        }
    }
}
