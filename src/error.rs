//! Error types for Sheetsieve
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Sheetsieve operations
///
/// This enum encompasses all possible errors that can occur while loading
/// spreadsheets, driving the selection flow, and exporting filtered data.
#[derive(Error, Debug)]
pub enum SieveError {
    /// Uploaded file does not carry the accepted `.xlsx` extension
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    /// Spreadsheet bytes could not be parsed into a table
    #[error("Parse error: {0}")]
    Parse(String),

    /// A filter was requested with an empty value selection
    #[error("Cannot filter with an empty value selection")]
    EmptySelection,

    /// An event referenced a session or session field that does not exist
    ///
    /// Indicates an out-of-order or stale interaction, e.g. a format tap
    /// arriving before any filtered table was computed.
    #[error("No active session state for this action: {0}")]
    MissingSession(String),

    /// A column name was not found in the loaded table
    #[error("Unknown column: {0}")]
    MissingColumn(String),

    /// Unknown export format token
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// ZIP container errors while reading or writing xlsx packages
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias for Sheetsieve operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file_type_display() {
        let error = SieveError::InvalidFileType("report.txt".to_string());
        assert_eq!(error.to_string(), "Invalid file type: report.txt");
    }

    #[test]
    fn test_parse_error_display() {
        let error = SieveError::Parse("missing worksheet part".to_string());
        assert_eq!(error.to_string(), "Parse error: missing worksheet part");
    }

    #[test]
    fn test_empty_selection_display() {
        let error = SieveError::EmptySelection;
        assert_eq!(
            error.to_string(),
            "Cannot filter with an empty value selection"
        );
    }

    #[test]
    fn test_missing_session_display() {
        let error = SieveError::MissingSession("format choice".to_string());
        assert_eq!(
            error.to_string(),
            "No active session state for this action: format choice"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let error = SieveError::MissingColumn("Dept".to_string());
        assert_eq!(error.to_string(), "Unknown column: Dept");
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = SieveError::UnsupportedFormat("pdf".to_string());
        assert_eq!(error.to_string(), "Unsupported export format: pdf");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SieveError = io_error.into();
        assert!(matches!(error, SieveError::Io(_)));
    }
}
