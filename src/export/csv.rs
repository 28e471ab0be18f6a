//! Delimited-text exporter
//!
//! Standard comma-separated values: header row first, no index column,
//! every cell rendered as its string representation.

use csv::WriterBuilder;

use crate::error::{Result, SieveError};
use crate::table::Table;

/// Serializes the table as csv bytes
pub(super) fn write(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(table.columns())
        .map_err(SieveError::from)?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        writer.write_record(&record).map_err(SieveError::from)?;
    }

    writer
        .into_inner()
        .map_err(|e| SieveError::Io(std::io::Error::other(e.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_table;

    #[test]
    fn test_csv_header_and_rows() {
        let bytes = write(&sample_table()).expect("csv export succeeds");
        let text = String::from_utf8(bytes).expect("csv output is utf-8");
        assert_eq!(text, "Name,Dept\nAl,Eng\nBo,Sales\nCy,Eng\n");
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        use crate::table::{Cell, Table};

        let table = Table::new(
            vec!["Note".to_string()],
            vec![vec![Cell::Text("a, b".into())]],
        )
        .unwrap();
        let bytes = write(&table).unwrap();
        assert_eq!(bytes, b"Note\n\"a, b\"\n");
    }
}
