//! XLSX ingestion
//!
//! Parses the bytes of an uploaded `.xlsx` file into a [`Table`]. An xlsx
//! file is a ZIP package of OOXML parts; this reader resolves the shared
//! strings part and the first worksheet, and treats worksheet row 1 as the
//! header row.
//!
//! Only the subset of SpreadsheetML this bot needs is handled: shared
//! strings (`t="s"`), formula string results (`t="str"`), inline strings
//! (`t="inlineStr"`), booleans (`t="b"`) and plain numeric cells. Cell
//! styling, formulas, and additional worksheets are ignored.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Result, SieveError};
use crate::table::{Cell, Table};

impl Table {
    /// Parses xlsx bytes into a table
    ///
    /// The first worksheet is used; its first row becomes the column names
    /// and every following row becomes a data row, padded with empty cells
    /// to the header width.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::Parse`] if the bytes are not a readable xlsx
    /// package or the worksheet is empty.
    pub fn from_xlsx(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| SieveError::Parse(format!("not a valid xlsx package: {}", e)))?;

        let shared = match read_part(&mut archive, "xl/sharedStrings.xml")? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let sheet_path = first_worksheet_path(&archive).ok_or_else(|| {
            SieveError::Parse("xlsx package contains no worksheet".to_string())
        })?;
        let sheet_xml = read_part(&mut archive, &sheet_path)?
            .ok_or_else(|| SieveError::Parse(format!("missing worksheet part {}", sheet_path)))?;

        let raw_rows = parse_worksheet(&sheet_xml, &shared)?;
        table_from_raw_rows(raw_rows)
    }
}

/// Reads one named part of the package as UTF-8 text, if present
fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .map_err(|e| SieveError::Parse(format!("unreadable part {}: {}", name, e)))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(SieveError::Parse(format!("bad xlsx package: {}", e)).into()),
    }
}

/// Locates the first worksheet part by name
///
/// Worksheet parts are conventionally `xl/worksheets/sheetN.xml`; the
/// lowest-numbered one is taken as the first sheet. The sort is numeric,
/// so `sheet2.xml` precedes `sheet10.xml`.
fn first_worksheet_path(archive: &ZipArchive<Cursor<&[u8]>>) -> Option<String> {
    archive
        .file_names()
        .filter(|name| name.starts_with("xl/worksheets/sheet") && name.ends_with(".xml"))
        .min_by_key(|name| sheet_number(name).unwrap_or(u32::MAX))
        .map(|name| name.to_string())
}

/// Extracts N from a `xl/worksheets/sheetN.xml` part name
fn sheet_number(name: &str) -> Option<u32> {
    name.strip_prefix("xl/worksheets/sheet")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Parses `xl/sharedStrings.xml` into an ordered string table
///
/// Rich-text runs inside one `<si>` are concatenated, matching how Excel
/// renders them as a single cell text.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_text = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_text => {
                current.push_str(
                    &t.unescape()
                        .map_err(|e| SieveError::Parse(format!("bad shared string: {}", e)))?,
                );
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SieveError::Parse(format!("bad sharedStrings part: {}", e)).into());
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// One parsed cell: zero-based column index plus its value
type RawCell = (usize, Cell);

/// Parses a worksheet part into rows of positioned cells
fn parse_worksheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<RawCell>>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    let mut row: Vec<RawCell> = Vec::new();
    let mut in_sheet_data = false;

    // State of the cell currently being read
    let mut col: usize = 0;
    let mut cell_type: Vec<u8> = Vec::new();
    let mut in_value = false;
    let mut in_inline_text = false;
    let mut value = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = true,
                b"row" if in_sheet_data => row.clear(),
                b"c" if in_sheet_data => {
                    // Default position: one past the previous cell, so
                    // sheets without explicit references still line up.
                    col = row.last().map(|(idx, _)| idx + 1).unwrap_or(0);
                    cell_type.clear();
                    value.clear();
                    for attr in e.attributes() {
                        let attr = attr
                            .map_err(|e| SieveError::Parse(format!("bad cell attribute: {}", e)))?;
                        match attr.key.as_ref() {
                            b"r" => {
                                if let Some(idx) = column_of_reference(&attr.value) {
                                    col = idx;
                                }
                            }
                            b"t" => cell_type = attr.value.to_vec(),
                            _ => {}
                        }
                    }
                }
                b"v" => in_value = true,
                b"t" if cell_type == b"inlineStr" => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_value || in_inline_text => {
                value.push_str(
                    &t.unescape()
                        .map_err(|e| SieveError::Parse(format!("bad cell value: {}", e)))?,
                );
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" if in_sheet_data => {
                    row.push((col, decode_cell(&cell_type, &value, shared)?));
                }
                b"row" if in_sheet_data => rows.push(std::mem::take(&mut row)),
                b"sheetData" => in_sheet_data = false,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"row" && in_sheet_data => {
                rows.push(Vec::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SieveError::Parse(format!("bad worksheet part: {}", e)).into());
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

/// Decodes one cell given its `t` attribute and collected text
fn decode_cell(cell_type: &[u8], value: &str, shared: &[String]) -> Result<Cell> {
    if value.is_empty() && cell_type != b"inlineStr" {
        return Ok(Cell::Empty);
    }
    match cell_type {
        b"s" => {
            let idx: usize = value
                .trim()
                .parse()
                .map_err(|_| SieveError::Parse(format!("bad shared string index {}", value)))?;
            let text = shared
                .get(idx)
                .ok_or_else(|| SieveError::Parse(format!("shared string {} out of range", idx)))?;
            Ok(Cell::Text(text.clone()))
        }
        b"str" | b"inlineStr" => {
            if value.is_empty() {
                Ok(Cell::Empty)
            } else {
                Ok(Cell::Text(value.to_string()))
            }
        }
        b"b" => Ok(Cell::Text(
            if value.trim() == "1" { "TRUE" } else { "FALSE" }.to_string(),
        )),
        _ => match value.trim().parse::<f64>() {
            Ok(n) => Ok(Cell::Number(n)),
            // Lenient fallback: keep unrecognized content as text rather
            // than rejecting the whole sheet.
            Err(_) => Ok(Cell::Text(value.to_string())),
        },
    }
}

/// Extracts the zero-based column index from an A1-style cell reference
///
/// `A1` -> 0, `B7` -> 1, `AA3` -> 26. Returns None if the reference has no
/// leading letters.
fn column_of_reference(reference: &[u8]) -> Option<usize> {
    let mut col: usize = 0;
    let mut seen_letter = false;
    for &b in reference {
        match b {
            b'A'..=b'Z' => {
                col = col * 26 + (b - b'A') as usize + 1;
                seen_letter = true;
            }
            b'a'..=b'z' => {
                col = col * 26 + (b - b'a') as usize + 1;
                seen_letter = true;
            }
            _ => break,
        }
    }
    seen_letter.then(|| col - 1)
}

/// Builds the table: row 1 is the header, later rows are data padded to
/// the header width
fn table_from_raw_rows(raw_rows: Vec<Vec<RawCell>>) -> Result<Table> {
    let mut iter = raw_rows.into_iter();
    let header = iter
        .next()
        .ok_or_else(|| SieveError::Parse("worksheet has no header row".to_string()))?;

    let width = header
        .iter()
        .map(|(idx, _)| idx + 1)
        .max()
        .ok_or_else(|| SieveError::Parse("worksheet header row is empty".to_string()))?;

    let mut columns = vec![String::new(); width];
    for (idx, cell) in header {
        columns[idx] = cell.to_string();
    }

    let mut rows = Vec::new();
    for raw in iter {
        let mut cells = vec![Cell::Empty; width];
        for (idx, cell) in raw {
            // Cells beyond the header width carry no column name; drop them.
            if idx < width {
                cells[idx] = cell;
            }
        }
        rows.push(cells);
    }

    Table::new(columns, rows)
}
