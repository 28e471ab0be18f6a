//! Styled spreadsheet exporter
//!
//! Writes the table as a single-sheet xlsx workbook: the header row bold
//! and centered, data rows left-aligned, and every column auto-sized to
//! its longest stringified value plus two character widths.
//!
//! The workbook is assembled part by part (content types, relationships,
//! workbook, styles, worksheet) into a ZIP package. Cell text is written
//! as inline strings so no sharedStrings part is needed.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, SieveError};
use crate::table::{Cell, Table};

/// Worksheet name, kept from the bot this tool grew out of
const SHEET_NAME: &str = "FilteredData";

/// Extra character widths added to every auto-sized column
const COLUMN_PADDING: usize = 2;

/// Style indices as laid out in [`styles_part`]
const STYLE_HEADER: u32 = 1;
const STYLE_DATA: u32 = 2;

/// Serializes the table as xlsx bytes
pub(super) fn write(table: &Table) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", content_types_part()),
        ("_rels/.rels", root_rels_part()),
        ("xl/workbook.xml", workbook_part()),
        ("xl/_rels/workbook.xml.rels", workbook_rels_part()),
        ("xl/styles.xml", styles_part()),
        ("xl/worksheets/sheet1.xml", worksheet_part(table)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options).map_err(SieveError::from)?;
        zip.write_all(content.as_bytes()).map_err(SieveError::from)?;
    }

    let cursor = zip.finish().map_err(SieveError::from)?;
    Ok(cursor.into_inner())
}

fn content_types_part() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
        r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        r#"</Types>"#,
    )
    .to_string()
}

fn root_rels_part() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn workbook_part() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>"#,
            r#"</workbook>"#,
        ),
        escape(SHEET_NAME)
    )
}

fn workbook_rels_part() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
        r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

/// The styles part
///
/// Cell format 0 is the required default, format 1 is the bold centered
/// header ([`STYLE_HEADER`]), format 2 the left-aligned data cell
/// ([`STYLE_DATA`]). The two fills and the empty border are mandatory
/// boilerplate for a conformant workbook.
fn styles_part() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font>"#,
        r#"<font><b/><sz val="11"/><name val="Calibri"/></font></fonts>"#,
        r#"<fills count="2"><fill><patternFill patternType="none"/></fill>"#,
        r#"<fill><patternFill patternType="gray125"/></fill></fills>"#,
        r#"<borders count="1"><border/></borders>"#,
        r#"<cellStyleXfs count="1"><xf/></cellStyleXfs>"#,
        r#"<cellXfs count="3">"#,
        r#"<xf xfId="0"/>"#,
        r#"<xf xfId="0" fontId="1" applyFont="1" applyAlignment="1"><alignment horizontal="center"/></xf>"#,
        r#"<xf xfId="0" applyAlignment="1"><alignment horizontal="left"/></xf>"#,
        r#"</cellXfs>"#,
        r#"</styleSheet>"#,
    )
    .to_string()
}

fn worksheet_part(table: &Table) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    // Column widths: longest stringified value in the column, header
    // included, plus the fixed padding.
    xml.push_str("<cols>");
    for (idx, width) in column_widths(table).into_iter().enumerate() {
        let _ = write!(
            xml,
            r#"<col min="{0}" max="{0}" width="{1}" customWidth="1"/>"#,
            idx + 1,
            width
        );
    }
    xml.push_str("</cols>");

    xml.push_str("<sheetData>");
    write_text_row(&mut xml, 1, table.columns().iter(), STYLE_HEADER);
    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = row_idx + 2;
        let _ = write!(xml, r#"<row r="{}">"#, row_num);
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(&mut xml, row_num, col_idx, cell);
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    xml.push_str("</worksheet>");
    xml
}

/// Writes one row of text cells with the given style
fn write_text_row<'a>(
    xml: &mut String,
    row_num: usize,
    cells: impl Iterator<Item = &'a String>,
    style: u32,
) {
    let _ = write!(xml, r#"<row r="{}">"#, row_num);
    for (col_idx, text) in cells.enumerate() {
        let _ = write!(
            xml,
            r#"<c r="{}" s="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            cell_reference(row_num, col_idx),
            style,
            escape(text.as_str())
        );
    }
    xml.push_str("</row>");
}

/// Writes one data cell, left-aligned
fn write_cell(xml: &mut String, row_num: usize, col_idx: usize, cell: &Cell) {
    let reference = cell_reference(row_num, col_idx);
    match cell {
        Cell::Text(text) => {
            let _ = write!(
                xml,
                r#"<c r="{}" s="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                reference,
                STYLE_DATA,
                escape(text.as_str())
            );
        }
        Cell::Number(n) => {
            let _ = write!(
                xml,
                r#"<c r="{}" s="{}"><v>{}</v></c>"#,
                reference, STYLE_DATA, n
            );
        }
        Cell::Empty => {
            let _ = write!(xml, r#"<c r="{}" s="{}"/>"#, reference, STYLE_DATA);
        }
    }
}

/// Character width per column: longest stringified cell plus padding
fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|name| name.chars().count())
        .collect();
    for row in table.rows() {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.to_string().chars().count());
        }
    }
    widths.into_iter().map(|w| w + COLUMN_PADDING).collect()
}

/// Builds an A1-style reference from a one-based row and zero-based column
fn cell_reference(row_num: usize, col_idx: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = col_idx + 1;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(b'A' + digit as u8);
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row_num)
}
