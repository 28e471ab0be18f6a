//! Test utilities for Sheetsieve
//!
//! Shared fixtures for the unit test suites: a small sample table, xlsx
//! byte fixtures, and a recording transport that captures everything the
//! flow sends.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::ChatId;
use crate::table::{Cell, Table};
use crate::transport::{Button, Transport};

/// The table used across the test suites
///
/// Columns `[Name, Dept]`, rows Al/Eng, Bo/Sales, Cy/Eng.
pub fn sample_table() -> Table {
    Table::new(
        vec!["Name".to_string(), "Dept".to_string()],
        vec![
            vec![Cell::Text("Al".into()), Cell::Text("Eng".into())],
            vec![Cell::Text("Bo".into()), Cell::Text("Sales".into())],
            vec![Cell::Text("Cy".into()), Cell::Text("Eng".into())],
        ],
    )
    .expect("sample table is well-formed")
}

/// The sample table serialized as xlsx bytes
pub fn sample_xlsx() -> Vec<u8> {
    crate::export::export(&sample_table(), crate::export::ExportFormat::Xlsx)
        .expect("sample export succeeds")
}

/// Builds a minimal xlsx package from rows of text cells
///
/// Independent of the exporter so ingestion tests do not become
/// round-trip tautologies: parts are assembled by hand with inline
/// strings and explicit cell references.
pub fn xlsx_fixture(rows: &[&[&str]]) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_idx, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, row_idx + 1));
        for (col_idx, text) in row.iter().enumerate() {
            let reference = format!("{}{}", (b'A' + col_idx as u8) as char, row_idx + 1);
            sheet.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                reference, text
            ));
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", content_types),
        ("_rels/.rels", root_rels),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        zip.start_file(name, options).expect("fixture part starts");
        zip.write_all(content.as_bytes()).expect("fixture part writes");
    }
    zip.finish().expect("fixture zip finishes").into_inner()
}

/// One captured outbound action
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    /// Plain text message
    Text { chat_id: ChatId, text: String },
    /// Text with an inline button menu
    Buttons {
        chat_id: ChatId,
        text: String,
        buttons: Vec<Button>,
    },
    /// Edit of the last menu message
    Edit {
        chat_id: ChatId,
        text: String,
        buttons: Vec<Button>,
    },
    /// File delivery
    File {
        chat_id: ChatId,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// Transport double that records every outbound action in order
#[derive(Debug, Default)]
pub struct RecordingTransport {
    /// Everything sent so far, oldest first
    pub sent: Vec<Sent>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&mut self, chat_id: ChatId, text: &str) -> Result<()> {
        self.sent.push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_buttons(
        &mut self,
        chat_id: ChatId,
        text: &str,
        buttons: &[Button],
    ) -> Result<()> {
        self.sent.push(Sent::Buttons {
            chat_id,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(())
    }

    async fn edit_last_message(
        &mut self,
        chat_id: ChatId,
        text: &str,
        buttons: &[Button],
    ) -> Result<()> {
        self.sent.push(Sent::Edit {
            chat_id,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(())
    }

    async fn send_file(&mut self, chat_id: ChatId, bytes: Vec<u8>, filename: &str) -> Result<()> {
        self.sent.push(Sent::File {
            chat_id,
            filename: filename.to_string(),
            bytes,
        });
        Ok(())
    }
}
