//! Shared helpers for the integration test suites

// Each test suite links its own copy of this module and uses a subset.
#![allow(dead_code)]

use async_trait::async_trait;

use sheetsieve::error::Result;
use sheetsieve::table::{Cell, Table};
use sheetsieve::transport::{Button, Transport};
use sheetsieve::{ChatId, ExportFormat};

/// Columns `[Name, Dept]`, rows Al/Eng, Bo/Sales, Cy/Eng
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

/// The sample table as xlsx upload bytes
pub fn sample_xlsx() -> Vec<u8> {
    sheetsieve::export::export(&sample_table(), ExportFormat::Xlsx)
        .expect("sample export succeeds")
}

/// One captured outbound action
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Buttons {
        chat_id: ChatId,
        text: String,
        buttons: Vec<Button>,
    },
    Edit {
        chat_id: ChatId,
        text: String,
        buttons: Vec<Button>,
    },
    File {
        chat_id: ChatId,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// Transport double recording every outbound action in order
#[derive(Debug, Default)]
pub struct RecordingTransport {
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
