//! Selection flow state machine
//!
//! Drives the per-conversation sequence: upload a spreadsheet, choose a
//! column, accumulate a multi-select of values, finalize, choose an output
//! format, receive the filtered file. The flow owns the [`SessionStore`]
//! and talks to the user exclusively through an injected [`Transport`].
//!
//! The conversation state is the session itself: which step a chat is on
//! follows from which session fields are populated, so state and data can
//! never disagree. An event that references state the session does not
//! have (a stale or out-of-order tap) surfaces as a generic retry message
//! rather than crashing the flow.

use crate::error::{Result, SieveError};
use crate::export::{export, ExportFormat};
use crate::session::{ChatId, Session, SessionStore};
use crate::table::Table;
use crate::transport::{Button, CallbackToken, Transport};

/// Maximum number of column buttons offered after an upload
///
/// A hardcoded presentation cap, like the value cap in the table module.
pub const MAX_COLUMN_CHOICES: usize = 20;

/// Accepted upload extension
const ACCEPTED_EXTENSION: &str = ".xlsx";

/// One inbound user interaction
///
/// The transport adapter decodes raw platform updates into this closed
/// set before handing them to the flow.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user started the conversation
    Start,
    /// The user uploaded a document
    Upload {
        /// Name of the uploaded file, used for the extension check
        file_name: String,
        /// Raw file content
        bytes: Vec<u8>,
    },
    /// The user tapped an inline button
    Callback(CallbackToken),
}

/// The selection flow engine
///
/// Generic over the transport so the same flow runs against a chat-bot
/// SDK, a console, or a recording test double.
pub struct Flow<T: Transport> {
    store: SessionStore,
    transport: T,
}

impl<T: Transport> Flow<T> {
    /// Creates a flow around an injected session store and transport
    pub fn new(store: SessionStore, transport: T) -> Self {
        Self { store, transport }
    }

    /// The session store, for inspection
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The transport, for inspection
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handles one event, rendering any domain error as a user-facing
    /// message
    ///
    /// This is the flow boundary of the error policy: nothing below it
    /// escapes to crash the process. The routine, user-correctable cases
    /// get specific wording; parse failures and stale interactions get a
    /// generic "start over" message with no internal detail.
    ///
    /// # Errors
    ///
    /// Returns an error only if the transport itself fails to deliver.
    pub async fn dispatch(&mut self, chat_id: ChatId, event: Event) -> Result<()> {
        if let Err(err) = self.handle(chat_id, event).await {
            match err.downcast_ref::<SieveError>() {
                Some(SieveError::InvalidFileType(name)) => {
                    tracing::info!(chat_id = %chat_id, file = %name, "Rejected upload");
                    self.transport
                        .send_text(chat_id, "❌ Please upload a valid Excel (.xlsx) file.")
                        .await?;
                }
                _ => {
                    tracing::warn!(chat_id = %chat_id, error = %err, "Flow error");
                    self.transport
                        .send_text(
                            chat_id,
                            "⚠️ Something went wrong. Please start over by uploading your file again.",
                        )
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn handle(&mut self, chat_id: ChatId, event: Event) -> Result<()> {
        match event {
            Event::Start => {
                self.transport
                    .send_text(chat_id, "👋 Please send me an Excel (.xlsx) file to begin.")
                    .await
            }
            Event::Upload { file_name, bytes } => {
                self.handle_upload(chat_id, &file_name, &bytes).await
            }
            Event::Callback(CallbackToken::Column(idx)) => self.handle_column(chat_id, idx).await,
            Event::Callback(CallbackToken::Value(idx)) => self.handle_value(chat_id, idx).await,
            Event::Callback(CallbackToken::Done) => self.handle_done(chat_id).await,
            Event::Callback(CallbackToken::Format(format)) => {
                self.handle_format(chat_id, format).await
            }
        }
    }

    /// Upload: validate the extension, load the table, reset the session
    ///
    /// An upload in any state starts over; the previous in-progress
    /// selection for this chat is discarded without warning.
    async fn handle_upload(&mut self, chat_id: ChatId, file_name: &str, bytes: &[u8]) -> Result<()> {
        if !file_name.ends_with(ACCEPTED_EXTENSION) {
            return Err(SieveError::InvalidFileType(file_name.to_string()).into());
        }

        let table = Table::from_xlsx(bytes)?;
        tracing::info!(
            chat_id = %chat_id,
            file = %file_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded spreadsheet"
        );

        let buttons: Vec<Button> = table
            .columns()
            .iter()
            .take(MAX_COLUMN_CHOICES)
            .enumerate()
            .map(|(idx, name)| Button::new(name.clone(), CallbackToken::Column(idx)))
            .collect();

        self.store.upsert(chat_id, Session::new(table));
        self.transport
            .send_buttons(chat_id, "📊 Choose a column to filter data by:", &buttons)
            .await
    }

    /// Column choice: remember the column, clear the selection, offer values
    async fn handle_column(&mut self, chat_id: ChatId, idx: usize) -> Result<()> {
        let session = self
            .store
            .get_mut(chat_id)
            .ok_or_else(|| SieveError::MissingSession("column choice".to_string()))?;
        let column = session
            .table
            .columns()
            .get(idx)
            .cloned()
            .ok_or_else(|| SieveError::MissingSession(format!("column index {}", idx)))?;

        session.choose_column(column);
        let (text, buttons) = value_menu(session)?;
        self.transport
            .edit_last_message(chat_id, &text, &buttons)
            .await
    }

    /// Value tap: idempotent insert, acknowledged without redrawing the menu
    async fn handle_value(&mut self, chat_id: ChatId, idx: usize) -> Result<()> {
        let session = self
            .store
            .get_mut(chat_id)
            .ok_or_else(|| SieveError::MissingSession("value choice".to_string()))?;
        let column = session
            .filter_column
            .clone()
            .ok_or_else(|| SieveError::MissingSession("value choice before column".to_string()))?;
        let value = session
            .table
            .unique_values(&column)?
            .into_iter()
            .nth(idx)
            .ok_or_else(|| SieveError::MissingSession(format!("value index {}", idx)))?;

        session.select_value(value.clone());
        self.transport
            .send_text(chat_id, &format!("Added: {}", value))
            .await
    }

    /// Done: warn on an empty selection, otherwise filter and offer formats
    async fn handle_done(&mut self, chat_id: ChatId) -> Result<()> {
        let session = self
            .store
            .get_mut(chat_id)
            .ok_or_else(|| SieveError::MissingSession("done".to_string()))?;
        let column = session
            .filter_column
            .clone()
            .ok_or_else(|| SieveError::MissingSession("done before column".to_string()))?;

        if session.selected_values.is_empty() {
            // Routine, recoverable: stay in the same state and keep the
            // value menu on screen.
            let (_, buttons) = value_menu(session)?;
            return self
                .transport
                .edit_last_message(
                    chat_id,
                    "⚠️ You haven't selected any values yet.",
                    &buttons,
                )
                .await;
        }

        let filtered = session.table.filter(&column, &session.selected_values)?;
        let row_count = filtered.row_count();
        session.filtered = Some(filtered);

        let buttons: Vec<Button> = ExportFormat::ALL
            .iter()
            .map(|format| Button::new(format.label(), CallbackToken::Format(*format)))
            .collect();
        self.transport
            .edit_last_message(
                chat_id,
                &format!(
                    "✅ Filtered {} rows by `{}`.\nChoose a format to download:",
                    row_count, column
                ),
                &buttons,
            )
            .await
    }

    /// Format choice: export the filtered table and deliver the file
    async fn handle_format(&mut self, chat_id: ChatId, format: ExportFormat) -> Result<()> {
        let session = self
            .store
            .get(chat_id)
            .ok_or_else(|| SieveError::MissingSession("format choice".to_string()))?;
        let filtered = session
            .filtered
            .as_ref()
            .ok_or_else(|| SieveError::MissingSession("format choice before done".to_string()))?;

        let bytes = export(filtered, format)?;
        let filename = format!("filtered_{}.{}", chat_id, format.token());
        tracing::info!(chat_id = %chat_id, file = %filename, "Delivering filtered file");

        self.transport.send_file(chat_id, bytes, &filename).await?;
        self.transport
            .edit_last_message(chat_id, "✅ Here's your filtered file!", &[])
            .await
    }
}

/// Builds the value-selection menu for the session's filter column
fn value_menu(session: &Session) -> Result<(String, Vec<Button>)> {
    let column = session
        .filter_column
        .as_deref()
        .ok_or_else(|| SieveError::MissingSession("value menu before column".to_string()))?;
    let mut buttons: Vec<Button> = session
        .table
        .unique_values(column)?
        .into_iter()
        .enumerate()
        .map(|(idx, value)| Button::new(value, CallbackToken::Value(idx)))
        .collect();
    buttons.push(Button::new("✅ Done", CallbackToken::Done));

    let text = format!(
        "🔍 Choose multiple values from **{}**. Tap ✅ Done when finished:",
        column
    );
    Ok((text, buttons))
}
