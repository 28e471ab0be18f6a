//! Transport abstraction
//!
//! The chat platform is an external collaborator: it receives user
//! messages and button taps and delivers text, menus, and files back.
//! This module defines the [`Transport`] trait the selection flow drives,
//! the [`Button`] type for inline menus, and the [`CallbackToken`] codec
//! for button callback data.
//!
//! Callback tokens are namespaced strings (`col_<i>`, `val_<i>`,
//! `val_DONE`, `format_<name>`). Column and value tokens carry opaque
//! indices into the option list that was presented, never the raw text,
//! so a cell value that happens to equal `DONE` or contain an underscore
//! cannot collide with the token scheme.

pub mod console;

use async_trait::async_trait;

use crate::error::{Result, SieveError};
use crate::export::ExportFormat;
use crate::session::ChatId;

/// Reserved literal for the terminal "Done" action
const DONE_TOKEN: &str = "val_DONE";

/// Decoded button callback data
///
/// A closed set of event kinds; decoding happens once at the transport
/// boundary so the flow never string-matches on prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackToken {
    /// Filter by the column at this index of the presented column list
    Column(usize),
    /// Select the value at this index of the presented value list
    Value(usize),
    /// Finalize the value selection
    Done,
    /// Download in the given format
    Format(ExportFormat),
}

impl CallbackToken {
    /// Encodes the token as callback data for the chat platform
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetsieve::transport::CallbackToken;
    ///
    /// assert_eq!(CallbackToken::Column(2).encode(), "col_2");
    /// assert_eq!(CallbackToken::Done.encode(), "val_DONE");
    /// ```
    pub fn encode(&self) -> String {
        match self {
            Self::Column(idx) => format!("col_{}", idx),
            Self::Value(idx) => format!("val_{}", idx),
            Self::Done => DONE_TOKEN.to_string(),
            Self::Format(format) => format!("format_{}", format.token()),
        }
    }

    /// Decodes callback data back into a token
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::MissingSession`] for data outside the token
    /// scheme (a stale or garbled interaction) and
    /// [`SieveError::UnsupportedFormat`] for an unknown format name.
    pub fn decode(data: &str) -> Result<Self> {
        if data == DONE_TOKEN {
            return Ok(Self::Done);
        }
        if let Some(rest) = data.strip_prefix("col_") {
            return parse_index(rest, data).map(Self::Column);
        }
        if let Some(rest) = data.strip_prefix("val_") {
            return parse_index(rest, data).map(Self::Value);
        }
        if let Some(rest) = data.strip_prefix("format_") {
            return ExportFormat::parse_token(rest).map(Self::Format);
        }
        Err(SieveError::MissingSession(format!("unrecognized callback data {:?}", data)).into())
    }
}

fn parse_index(rest: &str, data: &str) -> Result<usize> {
    rest.parse().map_err(|_| {
        SieveError::MissingSession(format!("malformed callback data {:?}", data)).into()
    })
}

/// One labeled inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Token delivered back when the button is tapped
    pub token: CallbackToken,
}

impl Button {
    /// Creates a button
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Outbound side of the chat platform
///
/// The selection flow drives a `Transport` to talk back to the user; the
/// production implementation wraps a chat-bot SDK, the console
/// implementation (see [`console`]) renders to a terminal, and tests use
/// a recording implementation.
#[async_trait]
pub trait Transport: Send {
    /// Sends a plain text message
    async fn send_text(&mut self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Sends a text message with an inline button menu
    async fn send_buttons(&mut self, chat_id: ChatId, text: &str, buttons: &[Button])
        -> Result<()>;

    /// Replaces the last menu message with new text and buttons
    ///
    /// An empty button list edits the message down to plain text.
    async fn edit_last_message(
        &mut self,
        chat_id: ChatId,
        text: &str,
        buttons: &[Button],
    ) -> Result<()>;

    /// Delivers a byte stream as a downloadable file attachment
    async fn send_file(&mut self, chat_id: ChatId, bytes: Vec<u8>, filename: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let tokens = [
            CallbackToken::Column(0),
            CallbackToken::Column(19),
            CallbackToken::Value(7),
            CallbackToken::Done,
            CallbackToken::Format(ExportFormat::Csv),
        ];
        for token in tokens {
            assert_eq!(CallbackToken::decode(&token.encode()).unwrap(), token);
        }
    }

    #[test]
    fn test_done_is_reserved_literal() {
        assert_eq!(CallbackToken::Done.encode(), "val_DONE");
        assert_eq!(
            CallbackToken::decode("val_DONE").unwrap(),
            CallbackToken::Done
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(CallbackToken::decode("something_else").is_err());
        assert!(CallbackToken::decode("col_notanumber").is_err());
        assert!(CallbackToken::decode("val_").is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_format() {
        let err = CallbackToken::decode("format_pdf").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported export format: pdf");
    }

    #[test]
    fn test_value_index_cannot_collide_with_done() {
        // A cell whose text is literally "DONE" is addressed by index, so
        // the reserved token stays unambiguous.
        let token = CallbackToken::Value(3);
        assert_ne!(token.encode(), DONE_TOKEN);
        assert_eq!(CallbackToken::decode("val_3").unwrap(), token);
    }
}
