//! Sheetsieve - interactive spreadsheet filtering library
//!
//! This library implements the core of a conversational spreadsheet
//! filter: a user uploads an .xlsx file, picks a column, accumulates a
//! multi-select of values over several button taps, and downloads the
//! filtered rows as xlsx, csv, or line-delimited JSON.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `table`: in-memory tabular store and xlsx/csv ingestion
//! - `session`: per-conversation state and the injected session store
//! - `flow`: the selection state machine driving upload → filter → export
//! - `export`: serializers for the three output formats
//! - `transport`: the chat-platform seam, token codec, and console frontend
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition for the console frontend
//!
//! # Example
//!
//! ```no_run
//! use sheetsieve::flow::{Event, Flow};
//! use sheetsieve::session::{ChatId, SessionStore};
//! use sheetsieve::transport::console::ConsoleTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = ConsoleTransport::new("downloads");
//!     let mut flow = Flow::new(SessionStore::new(), transport);
//!     flow.dispatch(ChatId(0), Event::Start).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod export;
pub mod flow;
pub mod session;
pub mod table;
pub mod transport;

// Re-export commonly used types
pub use error::{Result, SieveError};
pub use export::ExportFormat;
pub use flow::{Event, Flow};
pub use session::{ChatId, Session, SessionStore};
pub use table::{Cell, Table};
pub use transport::{Button, CallbackToken, Transport};

#[cfg(test)]
pub mod test_utils;
