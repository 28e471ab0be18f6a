//! Per-conversation session state
//!
//! A [`Session`] tracks one conversation's progress through the selection
//! flow: the uploaded table, the column being filtered, the values picked
//! so far, and the filtered result once "Done" is tapped. Sessions live in
//! an explicit [`SessionStore`] created at process start and injected into
//! the flow; nothing here is global.

use std::collections::HashMap;
use std::fmt;

use crate::table::Table;

/// Opaque identifier of one conversation
///
/// One session exists per chat id. The wrapped integer comes from the
/// transport and is only ever compared and rendered (it names the output
/// file, `filtered_<chat_id>.<ext>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable record of one conversation's filtering progress
///
/// Created on upload with only the table set; `filter_column` and
/// `selected_values` fill in as the user interacts, and `filtered` is
/// computed once the selection is finalized. Choosing a new column resets
/// the accumulated values.
#[derive(Debug, Clone)]
pub struct Session {
    /// The originally loaded table, owned exclusively by this session
    pub table: Table,
    /// Name of the column currently being filtered, if one was chosen
    pub filter_column: Option<String>,
    /// Values selected so far, insertion-ordered and duplicate-free
    pub selected_values: Vec<String>,
    /// The filtered table, present only after the "Done" action
    pub filtered: Option<Table>,
}

impl Session {
    /// Creates a fresh session around an uploaded table
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filter_column: None,
            selected_values: Vec::new(),
            filtered: None,
        }
    }

    /// Sets the filter column and clears any previously selected values
    pub fn choose_column(&mut self, column: impl Into<String>) {
        self.filter_column = Some(column.into());
        self.selected_values.clear();
        self.filtered = None;
    }

    /// Adds a value to the selection if not already present
    ///
    /// Idempotent: repeat taps of the same value leave the selection
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetsieve::session::Session;
    /// use sheetsieve::table::Table;
    ///
    /// let table = Table::new(vec!["X".to_string()], vec![]).unwrap();
    /// let mut session = Session::new(table);
    /// session.select_value("Eng");
    /// session.select_value("Eng");
    /// assert_eq!(session.selected_values, ["Eng"]);
    /// ```
    pub fn select_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.selected_values.contains(&value) {
            self.selected_values.push(value);
        }
    }
}

/// In-memory mapping of chat id to session
///
/// Entries are upserted on upload (last write wins, discarding any
/// in-progress selection) and never evicted: an abandoned session stays in
/// memory until overwritten, and memory grows with distinct conversations.
///
/// Events for the same conversation are read-then-written with no
/// atomicity guarantee; two near-simultaneous taps from one user could
/// interleave on `selected_values`. Human tap cadence makes this
/// effectively unreachable, so no locking is attempted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ChatId, Session>,
}

impl SessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the session for a chat
    pub fn upsert(&mut self, chat_id: ChatId, session: Session) {
        if self.sessions.insert(chat_id, session).is_some() {
            tracing::debug!(chat_id = %chat_id, "Replaced existing session");
        }
    }

    /// Looks up the session for a chat
    pub fn get(&self, chat_id: ChatId) -> Option<&Session> {
        self.sessions.get(&chat_id)
    }

    /// Looks up the session for a chat, mutably
    pub fn get_mut(&mut self, chat_id: ChatId) -> Option<&mut Session> {
        self.sessions.get_mut(&chat_id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if no session exists yet
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
