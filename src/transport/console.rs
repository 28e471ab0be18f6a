//! Console transport
//!
//! Renders the bot conversation in a terminal: text messages print
//! directly, button menus print as numbered lists, and delivered files
//! are written into a download directory. The REPL in `main.rs` maps a
//! typed number back to the token of the corresponding menu entry.

use std::path::PathBuf;

use async_trait::async_trait;
use colored::Colorize;

use crate::error::Result;
use crate::session::ChatId;
use crate::transport::{Button, CallbackToken, Transport};

/// Terminal-backed transport for the interactive demo
#[derive(Debug)]
pub struct ConsoleTransport {
    download_dir: PathBuf,
    last_menu: Vec<Button>,
}

impl ConsoleTransport {
    /// Creates a console transport that saves files under `download_dir`
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            last_menu: Vec::new(),
        }
    }

    /// Resolves a one-based menu choice to its callback token
    ///
    /// Returns None if no menu is on screen or the number is out of range.
    pub fn menu_token(&self, choice: usize) -> Option<CallbackToken> {
        if choice == 0 {
            return None;
        }
        self.last_menu.get(choice - 1).map(|button| button.token)
    }

    /// True if a button menu is currently on screen
    pub fn has_menu(&self) -> bool {
        !self.last_menu.is_empty()
    }

    fn print_menu(&self, text: &str) {
        println!("{}", text.cyan());
        for (idx, button) in self.last_menu.iter().enumerate() {
            println!("  {} {}", format!("[{}]", idx + 1).yellow(), button.label);
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_text(&mut self, _chat_id: ChatId, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_buttons(
        &mut self,
        _chat_id: ChatId,
        text: &str,
        buttons: &[Button],
    ) -> Result<()> {
        self.last_menu = buttons.to_vec();
        self.print_menu(text);
        Ok(())
    }

    async fn edit_last_message(
        &mut self,
        _chat_id: ChatId,
        text: &str,
        buttons: &[Button],
    ) -> Result<()> {
        // A terminal cannot edit what is already printed; re-render the
        // message in place of the old menu.
        self.last_menu = buttons.to_vec();
        if self.last_menu.is_empty() {
            println!("{}", text);
        } else {
            self.print_menu(text);
        }
        Ok(())
    }

    async fn send_file(&mut self, _chat_id: ChatId, bytes: Vec<u8>, filename: &str) -> Result<()> {
        let path = self.download_dir.join(filename);
        std::fs::write(&path, bytes)?;
        println!("{} {}", "Saved".green(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_menu_token_resolution() {
        let dir = TempDir::new().expect("temp dir");
        let mut transport = ConsoleTransport::new(dir.path());
        transport
            .send_buttons(
                ChatId(1),
                "pick one:",
                &[
                    Button::new("Name", CallbackToken::Column(0)),
                    Button::new("Dept", CallbackToken::Column(1)),
                ],
            )
            .await
            .unwrap();

        assert!(transport.has_menu());
        assert_eq!(transport.menu_token(2), Some(CallbackToken::Column(1)));
        assert_eq!(transport.menu_token(0), None);
        assert_eq!(transport.menu_token(3), None);
    }

    #[tokio::test]
    async fn test_plain_edit_clears_menu() {
        let dir = TempDir::new().expect("temp dir");
        let mut transport = ConsoleTransport::new(dir.path());
        transport
            .send_buttons(ChatId(1), "menu:", &[Button::new("x", CallbackToken::Done)])
            .await
            .unwrap();
        transport.edit_last_message(ChatId(1), "done", &[]).await.unwrap();
        assert!(!transport.has_menu());
    }

    #[tokio::test]
    async fn test_send_file_writes_to_download_dir() {
        let dir = TempDir::new().expect("temp dir");
        let mut transport = ConsoleTransport::new(dir.path());
        transport
            .send_file(ChatId(1), b"a,b\n".to_vec(), "filtered_1.csv")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("filtered_1.csv")).expect("file exists");
        assert_eq!(written, b"a,b\n");
    }
}
