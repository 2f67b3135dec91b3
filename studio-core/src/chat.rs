//! Chat platform abstraction.
//!
//! [`ChatApi`] is transport-agnostic; studio-telegram implements it over the Telegram Bot API.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Update;

/// The chat platform calls the bot needs. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Long-polls for updates with `update_id >= offset`, waiting up to `timeout_secs` server-side.
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>>;
    /// Resolves a downloadable path for a file id.
    async fn get_file_path(&self, file_id: &str) -> Result<String>;
    /// Downloads the raw bytes at a path returned by [`ChatApi::get_file_path`].
    async fn download_file(&self, file_path: &str) -> Result<Vec<u8>>;
    /// Sends a text message (Markdown parse mode).
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
    /// Sends PNG bytes as a photo with a caption (Markdown parse mode).
    async fn send_photo(&self, chat_id: i64, png: Vec<u8>, caption: &str) -> Result<()>;
}
