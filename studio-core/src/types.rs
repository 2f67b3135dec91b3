//! Core types: Telegram update model (only the fields the bot reads) and edit history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of edits kept in the host history.
pub const HISTORY_CAPACITY: usize = 10;

/// One `getUpdates` item. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

/// Chat identity; only the id is used for replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// One size variant of a sent photo. Telegram orders variants smallest to largest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Incoming message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

impl IncomingMessage {
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    /// Bot command in the text, without a `@botname` suffix (`/start@my_bot payload` → `/start`).
    pub fn command(&self) -> Option<&str> {
        let first = self.text.as_deref()?.split_whitespace().next()?;
        if !first.starts_with('/') {
            return None;
        }
        first.split('@').next()
    }

    /// Caption, if present and not blank.
    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Largest photo variant (the last one), if the message carries a photo.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.as_ref().and_then(|sizes| sizes.last())
    }
}

/// A completed edit shown in the host history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub source_image: String,
    pub result_image: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(source_image: String, result_image: String, prompt: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_image,
            result_image,
            prompt,
            created_at: Utc::now(),
        }
    }
}
