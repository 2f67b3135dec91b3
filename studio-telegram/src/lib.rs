//! # studio-telegram
//!
//! Telegram side of the photo edit studio: a raw Bot API client ([`TelegramClient`]), the update
//! [`Dispatcher`] with its photo edit pipeline, and the long-polling [`BotManager`].
//! No per-chat state and no persistence; the cursor lives in memory only.

mod client;
mod config;
mod dispatch;
mod manager;

pub use client::{TelegramClient, PARSE_MODE};
pub use config::{
    BotConfig, PollSettings, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_TELEGRAM_API_URL,
};
pub use dispatch::{
    Dispatch, Dispatcher, MSG_ASK_CAPTION, MSG_EDIT_COMPLETE, MSG_FAILED, MSG_NO_IMAGE,
    MSG_WELCOME, TELEGRAM_PHOTO_MIME,
};
pub use manager::{BotManager, MSG_BOT_STARTED, MSG_BOT_STOPPED};
