//! # studio-core
//!
//! Core types for the photo edit studio: the [`ChatApi`] trait, the Telegram update model,
//! [`StudioError`], bounded buffers for history and log events, and tracing initialization.
//! Transport-agnostic; used by studio-telegram and studio-cli.

pub mod chat;
pub mod error;
pub mod events;
pub mod logger;
pub mod ring;
pub mod types;

pub use chat::ChatApi;
pub use error::{Result, StudioError};
pub use events::{EventLog, LogEntry, LogSink, Severity, LOG_CAPACITY};
pub use logger::{init_tracing, DEFAULT_LOG_FILE};
pub use ring::RingBuffer;
pub use types::{Chat, HistoryEntry, IncomingMessage, PhotoSize, Update, HISTORY_CAPACITY};
