//! Shared fakes for bot manager tests: scripted chat platform, canned image editor, recording log sink.

#![allow(dead_code)]

use async_trait::async_trait;
use image_edit_client::{EditError, EditResult, ImageEditor};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use studio_core::{
    Chat, ChatApi, IncomingMessage, LogSink, PhotoSize, Result, Severity, StudioError, Update,
};
use tokio::time::Instant;

/// A tiny valid PNG signature, base64.
pub const PNG_B64: &str = "iVBORw0KGgo=";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

/// One scripted `getUpdates` answer.
pub enum Poll {
    Batch(Vec<Update>),
    Fail(&'static str),
}

/// Outbound chat traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Photo { chat_id: i64, len: usize, caption: String },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Sent::Text { chat_id, .. } | Sent::Photo { chat_id, .. } => *chat_id,
        }
    }
}

/// Scripted chat platform. Once the script runs out, `getUpdates` serves the mailbox like
/// Telegram does (every pending update with `update_id >= offset`, after a short delay) and
/// otherwise behaves like an idle long poll.
#[derive(Default)]
pub struct FakeChat {
    script: Mutex<VecDeque<Poll>>,
    mailbox: Vec<Update>,
    polls: Mutex<Vec<(i64, Instant)>>,
    sent: Mutex<Vec<Sent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub fail_get_file: AtomicBool,
    pub fail_send_photo: AtomicBool,
    pub webp_file_paths: AtomicBool,
}

impl FakeChat {
    pub fn new(script: Vec<Poll>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Serves `pending` to every poll whose offset has not moved past it.
    pub fn with_mailbox(pending: Vec<Update>) -> Self {
        Self {
            mailbox: pending,
            ..Default::default()
        }
    }

    /// Offsets requested, in order.
    pub fn poll_offsets(&self) -> Vec<i64> {
        self.polls.lock().unwrap().iter().map(|(o, _)| *o).collect()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.polls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>> {
        self.polls.lock().unwrap().push((offset, Instant::now()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        let result = match next {
            Some(Poll::Batch(updates)) => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(updates)
            }
            Some(Poll::Fail(msg)) => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(StudioError::Transport(msg.to_string()))
            }
            None => {
                let pending: Vec<Update> = self
                    .mailbox
                    .iter()
                    .filter(|u| u.update_id >= offset)
                    .cloned()
                    .collect();
                if pending.is_empty() {
                    tokio::time::sleep(Duration::from_secs(u64::from(timeout_secs))).await;
                } else {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Ok(pending)
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn get_file_path(&self, file_id: &str) -> Result<String> {
        if self.fail_get_file.load(Ordering::SeqCst) {
            return Err(StudioError::Platform("Could not get file path".to_string()));
        }
        let ext = if self.webp_file_paths.load(Ordering::SeqCst) { "webp" } else { "jpg" };
        Ok(format!("photos/{}.{}", file_id, ext))
    }

    async fn download_file(&self, _file_path: &str) -> Result<Vec<u8>> {
        Ok(JPEG_BYTES.to_vec())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, png: Vec<u8>, caption: &str) -> Result<()> {
        if self.fail_send_photo.load(Ordering::SeqCst) {
            return Err(StudioError::Platform("Bad Request: PHOTO_INVALID_DIMENSIONS".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            len: png.len(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// What the fake editor answers.
#[derive(Clone, Copy)]
pub enum EditMode {
    Image,
    TextOnly,
    Fail,
}

pub struct FakeEditor {
    mode: EditMode,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeEditor {
    pub fn new(mode: EditMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (image, instruction) pairs received.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageEditor for FakeEditor {
    async fn edit_image(&self, image: &str, instruction: &str) -> std::result::Result<EditResult, EditError> {
        self.calls
            .lock()
            .unwrap()
            .push((image.to_string(), instruction.to_string()));
        match self.mode {
            EditMode::Image => Ok(EditResult {
                image_url: Some(format!("data:image/png;base64,{}", PNG_B64)),
                text: String::new(),
            }),
            EditMode::TextOnly => Ok(EditResult {
                image_url: None,
                text: "I could not apply that edit.".to_string(),
            }),
            EditMode::Fail => Err(EditError::Api {
                status: 500,
                body: "internal".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Severity)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, Severity)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events().iter().filter(|(_, s)| *s == severity).count()
    }

    pub fn count_message(&self, message: &str) -> usize {
        self.events().iter().filter(|(m, _)| m == message).count()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, message: &str, severity: Severity) {
        self.events.lock().unwrap().push((message.to_string(), severity));
    }
}

pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> Update {
    Update {
        update_id,
        message: Some(IncomingMessage {
            message_id: update_id,
            chat: Chat { id: chat_id },
            text: Some(text.to_string()),
            caption: None,
            photo: None,
        }),
    }
}

pub fn photo_update(update_id: i64, chat_id: i64, caption: Option<&str>) -> Update {
    let sizes = ["small", "medium", "large"]
        .iter()
        .enumerate()
        .map(|(i, name)| PhotoSize {
            file_id: format!("{}-{}", name, update_id),
            file_unique_id: format!("u-{}", i),
            width: 320 * (i as u32 + 1),
            height: 240 * (i as u32 + 1),
            file_size: None,
        })
        .collect();
    Update {
        update_id,
        message: Some(IncomingMessage {
            message_id: update_id,
            chat: Chat { id: chat_id },
            text: None,
            caption: caption.map(str::to_string),
            photo: Some(sizes),
        }),
    }
}

pub fn empty_update(update_id: i64) -> Update {
    Update {
        update_id,
        message: None,
    }
}
