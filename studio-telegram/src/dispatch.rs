//! Update dispatch and the photo edit pipeline: routes each update by message shape and turns
//! every pipeline failure into a chat notice plus an operator log event.

use image_edit_client::{decode_data_uri, to_data_uri, ImageEditor};
use std::sync::Arc;
use studio_core::{ChatApi, IncomingMessage, LogSink, PhotoSize, Result, Severity, StudioError, Update};
use tracing::{debug, error, info, instrument, warn};

// --- Chat-facing texts (Markdown) ---
pub const MSG_WELCOME: &str =
    "🎨 *Welcome!* Send me an image with a caption describing the edit you want.";
pub const MSG_ASK_CAPTION: &str =
    "📸 Got the image! Now please send a *caption* with instructions on how to edit it.";
pub const MSG_EDIT_COMPLETE: &str = "✅ *Edit complete!*";
pub const MSG_NO_IMAGE: &str = "⚠️ Gemini didn't return an image. Try a clearer instruction.";
pub const MSG_FAILED: &str = "❌ Sorry, an error occurred while processing your image.";

const START_COMMAND: &str = "/start";
/// Telegram re-encodes every `photo` size as JPEG, whatever the stored file is called.
pub const TELEGRAM_PHOTO_MIME: &str = "image/jpeg";

/// What handling an update amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `/start`: welcome text sent.
    Welcomed,
    /// Photo without caption: asked the user to resend with one.
    CaptionRequested,
    /// Edited photo sent back.
    Edited,
    /// Backend produced no image; told the user.
    NoImage,
    /// Pipeline failed; failure notice sent (or attempted).
    Failed,
    /// Nothing to do.
    Ignored,
}

/// Routes updates to replies. Holds no per-chat state.
#[derive(Clone)]
pub struct Dispatcher {
    chat: Arc<dyn ChatApi>,
    editor: Arc<dyn ImageEditor>,
    sink: Arc<dyn LogSink>,
}

impl Dispatcher {
    pub fn new(chat: Arc<dyn ChatApi>, editor: Arc<dyn ImageEditor>, sink: Arc<dyn LogSink>) -> Self {
        Self { chat, editor, sink }
    }

    /// Handles one update. Branches in priority order: `/start`, photo + caption, photo alone, anything else.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn dispatch(&self, update: &Update) -> Dispatch {
        let Some(msg) = update.message.as_ref() else {
            return Dispatch::Ignored;
        };
        let chat_id = msg.chat_id();

        if msg.command() == Some(START_COMMAND) {
            self.reply(chat_id, MSG_WELCOME).await;
            return Dispatch::Welcomed;
        }

        match (msg.largest_photo(), msg.caption_text()) {
            (Some(photo), Some(caption)) => {
                self.sink
                    .emit(&format!("Received image from Chat ID: {}", chat_id), Severity::Info);
                self.process_image(msg, photo, caption).await
            }
            (Some(_), None) => {
                self.reply(chat_id, MSG_ASK_CAPTION).await;
                Dispatch::CaptionRequested
            }
            _ => {
                debug!(chat_id, "ignoring message without photo or command");
                Dispatch::Ignored
            }
        }
    }

    /// Runs the pipeline for one photo; exactly one reply reaches the chat (photo or text).
    async fn process_image(&self, msg: &IncomingMessage, photo: &PhotoSize, prompt: &str) -> Dispatch {
        let chat_id = msg.chat_id();
        match self.run_pipeline(chat_id, photo, prompt).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(chat_id, error = %e, "image pipeline failed");
                self.sink.emit(&format!("Error: {}", e), Severity::Error);
                self.reply(chat_id, MSG_FAILED).await;
                Dispatch::Failed
            }
        }
    }

    async fn run_pipeline(&self, chat_id: i64, photo: &PhotoSize, prompt: &str) -> Result<Dispatch> {
        self.sink.emit("Downloading image from Telegram...", Severity::Info);
        let file_path = self.chat.get_file_path(&photo.file_id).await?;
        let bytes = self.chat.download_file(&file_path).await?;
        info!(chat_id, file_path = %file_path, bytes = bytes.len(), "photo downloaded");
        let source = to_data_uri(TELEGRAM_PHOTO_MIME, &bytes);

        self.sink
            .emit(&format!("Sending to Gemini: \"{}\"", prompt), Severity::Info);
        let result = self
            .editor
            .edit_image(&source, prompt)
            .await
            .map_err(|e| StudioError::Edit(e.to_string()))?;

        match result.image_url {
            Some(image_url) => {
                self.sink
                    .emit("Gemini success! Sending back to Telegram...", Severity::Success);
                let png =
                    decode_data_uri(&image_url).map_err(|e| StudioError::Decode(e.to_string()))?;
                self.chat.send_photo(chat_id, png, MSG_EDIT_COMPLETE).await?;
                Ok(Dispatch::Edited)
            }
            None => {
                if !result.text.is_empty() {
                    debug!(chat_id, text = %result.text, "model answered without an image");
                }
                self.chat.send_message(chat_id, MSG_NO_IMAGE).await?;
                Ok(Dispatch::NoImage)
            }
        }
    }

    /// Sends a static text; failures are logged, never propagated.
    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.chat.send_message(chat_id, text).await {
            warn!(chat_id, error = %e, "sendMessage failed");
            self.sink
                .emit(&format!("Failed to reply to Chat ID {}: {}", chat_id, e), Severity::Error);
        }
    }
}
