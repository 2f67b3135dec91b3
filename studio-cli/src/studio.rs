//! The studio host: direct edits with a bounded history, plus the Telegram bot switch.
//!
//! Both surfaces share one [`ImageEditor`]; bot events land in the shared [`EventLog`].

use std::sync::Arc;
use std::time::Duration;

use image_edit_client::ImageEditor;
use studio_core::{EventLog, HistoryEntry, Result, RingBuffer, StudioError, HISTORY_CAPACITY};
use studio_telegram::{BotConfig, BotManager, TelegramClient};
use tracing::{info, instrument};

use crate::credential::CredentialStore;

pub const MSG_NEED_INPUT: &str = "Please provide an image and instructions.";
pub const MSG_NEED_TOKEN: &str = "Please enter a Telegram Bot Token first!";
pub const MSG_NO_RESULT_IMAGE: &str = "No image was returned. Try a different prompt.";

/// Host state. Not shared across threads; the bot loop runs on its own task.
pub struct Studio {
    editor: Arc<dyn ImageEditor>,
    credentials: CredentialStore,
    bot_config: BotConfig,
    history: RingBuffer<HistoryEntry>,
    log: EventLog,
    bot: Option<ActiveBot>,
}

/// The manager together with the token it was built for.
struct ActiveBot {
    token: String,
    manager: BotManager,
}

impl Studio {
    pub fn new(
        editor: Arc<dyn ImageEditor>,
        credentials: CredentialStore,
        bot_config: BotConfig,
    ) -> Self {
        Self {
            editor,
            credentials,
            bot_config,
            history: RingBuffer::new(HISTORY_CAPACITY),
            log: EventLog::new(),
            bot: None,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Completed edits, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.iter_newest_first().cloned().collect()
    }

    /// Edits `image` (a data URI) as instructed and records the result in the history.
    ///
    /// An image-less answer is an error carrying the model's text, or a generic hint when there is none.
    #[instrument(skip(self, image), fields(prompt = %prompt))]
    pub async fn edit(&mut self, image: &str, prompt: &str) -> Result<HistoryEntry> {
        let prompt = prompt.trim();
        if image.trim().is_empty() || prompt.is_empty() {
            return Err(StudioError::Edit(MSG_NEED_INPUT.to_string()));
        }

        let result = self
            .editor
            .edit_image(image, prompt)
            .await
            .map_err(|e| StudioError::Edit(e.to_string()))?;

        match result.image_url {
            Some(result_image) => {
                let entry = HistoryEntry::new(image.to_string(), result_image, prompt.to_string());
                self.history.push(entry.clone());
                info!(id = %entry.id, history = self.history.len(), "edit recorded");
                Ok(entry)
            }
            None if !result.text.trim().is_empty() => Err(StudioError::Edit(result.text)),
            None => Err(StudioError::Edit(MSG_NO_RESULT_IMAGE.to_string())),
        }
    }

    /// Token used by [`Studio::start_bot`]: the configured one, else the cached credential.
    fn resolve_token(&self) -> Result<Option<String>> {
        if self.bot_config.has_token() {
            return Ok(Some(self.bot_config.bot_token.trim().to_string()));
        }
        self.credentials.load()
    }

    /// Starts polling. Fails before any network call when no token is available.
    /// A running bot for the same token is left alone; a new token replaces the old bot.
    pub fn start_bot(&mut self) -> Result<()> {
        let token = self
            .resolve_token()?
            .ok_or_else(|| StudioError::Config(MSG_NEED_TOKEN.to_string()))?;

        if let Some(active) = &self.bot {
            if active.token == token {
                active.manager.start();
                return Ok(());
            }
            active.manager.stop();
        }

        let client = TelegramClient::new(token.clone(), self.bot_config.telegram_api_url.clone())?;
        let manager = BotManager::new(
            Arc::new(client),
            self.editor.clone(),
            Arc::new(self.log.clone()),
            self.bot_config.poll_settings(),
        );
        manager.start();
        self.bot = Some(ActiveBot { token, manager });
        Ok(())
    }

    /// Returns false when no bot was running.
    pub fn stop_bot(&mut self) -> bool {
        self.bot
            .as_ref()
            .map(|active| active.manager.stop())
            .unwrap_or(false)
    }

    /// Flips the bot state; returns whether it is now active.
    pub fn toggle_bot(&mut self) -> Result<bool> {
        if self.is_bot_active() {
            self.stop_bot();
        } else {
            self.start_bot()?;
        }
        Ok(self.is_bot_active())
    }

    pub fn is_bot_active(&self) -> bool {
        self.bot
            .as_ref()
            .map(|active| active.manager.is_running())
            .unwrap_or(false)
    }

    /// Stops the bot and waits up to `grace` for its loop to finish.
    pub async fn shutdown(&mut self, grace: Duration) {
        if let Some(active) = self.bot.take() {
            active.manager.shutdown(grace).await;
        }
    }
}
