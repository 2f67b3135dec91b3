//! Telegram Bot API over reqwest. Implements [`ChatApi`]; the token is embedded in every URL path
//! and stripped from transport errors before they are logged.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use studio_core::{ChatApi, Result, StudioError, Update};
use tracing::{debug, instrument};

use crate::config::BotConfig;

/// Telegram's lightweight markup mode, used for every outbound message.
pub const PARSE_MODE: &str = "Markdown";
/// File name of the edited image in `sendPhoto`.
const PHOTO_FILE_NAME: &str = "edited.png";
/// Slack on top of the server-side long-poll wait before the client gives up on `getUpdates`.
const POLL_GRACE_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgFile {
    file_path: Option<String>,
}

/// Raw Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    /// Fails with a config error when the token is blank, before any network call.
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(StudioError::Config(
                "Telegram bot token is empty".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(config.bot_token.clone(), config.telegram_api_url.clone())
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_url,
            self.token,
            file_path.trim_start_matches('/')
        )
    }

    /// Reads a `{ok, result, description}` envelope. Telegram also uses it on 4xx, so status is not checked first.
    async fn read_envelope<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status();
        let body: TgResponse<T> = response.json().await.map_err(|e| {
            StudioError::Transport(format!(
                "{} parse failed (HTTP {}): {}",
                method,
                status.as_u16(),
                e.without_url()
            ))
        })?;
        if !body.ok {
            return Err(StudioError::Platform(
                body.description
                    .unwrap_or_else(|| format!("{} failed", method)),
            ));
        }
        Ok(body.result)
    }
}

fn transport(method: &str, e: reqwest::Error) -> StudioError {
    StudioError::Transport(format!("{} request failed: {}", method, e.without_url()))
}

#[async_trait]
impl ChatApi for TelegramClient {
    #[instrument(skip(self))]
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>> {
        let response = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset.to_string()), ("timeout", timeout_secs.to_string())])
            .timeout(Duration::from_secs(u64::from(timeout_secs) + POLL_GRACE_SECS))
            .send()
            .await
            .map_err(|e| transport("getUpdates", e))?;
        let updates: Vec<Update> = Self::read_envelope("getUpdates", response)
            .await?
            .unwrap_or_default();
        debug!(count = updates.len(), "getUpdates returned");
        Ok(updates)
    }

    #[instrument(skip(self))]
    async fn get_file_path(&self, file_id: &str) -> Result<String> {
        let response = self
            .http
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| transport("getFile", e))?;
        let file: Option<TgFile> = Self::read_envelope("getFile", response)
            .await
            .map_err(|e| match e {
                StudioError::Platform(msg) => {
                    StudioError::Platform(format!("Could not get file path: {}", msg))
                }
                other => other,
            })?;
        file.and_then(|f| f.file_path)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StudioError::Platform("Could not get file path".to_string()))
    }

    #[instrument(skip(self))]
    async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(self.file_url(file_path))
            .send()
            .await
            .map_err(|e| transport("file download", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::Transport(format!(
                "file download failed: HTTP {}",
                status.as_u16()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport("file download", e))?;
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport("sendMessage", e))?;
        Self::read_envelope::<serde_json::Value>("sendMessage", response).await?;
        Ok(())
    }

    #[instrument(skip(self, png, caption), fields(png_len = png.len()))]
    async fn send_photo(&self, chat_id: i64, png: Vec<u8>, caption: &str) -> Result<()> {
        let photo = Part::bytes(png)
            .file_name(PHOTO_FILE_NAME)
            .mime_str("image/png")
            .map_err(|e| transport("sendPhoto", e))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", photo)
            .text("caption", caption.to_string())
            .text("parse_mode", PARSE_MODE);
        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport("sendPhoto", e))?;
        Self::read_envelope::<serde_json::Value>("sendPhoto", response).await?;
        Ok(())
    }
}
