//! Gemini `generateContent` client for image edits.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::config::GeminiConfig;
use crate::data_uri::{data_uri_mime, strip_data_uri_prefix};
use crate::error::EditError;
use crate::mask_token;

/// Mimetype sent when the input carries no data-URI prefix.
const DEFAULT_INPUT_MIME: &str = "image/jpeg";
/// Prefix of every returned image, whatever the backend's mimetype.
const RESULT_PREFIX: &str = "data:image/png;base64,";

/// Outcome of one edit: the generated image (as a PNG data URI) and/or the model's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    pub image_url: Option<String>,
    pub text: String,
}

impl EditResult {
    /// No image and no text.
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.text.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Edits an image according to a free-text instruction.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// `image` is base64, optionally wrapped in a `data:image/...;base64,` prefix.
    async fn edit_image(&self, image: &str, instruction: &str) -> Result<EditResult, EditError>;
}

/// Gemini-backed [`ImageEditor`]. Stateless; cheap to clone.
#[derive(Clone)]
pub struct GeminiImageEditor {
    http: reqwest::Client,
    config: Arc<GeminiConfig>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(default)]
    data: String,
}

impl GeminiImageEditor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }

    /// Client configured from GEMINI_API_KEY / API_KEY, GEMINI_API_BASE, GEMINI_MODEL.
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn request_body(&self, image: &str, instruction: &str) -> serde_json::Value {
        let mime = data_uri_mime(image).unwrap_or(DEFAULT_INPUT_MIME);
        json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": mime, "data": strip_data_uri_prefix(image) } },
                    { "text": instruction }
                ]
            }]
        })
    }
}

/// First inline image (re-wrapped as PNG data URI) and last text part of the first candidate.
fn parse_result(response: GenerateContentResponse) -> EditResult {
    let mut result = EditResult::default();
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    for part in parts {
        if let Some(inline) = part.inline_data.filter(|d| !d.data.is_empty()) {
            if result.image_url.is_none() {
                result.image_url = Some(format!("{}{}", RESULT_PREFIX, inline.data));
            }
        } else if let Some(text) = part.text.filter(|t| !t.is_empty()) {
            result.text = text;
        }
    }
    result
}

#[async_trait]
impl ImageEditor for GeminiImageEditor {
    #[instrument(skip(self, image), fields(model = %self.config.model))]
    async fn edit_image(&self, image: &str, instruction: &str) -> Result<EditResult, EditError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(EditError::MissingApiKey)?;

        let endpoint = self.config.endpoint();
        info!(
            endpoint = %endpoint,
            image_b64_len = strip_data_uri_prefix(image).len(),
            instruction_preview = %instruction.chars().take(100).collect::<String>(),
            api_key = %mask_token(api_key),
            "Gemini image edit request"
        );

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(image, instruction))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                EditError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Gemini returned an error status");
            return Err(EditError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| EditError::Decode(e.to_string()))?;
        let result = parse_result(parsed);

        info!(
            has_image = result.has_image(),
            text_len = result.text.len(),
            "Gemini image edit completed"
        );
        Ok(result)
    }
}
