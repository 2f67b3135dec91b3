//! Gemini client configuration, loaded from environment variables.

use anyhow::Result;
use std::env;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Gemini connection settings. The key is optional here and checked on each call.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// GEMINI_API_KEY or API_KEY
    pub api_key: Option<String>,
    /// GEMINI_API_BASE, without trailing slash
    pub api_base: String,
    /// GEMINI_MODEL
    pub model: String,
}

impl GeminiConfig {
    /// Load from environment variables; blank values count as unset.
    pub fn from_env() -> Self {
        let api_key = non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("API_KEY"));
        let api_base = non_empty_env("GEMINI_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = non_empty_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            api_key,
            api_base,
            model,
        }
    }

    /// Defaults with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()).filter(|k: &String| !k.trim().is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Points the client at another base URL (mock servers, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Validate config (api_base must be a valid URL, model non-empty).
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.api_base).is_err() {
            anyhow::bail!("GEMINI_API_BASE is not a valid URL: {}", self.api_base);
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("GEMINI_MODEL must not be empty");
        }
        Ok(())
    }

    /// `{api_base}/models/{model}:generateContent`; accepts models given as `models/<name>`.
    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
