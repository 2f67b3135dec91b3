use thiserror::Error;

/// Failure of a single edit call. Never retried by the client.
#[derive(Error, Debug)]
pub enum EditError {
    /// No API key at call time; raised before any network call.
    #[error("API key is missing. Set GEMINI_API_KEY (or API_KEY) before editing images.")]
    MissingApiKey,

    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the backend; `body` is the raw response text.
    #[error("Gemini returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini response could not be decoded: {0}")]
    Decode(String),
}

impl EditError {
    pub fn is_missing_api_key(&self) -> bool {
        matches!(self, EditError::MissingApiKey)
    }
}
