//! Gemini image edit client.
//!
//! Sends an image and a free-text instruction to Gemini `generateContent` and maps the reply into
//! an [`EditResult`]: the first inline image as a PNG data URI and the last text part.

mod client;
mod config;
mod data_uri;
mod error;

pub use client::{EditResult, GeminiImageEditor, ImageEditor};
pub use config::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use data_uri::{
    data_uri_mime, decode_data_uri, mime_for_path, strip_data_uri_prefix, to_data_uri,
};
pub use error::EditError;

/// Masks an API key for logging: first 7 + `***` + last 4; keys of 11 chars or fewer become `***`.
pub fn mask_token(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
