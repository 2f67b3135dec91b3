//! Error types for the studio core.
//!
//! [`StudioError`] is the top-level error shared by the Telegram layer and the host.

use thiserror::Error;

/// Top-level error (configuration, transport, platform response, edit backend, decoding, IO).
#[derive(Error, Debug)]
pub enum StudioError {
    /// Missing or invalid configuration, e.g. an empty bot token.
    #[error("Config error: {0}")]
    Config(String),

    /// Network failure or unreadable HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The chat platform answered with `ok: false`.
    #[error("Platform error: {0}")]
    Platform(String),

    /// The image edit backend failed.
    #[error("Edit error: {0}")]
    Edit(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// True for errors that abort an operation before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self, StudioError::Config(_))
    }
}

/// Result type for core operations; uses [`StudioError`].
pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_message() {
        let err = StudioError::Platform("Unauthorized".to_string());
        assert_eq!(err.to_string(), "Platform error: Unauthorized");
    }

    #[test]
    fn test_is_config() {
        assert!(StudioError::Config("no token".to_string()).is_config());
        assert!(!StudioError::Transport("reset".to_string()).is_config());
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StudioError = io.into();
        assert!(matches!(err, StudioError::Io(_)));
    }
}
