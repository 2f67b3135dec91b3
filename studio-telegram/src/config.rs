//! Bot config: token, Telegram API URL, polling knobs, log path.
//! Loaded from env: BOT_TOKEN, TELEGRAM_API_URL, POLL_TIMEOUT_SECS, POLL_RETRY_DELAY_SECS, LOG_FILE.

use anyhow::Result;
use std::env;
use std::time::Duration;
use studio_core::DEFAULT_LOG_FILE;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Server-side long-poll wait for `getUpdates`.
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 30;
/// Fixed delay before re-polling after a failed `getUpdates`.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Poll loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout_secs: u32,
    pub retry_delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

/// Telegram bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN; may be empty here, the host falls back to the cached credential.
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL, without trailing slash
    pub telegram_api_url: String,
    /// POLL_TIMEOUT_SECS
    pub poll_timeout_secs: u32,
    /// POLL_RETRY_DELAY_SECS
    pub retry_delay_secs: u64,
    /// LOG_FILE
    pub log_file: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token
            .or_else(|| env::var("BOT_TOKEN").ok())
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string());
        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);
        let retry_delay_secs = env::var("POLL_RETRY_DELAY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_SECS);
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            poll_timeout_secs,
            retry_delay_secs,
            log_file,
        })
    }

    /// Uses the given token; everything else at defaults.
    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }

    /// Validate config (API URL must parse, poll timeout at most 50s as Telegram allows).
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.telegram_api_url).is_err() {
            anyhow::bail!(
                "TELEGRAM_API_URL (or TELOXIDE_API_URL) is not a valid URL: {}",
                self.telegram_api_url
            );
        }
        if self.poll_timeout_secs > 50 {
            anyhow::bail!(
                "POLL_TIMEOUT_SECS must be at most 50, got {}",
                self.poll_timeout_secs
            );
        }
        Ok(())
    }

    pub fn has_token(&self) -> bool {
        !self.bot_token.trim().is_empty()
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            timeout_secs: self.poll_timeout_secs,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("BOT_TOKEN");
        env::remove_var("TELEGRAM_API_URL");
        env::remove_var("TELOXIDE_API_URL");
        env::remove_var("POLL_TIMEOUT_SECS");
        env::remove_var("POLL_RETRY_DELAY_SECS");
        env::remove_var("LOG_FILE");
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();
        env::set_var("BOT_TOKEN", "123:abc");

        let config = BotConfig::load(None).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.retry_delay_secs, 5);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert_eq!(config.poll_settings(), PollSettings::default());
        assert!(config.validate().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("TELOXIDE_API_URL", "http://127.0.0.1:8081/");
        env::set_var("POLL_TIMEOUT_SECS", "10");
        env::set_var("POLL_RETRY_DELAY_SECS", "2");
        env::set_var("LOG_FILE", "/tmp/studio.log");

        let config = BotConfig::load(Some("override".to_string())).unwrap();

        assert_eq!(config.bot_token, "override");
        assert_eq!(config.telegram_api_url, "http://127.0.0.1:8081");
        assert_eq!(config.poll_settings().timeout_secs, 10);
        assert_eq!(config.poll_settings().retry_delay, Duration::from_secs(2));
        assert_eq!(config.log_file, "/tmp/studio.log");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_loads_empty() {
        clear_env();
        let config = BotConfig::load(None).unwrap();
        assert!(!config.has_token());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BotConfig::with_token("t");
        config.telegram_api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = BotConfig::with_token("t");
        config.poll_timeout_secs = 90;
        assert!(config.validate().is_err());
    }
}
