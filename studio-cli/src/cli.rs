//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use studio_telegram::BotConfig;

#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Photo edit studio: Gemini image edits, directly or through a Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot until Ctrl-C (token: --token, BOT_TOKEN, or the cached credential).
    Run {
        /// Bot token; also cached for later runs.
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Edit a local image with a text instruction.
    Edit {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        prompt: String,
        /// Output file; defaults to `<image stem>-edited.png` next to the input.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Manage the cached bot token.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Cache a bot token.
    Set { value: String },
    /// Print the cached token, masked.
    Show,
    /// Remove the cached token.
    Clear,
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    let config = BotConfig::load(token)?;
    config.validate()?;
    Ok(config)
}

/// `<dir>/<stem>-edited.png` for `<dir>/<stem>.<ext>`.
pub fn default_output_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{}-edited.png", stem))
}
