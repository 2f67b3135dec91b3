//! studio CLI: run the Telegram bot, edit a local image, manage the cached bot token.
//! Config from env (`.env` is loaded first) and optional CLI args.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use image_edit_client::{decode_data_uri, mask_token, mime_for_path, to_data_uri, GeminiImageEditor};
use studio_cli::{default_output_path, load_config, Cli, Commands, CredentialStore, Studio, TokenAction};
use studio_core::init_tracing;
use studio_telegram::BotConfig;
use tracing::{info, warn};

/// How long `run` waits for the poll loop after Ctrl-C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => handle_run(token).await,
        Commands::Edit { image, prompt, out } => handle_edit(image, prompt, out).await,
        Commands::Token { action } => handle_token(action),
    }
}

fn gemini_editor() -> Result<Arc<GeminiImageEditor>> {
    let editor = GeminiImageEditor::from_env();
    editor.config().validate()?;
    if editor.config().api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every edit will fail until it is");
    }
    Ok(Arc::new(editor))
}

/// Runs the bot until Ctrl-C, then stops it and waits for the loop to wind down.
async fn handle_run(token: Option<String>) -> Result<()> {
    let config = load_config(token.clone())?;
    init_tracing(&config.log_file)?;

    let credentials = CredentialStore::from_env();
    if let Some(token) = token.as_deref() {
        credentials.save(token).context("Cache bot token")?;
    }

    let mut studio = Studio::new(gemini_editor()?, credentials, config);
    studio.start_bot()?;
    println!("Bot running. Press Ctrl-C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Listen for Ctrl-C")?;
    info!("shutdown requested");
    studio.stop_bot();
    studio.shutdown(SHUTDOWN_GRACE).await;

    for entry in studio.log().entries() {
        println!("{}", entry.display_line());
    }
    Ok(())
}

/// Edits one local image and writes the PNG result.
async fn handle_edit(image: PathBuf, prompt: String, out: Option<PathBuf>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_target(false)
        .init();

    let bytes = std::fs::read(&image)
        .with_context(|| format!("Read image {}", image.display()))?;
    let source = to_data_uri(mime_for_path(&image.to_string_lossy()), &bytes);

    let mut studio = Studio::new(
        gemini_editor()?,
        CredentialStore::from_env(),
        BotConfig::load(None)?,
    );
    let entry = studio.edit(&source, &prompt).await?;

    let out = out.unwrap_or_else(|| default_output_path(&image));
    let png = decode_data_uri(&entry.result_image)?;
    std::fs::write(&out, &png).with_context(|| format!("Write result {}", out.display()))?;

    println!("Saved {} ({} bytes)", out.display(), png.len());
    println!();
    println!("History:");
    for (i, e) in studio.history().iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            i + 1,
            e.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
            e.prompt
        );
    }
    Ok(())
}

fn handle_token(action: TokenAction) -> Result<()> {
    let store = CredentialStore::from_env();
    match action {
        TokenAction::Set { value } => {
            store.save(&value)?;
            println!("Token saved to {}", store.path().display());
        }
        TokenAction::Show => match store.load()? {
            Some(token) => println!("{}", mask_token(&token)),
            None => println!("No token saved."),
        },
        TokenAction::Clear => {
            store.clear()?;
            println!("Token cleared.");
        }
    }
    Ok(())
}
