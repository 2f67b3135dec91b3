//! # studio-cli
//!
//! Host for the photo edit studio: credential store, [`Studio`] (edit history, event log, bot
//! switch) and the `studio` command line.

pub mod cli;
pub mod credential;
pub mod studio;

pub use cli::{default_output_path, load_config, Cli, Commands, TokenAction};
pub use credential::{CredentialStore, DEFAULT_DATA_DIR, TOKEN_FILE};
pub use studio::{Studio, MSG_NEED_INPUT, MSG_NEED_TOKEN, MSG_NO_RESULT_IMAGE};
