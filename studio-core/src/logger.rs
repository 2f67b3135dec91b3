//! Tracing setup for the studio binaries: one plain-text fmt subscriber teed to stdout and an
//! append-only log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Log file used when `LOG_FILE` is unset.
pub const DEFAULT_LOG_FILE: &str = "logs/studio.log";

/// Directives applied when `RUST_LOG` is unset or unparsable. HTTP internals stay quiet.
pub const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opens `path` for appending, creating it and any missing parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
        _ => {}
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `RUST_LOG` when it parses, else [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Lines read `YYYY-MM-DD HH:MM:SS LEVEL target: message fields`.
///
/// Load `.env` first so `RUST_LOG` is visible. Fails if a subscriber is already set.
pub fn init_tracing(log_file: impl AsRef<Path>) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(log_file.as_ref())?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_writer(io::stdout.and(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing already initialized: {}", e))
}
