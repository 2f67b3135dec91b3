//! Bot token persisted as a single file under the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use studio_core::Result;
use tracing::debug;

/// File name of the cached bot token.
pub const TOKEN_FILE: &str = "tg_bot_token";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Loads, saves and clears `<data_dir>/tg_bot_token`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TOKEN_FILE),
        }
    }

    /// Data dir from STUDIO_DATA_DIR, default `./data`.
    pub fn from_env() -> Self {
        let dir = std::env::var("STUDIO_DATA_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached token, or None when the file is missing or blank.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Saves the trimmed token; a blank token clears the store instead.
    pub fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return self.clear();
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        debug!(path = %self.path.display(), "bot token saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_from_env_uses_data_dir() {
        std::env::set_var("STUDIO_DATA_DIR", "/tmp/studio-data");
        let store = CredentialStore::from_env();
        std::env::remove_var("STUDIO_DATA_DIR");
        assert_eq!(store.path(), Path::new("/tmp/studio-data/tg_bot_token"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_local_data() {
        std::env::remove_var("STUDIO_DATA_DIR");
        let store = CredentialStore::from_env();
        assert_eq!(store.path(), Path::new("./data").join(TOKEN_FILE));
    }

    #[test]
    fn test_missing_file_is_no_credential() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_trims_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nested"));
        store.save("  123:abc\n").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("123:abc"));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "123:abc");
    }

    #[test]
    fn test_blank_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        fs::write(store.path(), "   \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("123:abc").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_saving_blank_clears() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save("123:abc").unwrap();
        store.save("  ").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
