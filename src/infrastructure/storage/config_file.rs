use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::shared::config::{ConfigStore, Settings};
use crate::shared::errors::SwapError;

/// Settings stored as `KEY=VALUE` lines (`~/.occ/.env`)
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing file yields empty settings.
    fn load(&self) -> Result<Settings, SwapError> {
        if !self.path.exists() {
            debug!("No settings file at {}", self.path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            SwapError::Config(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(Settings::parse(&content))
    }

    fn save(&self, settings: &Settings) -> Result<(), SwapError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, settings.render()).map_err(|e| {
            SwapError::Config(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(dir.path().join(".env"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_update_keeps_existing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "NEAR_ACCOUNT_ADDRESS=alice.near\nNEAR_PRIVATE_KEY=ed25519:abc\nCUSTOM_FLAG=1\n",
        )
        .unwrap();
        let store = FileConfigStore::new(&path);

        let updated = store
            .update(&[("NEAR_NETWORK".to_string(), "mainnet".to_string())])
            .unwrap();

        assert_eq!(updated.near_network.as_deref(), Some("mainnet"));
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.near_private_key.as_deref(), Some("ed25519:abc"));
        assert_eq!(reloaded.get("custom_flag"), Some("1"));
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn test_update_keeps_lowercase_typed_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "near_rpc_url=https://rpc.example\nNEAR_ACCOUNT_ADDRESS=alice.near\n").unwrap();
        let store = FileConfigStore::new(&path);

        store
            .update(&[("NEAR_NETWORK".to_string(), "mainnet".to_string())])
            .unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.near_rpc_url.as_deref(), Some("https://rpc.example"));
        assert_eq!(reloaded.near_network.as_deref(), Some("mainnet"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("NEAR_PUBLIC_KEY"));
    }
}
