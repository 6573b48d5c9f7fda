//! Registry of generated wallets (`wallets.json`); public data only

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::shared::errors::SwapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletChain {
    Solana,
    Near,
}

impl fmt::Display for WalletChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletChain::Solana => write!(f, "solana"),
            WalletChain::Near => write!(f, "near"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub chain: WalletChain,
    pub network: String,
    pub public_key: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl WalletInfo {
    fn same_wallet(&self, other: &WalletInfo) -> bool {
        self.chain == other.chain
            && self.network == other.network
            && self.public_key == other.public_key
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletsDocument {
    pub wallets: Vec<WalletInfo>,
}

pub struct WalletRegistry {
    path: PathBuf,
}

impl WalletRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing or unreadable registries load as empty.
    pub fn load(&self) -> WalletsDocument {
        if !self.path.exists() {
            return WalletsDocument::default();
        }
        match fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|data| serde_json::from_str(&data).map_err(|e| e.to_string()))
        {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to load wallets registry {}: {}", self.path.display(), e);
                WalletsDocument::default()
            }
        }
    }

    pub fn save(&self, document: &WalletsDocument) -> Result<(), SwapError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| SwapError::Config(format!("Failed to encode wallets registry: {}", e)))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Insert, or replace the entry with the same (chain, network, public key).
    pub fn upsert(&self, wallet: WalletInfo) -> Result<(), SwapError> {
        let mut document = self.load();
        match document.wallets.iter_mut().find(|w| w.same_wallet(&wallet)) {
            Some(existing) => *existing = wallet,
            None => document.wallets.push(wallet),
        }
        self.save(&document)
    }

    pub fn by_chain(&self, chain: WalletChain) -> Vec<WalletInfo> {
        self.load()
            .wallets
            .into_iter()
            .filter(|w| w.chain == chain)
            .collect()
    }

    pub fn by_chain_and_network(&self, chain: WalletChain, network: &str) -> Option<WalletInfo> {
        self.load()
            .wallets
            .into_iter()
            .find(|w| w.chain == chain && w.network == network)
    }
}
