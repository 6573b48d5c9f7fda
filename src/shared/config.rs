//! Settings file model (`KEY=VALUE` lines in `~/.occ/.env`)

use std::collections::BTreeMap;

use crate::shared::errors::SwapError;

pub const API_BASE_URL: &str = "https://api.openclawchain.org/api/v1";

const HEADER: [&str; 2] = ["# OpenClawChain Configuration", "# Generated by occ-swap"];

/// Keys that map onto typed fields, in the order they are written back.
pub const TYPED_KEYS: [&str; 12] = [
    "OCC_API_KEY",
    "SOLANA_PUBLIC_KEY",
    "SOLANA_PRIVATE_KEY",
    "NEAR_PUBLIC_KEY",
    "NEAR_ACCOUNT_ADDRESS",
    "NEAR_PRIVATE_KEY",
    "NEAR_MAINNET_ACCOUNT_ADDRESS",
    "NEAR_MAINNET_PRIVATE_KEY",
    "NEAR_RECIPIENT_ADDRESS",
    "NEAR_REFUND_ADDRESS",
    "NEAR_NETWORK",
    "NEAR_RPC_URL",
];

/// Local settings loaded once per invocation.
///
/// Every key read from the file is also kept in `extra` under its lowercase
/// name, so chains without typed fields can still be looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub solana_public_key: Option<String>,
    pub solana_private_key: Option<String>,
    pub near_public_key: Option<String>,
    pub near_account_address: Option<String>,
    pub near_private_key: Option<String>,
    pub near_mainnet_account_address: Option<String>,
    pub near_mainnet_private_key: Option<String>,
    pub near_recipient_address: Option<String>,
    pub near_refund_address: Option<String>,
    pub near_network: Option<String>,
    pub near_rpc_url: Option<String>,
    /// `near_public_key` was copied from `NEAR_ACCOUNT_ADDRESS`; never written back.
    pub near_public_key_derived: bool,
    pub extra: BTreeMap<String, String>,
}

/// Per-chain view of the settings; any field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSettings {
    pub account_address: Option<String>,
    pub private_key: Option<String>,
    pub recipient_address: Option<String>,
    pub refund_address: Option<String>,
    pub network: Option<String>,
    pub rpc_url: Option<String>,
}

impl Settings {
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (key, value) = match trimmed.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (trimmed, ""),
            };
            settings.set(key, value);
        }
        settings
    }

    /// Set a key; an empty value clears it. Typed keys match in any case.
    pub fn set(&mut self, key: &str, value: &str) {
        let upper = key.trim().to_uppercase();
        let value = value.trim();
        let stored = (!value.is_empty()).then(|| value.to_string());

        match upper.as_str() {
            "NEAR_ACCOUNT_ADDRESS" if self.near_public_key.is_none() || self.near_public_key_derived => {
                self.near_public_key_derived = stored.is_some();
                self.near_public_key = stored.clone();
            }
            "NEAR_PUBLIC_KEY" => self.near_public_key_derived = false,
            _ => {}
        }
        if let Some(slot) = self.slot_mut(&upper) {
            *slot = stored.clone();
        }
        match stored {
            Some(value) => {
                self.extra.insert(upper.to_lowercase(), value);
            }
            None => {
                self.extra.remove(&upper.to_lowercase());
            }
        }
    }

    /// Look up any key, typed or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(slot) = self.slot(&key.to_uppercase()) {
            return slot.as_deref();
        }
        self.extra.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn chain(&self, blockchain: &str) -> ChainSettings {
        let chain = blockchain.to_lowercase();
        if chain == "near" {
            return ChainSettings {
                account_address: self
                    .near_mainnet_account_address
                    .clone()
                    .or_else(|| self.near_account_address.clone()),
                private_key: self
                    .near_mainnet_private_key
                    .clone()
                    .or_else(|| self.near_private_key.clone()),
                recipient_address: self.near_recipient_address.clone(),
                refund_address: self.near_refund_address.clone(),
                network: self.near_network.clone(),
                rpc_url: self.near_rpc_url.clone(),
            };
        }

        let lookup = |suffix: &str| self.extra.get(&format!("{}_{}", chain, suffix)).cloned();
        ChainSettings {
            account_address: lookup("account_address"),
            private_key: lookup("private_key"),
            recipient_address: lookup("recipient_address"),
            refund_address: lookup("refund_address"),
            network: lookup("network"),
            rpc_url: lookup("rpc_url"),
        }
    }

    /// Render back to file form. Typed keys first, then the remaining extras.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = HEADER.iter().map(|line| line.to_string()).collect();
        lines.push(String::new());

        for (key, value) in self.persisted_typed() {
            lines.push(format!("{}={}", key, value));
        }
        for (key, value) in &self.extra {
            let upper = key.to_uppercase();
            if !TYPED_KEYS.contains(&upper.as_str()) {
                lines.push(format!("{}={}", upper, value));
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }

    /// All set keys in render order, for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .persisted_typed()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        entries.extend(
            self.extra
                .iter()
                .map(|(key, value)| (key.to_uppercase(), value.clone()))
                .filter(|(key, _)| !TYPED_KEYS.contains(&key.as_str())),
        );
        entries
    }

    fn persisted_typed(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        TYPED_KEYS
            .iter()
            .filter(|key| !(self.near_public_key_derived && **key == "NEAR_PUBLIC_KEY"))
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
    }

    fn slot(&self, key: &str) -> Option<&Option<String>> {
        let slot = match key {
            "OCC_API_KEY" => &self.api_key,
            "SOLANA_PUBLIC_KEY" => &self.solana_public_key,
            "SOLANA_PRIVATE_KEY" => &self.solana_private_key,
            "NEAR_PUBLIC_KEY" => &self.near_public_key,
            "NEAR_ACCOUNT_ADDRESS" => &self.near_account_address,
            "NEAR_PRIVATE_KEY" => &self.near_private_key,
            "NEAR_MAINNET_ACCOUNT_ADDRESS" => &self.near_mainnet_account_address,
            "NEAR_MAINNET_PRIVATE_KEY" => &self.near_mainnet_private_key,
            "NEAR_RECIPIENT_ADDRESS" => &self.near_recipient_address,
            "NEAR_REFUND_ADDRESS" => &self.near_refund_address,
            "NEAR_NETWORK" => &self.near_network,
            "NEAR_RPC_URL" => &self.near_rpc_url,
            _ => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "OCC_API_KEY" => &mut self.api_key,
            "SOLANA_PUBLIC_KEY" => &mut self.solana_public_key,
            "SOLANA_PRIVATE_KEY" => &mut self.solana_private_key,
            "NEAR_PUBLIC_KEY" => &mut self.near_public_key,
            "NEAR_ACCOUNT_ADDRESS" => &mut self.near_account_address,
            "NEAR_PRIVATE_KEY" => &mut self.near_private_key,
            "NEAR_MAINNET_ACCOUNT_ADDRESS" => &mut self.near_mainnet_account_address,
            "NEAR_MAINNET_PRIVATE_KEY" => &mut self.near_mainnet_private_key,
            "NEAR_RECIPIENT_ADDRESS" => &mut self.near_recipient_address,
            "NEAR_REFUND_ADDRESS" => &mut self.near_refund_address,
            "NEAR_NETWORK" => &mut self.near_network,
            "NEAR_RPC_URL" => &mut self.near_rpc_url,
            _ => return None,
        };
        Some(slot)
    }
}

/// Settings repository, injected into every command.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<Settings, SwapError>;

    fn save(&self, settings: &Settings) -> Result<(), SwapError>;

    /// Load, apply `updates` in order, save. Returns the saved settings.
    fn update(&self, updates: &[(String, String)]) -> Result<Settings, SwapError> {
        let mut settings = self.load()?;
        for (key, value) in updates {
            settings.set(key, value);
        }
        self.save(&settings)?;
        Ok(settings)
    }
}
