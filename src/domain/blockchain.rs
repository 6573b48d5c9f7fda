//! Supported-chain gating and per-chain settings validation

use crate::shared::config::Settings;
use crate::shared::errors::SwapError;

/// Chains accepted end-to-end. Everything else is rejected before any I/O.
pub const SUPPORTED_BLOCKCHAINS: [&str; 1] = ["near"];

pub const DEFAULT_BLOCKCHAIN: &str = "near";

pub fn is_supported_blockchain(blockchain: &str) -> bool {
    SUPPORTED_BLOCKCHAINS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(blockchain))
}

/// Normalize to lowercase and reject unsupported chains.
pub fn ensure_supported(blockchain: &str) -> Result<String, SwapError> {
    let chain = blockchain.trim().to_lowercase();
    if is_supported_blockchain(&chain) {
        Ok(chain)
    } else {
        Err(SwapError::UnsupportedBlockchain {
            chain,
            supported: SUPPORTED_BLOCKCHAINS.iter().map(|c| c.to_string()).collect(),
        })
    }
}

/// Setting names a chain needs for swaps, in reporting order.
pub fn required_settings(blockchain: &str) -> Vec<String> {
    let prefix = blockchain.to_uppercase();
    [
        "ACCOUNT_ADDRESS",
        "PRIVATE_KEY",
        "RECIPIENT_ADDRESS",
        "REFUND_ADDRESS",
        "NETWORK",
        "RPC_URL",
    ]
    .iter()
    .map(|suffix| format!("{}_{}", prefix, suffix))
    .collect()
}

/// Fully configured chain credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainCredentials {
    pub blockchain: String,
    pub account_id: String,
    pub private_key: String,
    pub recipient_address: String,
    pub refund_address: String,
    pub network: String,
    pub rpc_url: String,
}

/// Check every required setting is present for `blockchain`.
pub fn validate_chain_settings(
    blockchain: &str,
    settings: &Settings,
) -> Result<ChainCredentials, SwapError> {
    let chain = settings.chain(blockchain);
    let names = required_settings(blockchain);
    let values = [
        &chain.account_address,
        &chain.private_key,
        &chain.recipient_address,
        &chain.refund_address,
        &chain.network,
        &chain.rpc_url,
    ];

    let missing: Vec<String> = names
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.clone())
        .collect();

    match (
        chain.account_address,
        chain.private_key,
        chain.recipient_address,
        chain.refund_address,
        chain.network,
        chain.rpc_url,
    ) {
        (
            Some(account_id),
            Some(private_key),
            Some(recipient_address),
            Some(refund_address),
            Some(network),
            Some(rpc_url),
        ) => {
            Ok(ChainCredentials {
                blockchain: blockchain.to_lowercase(),
                account_id,
                private_key,
                recipient_address,
                refund_address,
                network,
                rpc_url,
            })
        }
        _ => Err(SwapError::MissingConfiguration {
            chain: blockchain.to_lowercase(),
            missing,
        }),
    }
}
