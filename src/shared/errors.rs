//! Error handling for the application

use thiserror::Error;

/// Amount conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("negative amounts are not allowed: {0}")]
    Negative(String),

    #[error("expected a plain decimal number like 1.5, got \"{0}\"")]
    Malformed(String),
}

/// Signing and broadcast errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Transaction {index} has no actions")]
    EmptyTransaction { index: usize },

    #[error("Invalid action in transaction {index}: {reason}")]
    InvalidAction { index: usize, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Transaction {index} to {receiver_id} failed: {reason}")]
    TransactionFailed {
        index: usize,
        receiver_id: String,
        reason: String,
    },
}

/// General application error
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Blockchain \"{chain}\" is not currently supported")]
    UnsupportedBlockchain {
        chain: String,
        supported: Vec<String>,
    },

    #[error("Missing {} configuration: {}", .chain.to_uppercase(), .missing.join(", "))]
    MissingConfiguration { chain: String, missing: Vec<String> },

    #[error("Token \"{symbol}\" not found on {blockchain}")]
    TokenNotFound { symbol: String, blockchain: String },

    #[error("Execute command only supports NEAR tokens (nep141:*), got {0}")]
    UnsupportedAsset(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("{0}")]
    Api(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl SwapError {
    /// Follow-up lines shown under the error message.
    pub fn hints(&self) -> Vec<String> {
        match self {
            SwapError::UnsupportedBlockchain { supported, .. } => vec![
                format!("Currently supported blockchains: {}", supported.join(", ")),
                "Cross-chain swaps will be available in future releases.".to_string(),
            ],
            SwapError::MissingConfiguration { missing, .. } => {
                let mut lines = vec!["Required settings in ~/.occ/.env:".to_string()];
                lines.extend(missing.iter().map(|key| format!("  {}", key)));
                lines
            }
            SwapError::TokenNotFound { .. } => {
                vec!["Run: occ-swap swap tokens --refresh".to_string()]
            }
            SwapError::UnsupportedAsset(_) => vec![
                "For other blockchains, use your native wallet to send tokens to the deposit address"
                    .to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
