//! Execution domain - unsigned transaction model and sequential signing

mod transaction_executor;
mod transaction_validator;

pub use transaction_executor::TransactionExecutor;
pub use transaction_validator::{FunctionCall, TransactionValidator};

use async_trait::async_trait;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::blockchain::ChainCredentials;
use crate::shared::errors::ExecutionError;

/// Transaction as returned by the execute endpoint, not yet signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub receiver_id: String,
    pub actions: Vec<TransactionAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ActionParams,
}

/// Gas and deposit are kept as decimal strings; the API may send either
/// strings or plain JSON integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    pub method_name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(deserialize_with = "integer_string")]
    pub gas: String,
    #[serde(deserialize_with = "integer_string")]
    pub deposit: String,
}

fn integer_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => number
            .as_u64()
            .map(|n| n.to_string())
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, got {}", number))),
        other => Err(D::Error::custom(format!(
            "expected an integer or a decimal string, got {}",
            other
        ))),
    }
}

/// Key material and endpoint for one signing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerCredentials {
    pub account_id: String,
    pub private_key: String,
    pub network: String,
    pub rpc_url: String,
}

impl From<&ChainCredentials> for SignerCredentials {
    fn from(creds: &ChainCredentials) -> Self {
        Self {
            account_id: creds.account_id.clone(),
            private_key: creds.private_key.clone(),
            network: creds.network.clone(),
            rpc_url: creds.rpc_url.clone(),
        }
    }
}

/// An authenticated session able to sign and broadcast one transaction at a time.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Sign `actions` as a single transaction to `receiver_id` and wait for
    /// the outcome. Returns the confirmation identifier (transaction hash).
    async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: &[FunctionCall],
    ) -> Result<String, ExecutionError>;
}

/// Opens signing sessions.
#[async_trait]
pub trait SignerConnector: Send + Sync {
    async fn connect(
        &self,
        credentials: &SignerCredentials,
    ) -> Result<Box<dyn TransactionSigner>, ExecutionError>;
}
