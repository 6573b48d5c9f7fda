//! Minimal NEAR JSON-RPC client: access-key lookup and transaction broadcast

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::shared::errors::ExecutionError;
use super::near_transaction::CryptoHash;

/// Nonce and a recent block hash for an access key
#[derive(Debug)]
pub struct AccessKeyView {
    pub nonce: u64,
    pub block_hash: CryptoHash,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

pub struct NearRpcClient {
    http_client: Client,
    url: String,
}

impl NearRpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            http_client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ExecutionError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "occ-swap",
            "method": method,
            "params": params,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecutionError::Rpc(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        debug!("🌐 {} {} -> {}", method, self.url, status.as_u16());

        let payload: RpcResponse = response
            .json()
            .await
            .map_err(|e| ExecutionError::Rpc(format!("invalid {} response ({}): {}", method, status, e)))?;

        if let Some(error) = payload.error {
            return Err(ExecutionError::Rpc(rpc_error_message(&error)));
        }
        payload
            .result
            .ok_or_else(|| ExecutionError::Rpc(format!("{} returned no result", method)))
    }

    pub async fn view_access_key(
        &self,
        account_id: &str,
        public_key: &str,
    ) -> Result<AccessKeyView, ExecutionError> {
        let result = self
            .call(
                "query",
                json!({
                    "request_type": "view_access_key",
                    "finality": "final",
                    "account_id": account_id,
                    "public_key": public_key,
                }),
            )
            .await?;
        parse_access_key(&result)
    }

    /// Broadcast and wait for the final outcome. Returns the transaction hash.
    pub async fn broadcast_tx_commit(&self, signed_base64: &str) -> Result<String, ExecutionError> {
        let result = self
            .call("broadcast_tx_commit", json!([signed_base64]))
            .await?;
        parse_outcome(&result)
    }
}

/// Older nodes report a missing key as `result.error` instead of a top-level error.
pub fn parse_access_key(result: &Value) -> Result<AccessKeyView, ExecutionError> {
    if let Some(error) = result.get("error").and_then(Value::as_str) {
        return Err(ExecutionError::Rpc(error.to_string()));
    }

    let nonce = result
        .get("nonce")
        .and_then(Value::as_u64)
        .ok_or_else(|| ExecutionError::Rpc("access key response has no nonce".to_string()))?;
    let block_hash = result
        .get("block_hash")
        .and_then(Value::as_str)
        .ok_or_else(|| ExecutionError::Rpc("access key response has no block_hash".to_string()))?;

    Ok(AccessKeyView {
        nonce,
        block_hash: CryptoHash::from_base58(block_hash).map_err(ExecutionError::Rpc)?,
    })
}

pub fn parse_outcome(result: &Value) -> Result<String, ExecutionError> {
    let hash = result
        .pointer("/transaction/hash")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match result.get("status") {
        Some(status) if status.get("Failure").is_some() => Err(ExecutionError::Rejected(format!(
            "{} {}",
            hash,
            status["Failure"]
        ))),
        Some(_) if !hash.is_empty() => Ok(hash),
        Some(_) => Err(ExecutionError::Rpc("outcome has no transaction hash".to_string())),
        None => Err(ExecutionError::Rpc("outcome has no status".to_string())),
    }
}

/// Flatten a JSON-RPC error object into one line, most specific part first.
pub fn rpc_error_message(error: &Value) -> String {
    if let Some(text) = error.as_str() {
        return text.to_string();
    }
    let cause = error.pointer("/cause/name").and_then(Value::as_str);
    let data = error.get("data").map(|data| match data.as_str() {
        Some(text) => text.to_string(),
        None => data.to_string(),
    });
    let message = error.get("message").and_then(Value::as_str);

    match (cause, data, message) {
        (Some(cause), Some(data), _) => format!("{}: {}", cause, data),
        (Some(cause), None, _) => cause.to_string(),
        (None, Some(data), _) => data,
        (None, None, Some(message)) => message.to_string(),
        (None, None, None) => error.to_string(),
    }
}
