//! NEAR signing session built on the JSON-RPC client

use std::sync::Mutex;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use tracing::{debug, info};

use crate::domain::execution::{
    FunctionCall, SignerConnector, SignerCredentials, TransactionExecutor, TransactionSigner,
    UnsignedTransaction,
};
use crate::shared::errors::ExecutionError;
use super::key_material::{encode_public_key, parse_secret_key};
use super::near_rpc::NearRpcClient;
use super::near_transaction::{Action, NearPublicKey, Transaction};

/// One account, one access key. Nonces grow monotonically within the session.
pub struct NearSigner {
    rpc: NearRpcClient,
    account_id: String,
    network: String,
    signing_key: SigningKey,
    public_key: String,
    last_nonce: Mutex<u64>,
}

impl NearSigner {
    /// Parse the key and make sure it is registered on the account.
    pub async fn connect(credentials: &SignerCredentials) -> Result<Self, ExecutionError> {
        let signing_key = parse_secret_key(&credentials.private_key)?;
        let public_key = encode_public_key(&signing_key.verifying_key());
        let rpc = NearRpcClient::new(&credentials.rpc_url);

        let view = rpc
            .view_access_key(&credentials.account_id, &public_key)
            .await?;
        info!(
            "🔑 Connected to NEAR {} as {} ({})",
            credentials.network, credentials.account_id, public_key
        );

        Ok(Self {
            rpc,
            account_id: credentials.account_id.clone(),
            network: credentials.network.clone(),
            signing_key,
            public_key,
            last_nonce: Mutex::new(view.nonce),
        })
    }

    fn next_nonce(&self, chain_nonce: u64) -> Result<u64, ExecutionError> {
        let mut last = self
            .last_nonce
            .lock()
            .map_err(|_| ExecutionError::Rpc("nonce lock poisoned".to_string()))?;
        let nonce = chain_nonce.max(*last) + 1;
        *last = nonce;
        Ok(nonce)
    }
}

#[async_trait]
impl TransactionSigner for NearSigner {
    async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: &[FunctionCall],
    ) -> Result<String, ExecutionError> {
        let view = self
            .rpc
            .view_access_key(&self.account_id, &self.public_key)
            .await?;
        let nonce = self.next_nonce(view.nonce)?;

        let transaction = Transaction {
            signer_id: self.account_id.clone(),
            public_key: NearPublicKey(self.signing_key.verifying_key().to_bytes()),
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash: view.block_hash,
            actions: actions.iter().map(Action::from).collect(),
        };

        let signed = transaction
            .sign(&self.signing_key)
            .map_err(|e| ExecutionError::Rpc(format!("failed to encode transaction: {}", e)))?;
        let payload = signed
            .to_base64()
            .map_err(|e| ExecutionError::Rpc(format!("failed to encode transaction: {}", e)))?;
        debug!(
            "Signed tx {} on {} nonce={} receiver={}",
            signed.hash.to_base58(),
            self.network,
            nonce,
            receiver_id
        );

        self.rpc.broadcast_tx_commit(&payload).await
    }
}

/// Connector handed to the application layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearSignerConnector;

#[async_trait]
impl SignerConnector for NearSignerConnector {
    async fn connect(
        &self,
        credentials: &SignerCredentials,
    ) -> Result<Box<dyn TransactionSigner>, ExecutionError> {
        let signer = NearSigner::connect(credentials).await?;
        Ok(Box::new(signer))
    }
}

/// Sign and broadcast `transactions` in order from one account.
/// Returns one transaction hash per entry.
pub async fn sign_and_send_multiple_transactions(
    account_id: &str,
    private_key: &str,
    transactions: &[UnsignedTransaction],
    network: &str,
    rpc_url: &str,
) -> Result<Vec<String>, ExecutionError> {
    let credentials = SignerCredentials {
        account_id: account_id.to_string(),
        private_key: private_key.to_string(),
        network: network.to_string(),
        rpc_url: rpc_url.to_string(),
    };
    let signer = NearSigner::connect(&credentials).await?;
    TransactionExecutor::new(&signer).execute_all(transactions).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::{ActionParams, TransactionAction};

    #[tokio::test]
    async fn test_invalid_key_fails_before_any_request() {
        let transactions = vec![UnsignedTransaction {
            receiver_id: "usdc.near".to_string(),
            actions: vec![TransactionAction {
                kind: "FunctionCall".to_string(),
                params: ActionParams {
                    method_name: "ft_transfer".to_string(),
                    args: serde_json::json!({}),
                    gas: "1".to_string(),
                    deposit: "1".to_string(),
                },
            }],
        }];

        let result = sign_and_send_multiple_transactions(
            "alice.near",
            "secp256k1:abc",
            &transactions,
            "mainnet",
            "http://127.0.0.1:9",
        )
        .await;
        assert!(matches!(result, Err(ExecutionError::InvalidKey(_))));
    }

    #[test]
    fn test_nonce_is_monotonic() {
        let signer = NearSigner {
            rpc: NearRpcClient::new("http://127.0.0.1:9"),
            account_id: "alice.near".to_string(),
            network: "mainnet".to_string(),
            signing_key: SigningKey::from_bytes(&[2u8; 32]),
            public_key: String::new(),
            last_nonce: Mutex::new(10),
        };
        assert_eq!(signer.next_nonce(10).unwrap(), 11);
        // chain view lags behind our own last broadcast
        assert_eq!(signer.next_nonce(10).unwrap(), 12);
        assert_eq!(signer.next_nonce(40).unwrap(), 41);
    }
}
