//! Sequential transaction execution

use tracing::{info, warn};

use crate::shared::errors::ExecutionError;
use super::{TransactionSigner, TransactionValidator, UnsignedTransaction};

/// Signs and broadcasts transactions strictly one after another.
///
/// Every transaction is validated before the first one is sent. A failed
/// submission aborts the run; later transactions are never attempted.
pub struct TransactionExecutor<'a> {
    signer: &'a dyn TransactionSigner,
}

impl<'a> TransactionExecutor<'a> {
    pub fn new(signer: &'a dyn TransactionSigner) -> Self {
        Self { signer }
    }

    /// Returns one confirmation identifier per transaction, in input order.
    pub async fn execute_all(
        &self,
        transactions: &[UnsignedTransaction],
    ) -> Result<Vec<String>, ExecutionError> {
        let prepared = transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| TransactionValidator::validate(i + 1, tx).map(|calls| (tx, calls)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut hashes = Vec::with_capacity(prepared.len());
        for (i, (tx, calls)) in prepared.iter().enumerate() {
            let index = i + 1;
            info!(
                "🚀 Sending transaction {}/{} to {} ({} action(s))",
                index,
                prepared.len(),
                tx.receiver_id,
                calls.len()
            );

            match self.signer.sign_and_send(&tx.receiver_id, calls).await {
                Ok(hash) => {
                    info!("✅ Transaction {} confirmed: {}", index, hash);
                    hashes.push(hash);
                }
                Err(e) => {
                    warn!(
                        "❌ Transaction {} failed after {} confirmed: {}",
                        index,
                        hashes.len(),
                        e
                    );
                    return Err(ExecutionError::TransactionFailed {
                        index,
                        receiver_id: tx.receiver_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(hashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::{ActionParams, FunctionCall, TransactionAction};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every attempt; fails the attempt whose 1-based position is `fail_on`.
    struct ScriptedSigner {
        fail_on: Option<usize>,
        attempts: Mutex<Vec<(String, usize)>>,
        confirmed: Mutex<Vec<String>>,
    }

    impl ScriptedSigner {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                fail_on,
                attempts: Mutex::new(Vec::new()),
                confirmed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TransactionSigner for ScriptedSigner {
        async fn sign_and_send(
            &self,
            receiver_id: &str,
            actions: &[FunctionCall],
        ) -> Result<String, ExecutionError> {
            let position = {
                let mut attempts = self.attempts.lock().unwrap();
                attempts.push((receiver_id.to_string(), actions.len()));
                attempts.len()
            };
            if self.fail_on == Some(position) {
                return Err(ExecutionError::Rpc("connection reset".to_string()));
            }
            let hash = format!("hash-{}", position);
            self.confirmed.lock().unwrap().push(hash.clone());
            Ok(hash)
        }
    }

    fn call(method: &str) -> TransactionAction {
        TransactionAction {
            kind: "FunctionCall".to_string(),
            params: ActionParams {
                method_name: method.to_string(),
                args: serde_json::json!({}),
                gas: "30000000000000".to_string(),
                deposit: "0".to_string(),
            },
        }
    }

    fn tx(receiver: &str, actions: Vec<TransactionAction>) -> UnsignedTransaction {
        UnsignedTransaction {
            receiver_id: receiver.to_string(),
            actions,
        }
    }

    #[tokio::test]
    async fn test_hashes_follow_input_order() {
        let signer = ScriptedSigner::new(None);
        let txs = vec![
            tx("usdc.near", vec![call("storage_deposit")]),
            tx("usdc.near", vec![call("ft_transfer")]),
        ];

        let hashes = TransactionExecutor::new(&signer).execute_all(&txs).await.unwrap();

        assert_eq!(hashes, vec!["hash-1", "hash-2"]);
    }

    #[tokio::test]
    async fn test_failure_stops_remaining_transactions() {
        let signer = ScriptedSigner::new(Some(2));
        let txs = vec![
            tx("a.near", vec![call("one")]),
            tx("b.near", vec![call("two")]),
            tx("c.near", vec![call("three")]),
        ];

        let result = TransactionExecutor::new(&signer).execute_all(&txs).await;

        match result {
            Err(ExecutionError::TransactionFailed { index, receiver_id, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(receiver_id, "b.near");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(*signer.confirmed.lock().unwrap(), vec!["hash-1".to_string()]);
        let attempts = signer.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 2);
        assert!(attempts.iter().all(|(receiver, _)| receiver != "c.near"));
    }

    #[tokio::test]
    async fn test_all_actions_of_a_transaction_are_sent_together() {
        let signer = ScriptedSigner::new(None);
        let txs = vec![tx(
            "usdc.near",
            vec![call("storage_deposit"), call("ft_transfer")],
        )];

        let hashes = TransactionExecutor::new(&signer).execute_all(&txs).await.unwrap();

        assert_eq!(hashes.len(), 1);
        assert_eq!(
            *signer.attempts.lock().unwrap(),
            vec![("usdc.near".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_invalid_transaction_sends_nothing() {
        let signer = ScriptedSigner::new(None);
        let txs = vec![tx("a.near", vec![call("one")]), tx("b.near", Vec::new())];

        let result = TransactionExecutor::new(&signer).execute_all(&txs).await;

        assert_eq!(result, Err(ExecutionError::EmptyTransaction { index: 2 }));
        assert!(signer.attempts.lock().unwrap().is_empty());
    }
}
