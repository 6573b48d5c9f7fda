//! Validation of unsigned transactions before anything is signed

use crate::shared::errors::ExecutionError;
use super::UnsignedTransaction;

/// A function call ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

/// Checks transactions and converts their actions into typed function calls
pub struct TransactionValidator;

impl TransactionValidator {
    /// Validate one transaction. `index` is 1-based and only used in errors.
    pub fn validate(
        index: usize,
        transaction: &UnsignedTransaction,
    ) -> Result<Vec<FunctionCall>, ExecutionError> {
        if transaction.receiver_id.trim().is_empty() {
            return Err(ExecutionError::InvalidAction {
                index,
                reason: "missing receiver".to_string(),
            });
        }
        if transaction.actions.is_empty() {
            return Err(ExecutionError::EmptyTransaction { index });
        }

        transaction
            .actions
            .iter()
            .map(|action| {
                let invalid = |reason: String| ExecutionError::InvalidAction { index, reason };

                if !action.kind.eq_ignore_ascii_case("FunctionCall") {
                    return Err(invalid(format!("unsupported action type {}", action.kind)));
                }
                let params = &action.params;
                if params.method_name.is_empty() {
                    return Err(invalid("missing method name".to_string()));
                }
                let gas = params
                    .gas
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("gas {:?}: {}", params.gas, e)))?;
                let deposit = params
                    .deposit
                    .trim()
                    .parse::<u128>()
                    .map_err(|e| invalid(format!("deposit {:?}: {}", params.deposit, e)))?;
                let args = if params.args.is_null() {
                    b"{}".to_vec()
                } else {
                    serde_json::to_vec(&params.args)
                        .map_err(|e| invalid(format!("args: {}", e)))?
                };

                Ok(FunctionCall {
                    method_name: params.method_name.clone(),
                    args,
                    gas,
                    deposit,
                })
            })
            .collect()
    }
}
