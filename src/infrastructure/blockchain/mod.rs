//! NEAR blockchain adapters

pub mod key_material;
pub mod near_rpc;
pub mod near_signer;
pub mod near_transaction;

pub use near_signer::{sign_and_send_multiple_transactions, NearSigner, NearSignerConnector};
