//! NEAR key strings (`ed25519:<base58>`) and key generation

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::shared::errors::ExecutionError;

pub const ED25519_PREFIX: &str = "ed25519:";

/// Parse a secret key. Accepts the 64-byte keypair form NEAR wallets export
/// as well as a bare 32-byte seed; the curve prefix may be omitted.
pub fn parse_secret_key(encoded: &str) -> Result<SigningKey, ExecutionError> {
    let trimmed = encoded.trim();
    let data = match trimmed.split_once(':') {
        Some(("ed25519", data)) => data,
        Some((curve, _)) => {
            return Err(ExecutionError::InvalidKey(format!(
                "unsupported key type {}, only ed25519 keys can sign",
                curve
            )))
        }
        None => trimmed,
    };

    let bytes = bs58::decode(data)
        .into_vec()
        .map_err(|e| ExecutionError::InvalidKey(format!("bad base58: {}", e)))?;

    match bytes.len() {
        64 => {
            let mut keypair = [0u8; 64];
            keypair.copy_from_slice(&bytes);
            SigningKey::from_keypair_bytes(&keypair).map_err(|_| {
                ExecutionError::InvalidKey("public half does not match the secret".to_string())
            })
        }
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        n => Err(ExecutionError::InvalidKey(format!(
            "expected 32 or 64 key bytes, got {}",
            n
        ))),
    }
}

pub fn encode_public_key(key: &VerifyingKey) -> String {
    format!("{}{}", ED25519_PREFIX, bs58::encode(key.as_bytes()).into_string())
}

pub fn encode_secret_key(key: &SigningKey) -> String {
    format!(
        "{}{}",
        ED25519_PREFIX,
        bs58::encode(key.to_keypair_bytes()).into_string()
    )
}

/// Implicit account id: lowercase hex of the public key.
pub fn implicit_account_id(key: &VerifyingKey) -> String {
    hex::encode(key.as_bytes())
}

pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}
