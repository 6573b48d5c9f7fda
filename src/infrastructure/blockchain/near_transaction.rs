//! Borsh wire format of NEAR transactions, limited to function calls

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};

use crate::domain::execution::FunctionCall;

const ED25519_KEY_TYPE: u8 = 0;
const FUNCTION_CALL_ACTION: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearPublicKey(pub [u8; 32]);

impl BorshSerialize for NearPublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[ED25519_KEY_TYPE])?;
        writer.write_all(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearSignature(pub [u8; 64]);

impl BorshSerialize for NearSignature {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[ED25519_KEY_TYPE])?;
        writer.write_all(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoHash(pub [u8; 32]);

impl BorshSerialize for CryptoHash {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl CryptoHash {
    pub fn from_base58(encoded: &str) -> Result<Self, String> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| format!("bad block hash {}: {}", encoded, e))?;
        if bytes.len() != 32 {
            return Err(format!("block hash {} is {} bytes, expected 32", encoded, bytes.len()));
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Self(hash))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

#[derive(BorshSerialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                writer.write_all(&[FUNCTION_CALL_ACTION])?;
                call.serialize(writer)
            }
        }
    }
}

impl From<&FunctionCall> for Action {
    fn from(call: &FunctionCall) -> Self {
        Action::FunctionCall(FunctionCallAction {
            method_name: call.method_name.clone(),
            args: call.args.clone(),
            gas: call.gas,
            deposit: call.deposit,
        })
    }
}

#[derive(BorshSerialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: NearPublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: CryptoHash,
    pub actions: Vec<Action>,
}

impl Transaction {
    /// SHA-256 of the borsh encoding; doubles as the transaction id.
    pub fn hash(&self) -> io::Result<CryptoHash> {
        let encoded = self.try_to_vec()?;
        let digest = Sha256::digest(&encoded);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(CryptoHash(hash))
    }

    pub fn sign(self, key: &SigningKey) -> io::Result<SignedTransaction> {
        let hash = self.hash()?;
        let signature = key.sign(&hash.0);
        Ok(SignedTransaction {
            transaction: self,
            signature: NearSignature(signature.to_bytes()),
            hash,
        })
    }
}

pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: NearSignature,
    pub hash: CryptoHash,
}

impl BorshSerialize for SignedTransaction {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.transaction.serialize(writer)?;
        self.signature.serialize(writer)
    }
}

impl SignedTransaction {
    /// Payload for `broadcast_tx_commit`
    pub fn to_base64(&self) -> io::Result<String> {
        Ok(STANDARD.encode(self.try_to_vec()?))
    }
}
