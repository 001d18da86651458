//! # Accounts & Signing
//!
//! Ed25519 key handling for ledger accounts, plus the [`TransactionSigner`]
//! seam the submission path signs through.
//!
//! An account address is derived from its public key using the single-key
//! authentication scheme:
//!
//! ```text
//! address = SHA3-256(public_key || 0x00)
//! ```
//!
//! Accounts whose authentication key was rotated keep their original
//! address, so [`LocalAccount::with_address`] lets the caller pin it.
//!
//! Key bytes are never logged, and `Debug` prints only the address.

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use sha3::{Digest, Sha3_256};
use std::fmt;
use thiserror::Error;

use crate::error::LedgerError;
use crate::types::AccountAddress;

/// Scheme byte appended to the public key for single-signer Ed25519 keys.
const ED25519_SCHEME: u8 = 0x00;

/// Errors that can occur while loading key material.
///
/// Deliberately vague about why: error messages are a classic place to leak
/// details of secret input.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not hex")]
    InvalidSecretKey,
}

/// Anything that can authorize a transaction for one account.
///
/// Signing is synchronous: the bytes to sign are already in hand, and
/// hardware or remote signers wrap their own runtime behind this call.
/// Such signers report device or transport failures as
/// [`LedgerError::Signing`].
pub trait TransactionSigner: Send + Sync {
    /// Account the signatures are valid for.
    fn address(&self) -> AccountAddress;

    /// `0x`-prefixed hex of the Ed25519 public key.
    fn public_key_hex(&self) -> String;

    /// Sign a ledger signing message and return the raw 64-byte signature.
    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError>;
}

/// An Ed25519 account held in process memory.
pub struct LocalAccount {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl LocalAccount {
    /// Generate a fresh account using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build an account deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Load an account from a hex-encoded secret key (with or without `0x`).
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Override the derived address, for accounts with a rotated key.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Export the secret key. Handle with care; never log it.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

/// Derive the address of a single-key Ed25519 account.
pub fn derive_address(public_key: &[u8; 32]) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    let digest: [u8; 32] = hasher.finalize().into();
    AccountAddress::new(digest)
}

impl TransactionSigner for LocalAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.public_key_bytes()))
    }

    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, LedgerError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

impl Clone for LocalAccount {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
            address: self.address,
        }
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalAccount({})", self.address)
    }
}
