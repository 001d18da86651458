//! Transaction envelopes at each stage of submission.
//!
//! ```text
//! UnsignedTransaction --sign--> SignedTransaction --submit--> PendingTransaction
//!                                                                   |
//!                                              await_finality ------+--> TransactionOutcome
//! ```
//!
//! Numeric envelope fields travel as decimal strings, same as payload
//! arguments.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::payload::TransactionPayload;
use crate::config::ClientConfig;
use crate::types::records::u64_string;
use crate::types::AccountAddress;

/// Signature scheme tag for single-key Ed25519 signatures.
pub const ED25519_SIGNATURE_TYPE: &str = "ed25519_signature";

// ---------------------------------------------------------------------------
// TransactionOptions
// ---------------------------------------------------------------------------

/// Per-transaction envelope parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOptions {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_secs: u64,
    /// Omitted from the envelope when `None`.
    pub gas_currency_code: Option<String>,
    /// Pin the sender sequence number instead of reading it from the
    /// ledger. Resubmitting an envelope with a pinned sequence number after
    /// a timeout cannot execute twice: the ledger rejects the replay.
    pub sequence_number: Option<u64>,
    /// Budget for observing finality of this transaction.
    pub confirmation_timeout: Duration,
}

impl TransactionOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            expiration_secs: config.expiration_secs,
            gas_currency_code: config.gas_currency_code.clone(),
            sequence_number: None,
            confirmation_timeout: config.confirmation_timeout,
        }
    }

    pub fn with_sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn with_confirmation_timeout(mut self, confirmation_timeout: Duration) -> Self {
        self.confirmation_timeout = confirmation_timeout;
        self
    }
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A fully-specified transaction awaiting a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub sender: AccountAddress,
    #[serde(with = "u64_string")]
    pub sequence_number: u64,
    #[serde(with = "u64_string")]
    pub max_gas_amount: u64,
    #[serde(with = "u64_string")]
    pub gas_unit_price: u64,
    #[serde(with = "u64_string")]
    pub expiration_timestamp_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_currency_code: Option<String>,
    pub payload: TransactionPayload,
}

impl UnsignedTransaction {
    /// Assemble an envelope expiring `options.expiration_secs` from now.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        options: &TransactionOptions,
    ) -> Self {
        let now = Utc::now().timestamp().max(0) as u64;
        Self {
            sender,
            sequence_number,
            max_gas_amount: options.max_gas_amount,
            gas_unit_price: options.gas_unit_price,
            expiration_timestamp_secs: now.saturating_add(options.expiration_secs),
            gas_currency_code: options.gas_currency_code.clone(),
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// Signature block attached to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub scheme: String,
    /// `0x`-prefixed hex public key.
    pub public_key: String,
    /// `0x`-prefixed hex signature.
    pub signature: String,
}

impl TransactionSignature {
    pub fn ed25519(public_key: String, signature: &[u8]) -> Self {
        Self {
            scheme: ED25519_SIGNATURE_TYPE.to_string(),
            public_key,
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

/// An envelope plus the sender's signature, in submission shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub raw: UnsignedTransaction,
    pub signature: TransactionSignature,
}

// ---------------------------------------------------------------------------
// After submission
// ---------------------------------------------------------------------------

/// Acknowledgement of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// What the ledger reports once a transaction is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: String,
    /// Whether execution succeeded.
    pub success: bool,
    /// Ledger status string, e.g. `Executed successfully` or an abort code.
    pub vm_status: String,
    /// Ledger version the transaction was committed at, when reported.
    #[serde(default)]
    pub version: Option<u64>,
}
