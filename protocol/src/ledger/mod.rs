//! # Ledger Collaborators
//!
//! The two narrow interfaces the token client consumes. Everything about
//! transport, envelope encoding, and ledger execution sits behind them.
//!
//! | Trait                 | Responsibility                                   |
//! |-----------------------|--------------------------------------------------|
//! | [`SubmissionService`] | generate, sign, submit, await finality           |
//! | [`TableQueryService`] | account resources and typed table lookups        |
//!
//! [`rest::RestClient`] implements both against the ledger's HTTP API.
//! Tests plug in an in-memory ledger instead.

pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::TransactionSigner;
use crate::error::LedgerError;
use crate::transaction::{
    PendingTransaction, SignedTransaction, TransactionOptions, TransactionOutcome,
    TransactionPayload, UnsignedTransaction,
};
use crate::types::{AccountAddress, TableHandle};

pub use rest::RestClient;

// ---------------------------------------------------------------------------
// Wire Types
// ---------------------------------------------------------------------------

/// An account resource as returned by the ledger: a type tag and an
/// untyped data blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// A typed table lookup. Both descriptors must match the types the ledger
/// registered for the table, byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItemRequest {
    pub key_type: String,
    pub value_type: String,
    pub key: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Collaborator Traits
// ---------------------------------------------------------------------------

/// Builds, signs, broadcasts, and confirms transactions.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Wrap `payload` in an envelope for `sender`. Reads the sender's
    /// sequence number unless `options` pins one.
    async fn generate(
        &self,
        sender: AccountAddress,
        payload: TransactionPayload,
        options: &TransactionOptions,
    ) -> Result<UnsignedTransaction, LedgerError>;

    /// Produce the signed envelope.
    async fn sign(
        &self,
        signer: &dyn TransactionSigner,
        txn: UnsignedTransaction,
    ) -> Result<SignedTransaction, LedgerError>;

    /// Broadcast a signed envelope.
    async fn submit(&self, txn: &SignedTransaction) -> Result<PendingTransaction, LedgerError>;

    /// Wait until the ledger reports `hash` as committed, successfully or
    /// not. Callers bound this with their own timeout.
    async fn await_finality(&self, hash: &str) -> Result<TransactionOutcome, LedgerError>;
}

/// Reads account resources and table items.
#[async_trait]
pub trait TableQueryService: Send + Sync {
    /// One resource of `resource_type` held by `address`.
    async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, LedgerError>;

    /// Every resource held by `address`.
    async fn get_account_resources(
        &self,
        address: AccountAddress,
    ) -> Result<Vec<AccountResource>, LedgerError>;

    /// The value stored under `request.key` in table `handle`.
    async fn get_table_item(
        &self,
        handle: &TableHandle,
        request: &TableItemRequest,
    ) -> Result<serde_json::Value, LedgerError>;
}
