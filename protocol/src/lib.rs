// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Token Protocol: Client Library
//!
//! A thin, typed client for the ledger's token framework: create
//! collections, mint tokens, move them through the offer / claim / cancel
//! escrow, and read collections, token metadata, and balances back.
//!
//! The client owns none of the state. Every operation either becomes one
//! entry-function transaction or two reads (resource, then table item).
//! The ledger decides what is valid; the client's job is to speak its wire
//! format exactly and to report what happened without guessing.
//!
//! ## Architecture
//!
//! - **client**: [`TokenClient`], the operations facade.
//! - **ledger**: the submission and table-query collaborator traits, plus
//!   the REST implementation.
//! - **transaction**: entry-function payloads and transaction envelopes.
//! - **types**: addresses, token records, and typed account resources.
//! - **account**: Ed25519 accounts and the signer seam.
//! - **config**: framework identifiers, type descriptors, and
//!   [`ClientConfig`].
//! - **error**: the error taxonomy.
//!
//! ## Guarantees (and the lack of them)
//!
//! 1. Nothing is retried. A failure is surfaced as-is.
//! 2. Nothing is checked locally that the ledger checks: no balance, offer,
//!    or uniqueness pre-checks.
//! 3. A confirmation timeout does not mean the transaction failed.

pub mod account;
pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod types;

pub use account::{LocalAccount, TransactionSigner};
pub use client::TokenClient;
pub use config::{ClientConfig, FinalityPolicy};
pub use error::{LedgerError, TokenClientError};
pub use types::{AccountAddress, Collection, Token, TokenData, TokenId};
