//! Mutating token operations.
//!
//! Each operation is one entry-function call. The payload builders are
//! public so callers can inspect or batch them; the [`TokenClient`] methods
//! build and submit in one step.
//!
//! | Operation           | Entry function                                 |
//! |---------------------|------------------------------------------------|
//! | create collection   | `0x1::Token::create_unlimited_collection_script` |
//! | create token        | `0x1::Token::create_unlimited_token_script`      |
//! | offer               | `0x1::TokenTransfers::offer_script`              |
//! | claim               | `0x1::TokenTransfers::claim_script`              |
//! | cancel offer        | `0x1::TokenTransfers::cancel_offer_script`       |
//!
//! Nothing here checks balances, offers, or name uniqueness. The ledger is
//! the only authority, and it answers by rejecting the transaction.

use super::TokenClient;
use crate::account::TransactionSigner;
use crate::config;
use crate::error::TokenClientError;
use crate::transaction::{EntryFunctionId, EntryFunctionPayload, TransactionPayload};
use crate::types::AccountAddress;

fn framework_call(module: &str, function: &str) -> EntryFunctionPayload {
    EntryFunctionPayload::new(EntryFunctionId::new(AccountAddress::ONE, module, function))
}

// ---------------------------------------------------------------------------
// Payload Builders
// ---------------------------------------------------------------------------

/// Arguments: description, name, uri.
pub fn create_collection_payload(name: &str, description: &str, uri: &str) -> TransactionPayload {
    framework_call(config::TOKEN_MODULE, config::CREATE_COLLECTION_FUNCTION)
        .string_arg(description)
        .string_arg(name)
        .string_arg(uri)
        .into()
}

/// Arguments: collection, name, description, unlimited flag, supply, uri,
/// royalty.
///
/// Fails with [`TokenClientError::InvalidArgument`] when the royalty
/// exceeds one million points.
pub fn create_token_payload(
    collection_name: &str,
    name: &str,
    description: &str,
    supply: u64,
    uri: &str,
    royalty_points_per_million: u64,
) -> Result<TransactionPayload, TokenClientError> {
    if royalty_points_per_million > config::MAX_ROYALTY_POINTS_PER_MILLION {
        return Err(TokenClientError::InvalidArgument(format!(
            "royalty_points_per_million {royalty_points_per_million} exceeds {}",
            config::MAX_ROYALTY_POINTS_PER_MILLION
        )));
    }

    Ok(framework_call(config::TOKEN_MODULE, config::CREATE_TOKEN_FUNCTION)
        .string_arg(collection_name)
        .string_arg(name)
        .string_arg(description)
        .bool_arg(true)
        .u64_arg(supply)
        .string_arg(uri)
        .u64_arg(royalty_points_per_million)
        .into())
}

/// Arguments: receiver, creator, collection, name, amount.
pub fn offer_payload(
    receiver: AccountAddress,
    creator: AccountAddress,
    collection_name: &str,
    name: &str,
    amount: u64,
) -> TransactionPayload {
    framework_call(config::TOKEN_TRANSFERS_MODULE, config::OFFER_FUNCTION)
        .address_arg(receiver)
        .address_arg(creator)
        .string_arg(collection_name)
        .string_arg(name)
        .u64_arg(amount)
        .into()
}

/// Arguments: sender, creator, collection, name.
pub fn claim_payload(
    sender: AccountAddress,
    creator: AccountAddress,
    collection_name: &str,
    name: &str,
) -> TransactionPayload {
    framework_call(config::TOKEN_TRANSFERS_MODULE, config::CLAIM_FUNCTION)
        .address_arg(sender)
        .address_arg(creator)
        .string_arg(collection_name)
        .string_arg(name)
        .into()
}

/// Arguments: receiver, creator, collection, name.
pub fn cancel_offer_payload(
    receiver: AccountAddress,
    creator: AccountAddress,
    collection_name: &str,
    name: &str,
) -> TransactionPayload {
    framework_call(config::TOKEN_TRANSFERS_MODULE, config::CANCEL_OFFER_FUNCTION)
        .address_arg(receiver)
        .address_arg(creator)
        .string_arg(collection_name)
        .string_arg(name)
        .into()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl TokenClient {
    /// Create an unlimited collection owned by `signer`.
    pub async fn create_collection(
        &self,
        signer: &dyn TransactionSigner,
        name: &str,
        description: &str,
        uri: &str,
    ) -> Result<String, TokenClientError> {
        let payload = create_collection_payload(name, description, uri);
        self.submit_transaction(signer, payload).await
    }

    /// Mint `supply` units of a new token type into `signer`'s store.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_token(
        &self,
        signer: &dyn TransactionSigner,
        collection_name: &str,
        name: &str,
        description: &str,
        supply: u64,
        uri: &str,
        royalty_points_per_million: u64,
    ) -> Result<String, TokenClientError> {
        let payload = create_token_payload(
            collection_name,
            name,
            description,
            supply,
            uri,
            royalty_points_per_million,
        )?;
        self.submit_transaction(signer, payload).await
    }

    /// Escrow `amount` units for `receiver` to claim.
    pub async fn offer_token(
        &self,
        signer: &dyn TransactionSigner,
        receiver: AccountAddress,
        creator: AccountAddress,
        collection_name: &str,
        name: &str,
        amount: u64,
    ) -> Result<String, TokenClientError> {
        let payload = offer_payload(receiver, creator, collection_name, name, amount);
        self.submit_transaction(signer, payload).await
    }

    /// Take the pending offer `sender` made to `signer`.
    pub async fn claim_token(
        &self,
        signer: &dyn TransactionSigner,
        sender: AccountAddress,
        creator: AccountAddress,
        collection_name: &str,
        name: &str,
    ) -> Result<String, TokenClientError> {
        let payload = claim_payload(sender, creator, collection_name, name);
        self.submit_transaction(signer, payload).await
    }

    /// Withdraw a pending offer from `signer` to `receiver`.
    pub async fn cancel_token_offer(
        &self,
        signer: &dyn TransactionSigner,
        receiver: AccountAddress,
        creator: AccountAddress,
        collection_name: &str,
        name: &str,
    ) -> Result<String, TokenClientError> {
        let payload = cancel_offer_payload(receiver, creator, collection_name, name);
        self.submit_transaction(signer, payload).await
    }
}
