//! Token reads.
//!
//! Every read is the same two round trips:
//!
//! 1. **Resolve**: fetch a fixed resource type from the owning account and
//!    take a table handle out of it.
//! 2. **Lookup**: fetch the item under a key from that table, naming both
//!    the key type and the value type.
//!
//! | Read                   | Resource      | Handle        | Key type   | Value type  |
//! |------------------------|---------------|---------------|------------|-------------|
//! | collection data        | `Collections` | `collections` | `String`   | `Collection`|
//! | token data             | `Collections` | `token_data`  | `TokenId`  | `TokenData` |
//! | balance                | `TokenStore`  | `tokens`      | `TokenId`  | `Token`     |
//!
//! A missing resource and a missing key are different errors, and both are
//! different from a descriptor the ledger does not recognize.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::TokenClient;
use crate::config;
use crate::error::{LedgerError, TokenClientError};
use crate::ledger::TableItemRequest;
use crate::types::{
    AccountAddress, Collection, CollectionsResource, ResourceSchema, TableHandle, Token,
    TokenData, TokenId, TokenResource, TokenStoreResource,
};

impl TokenClient {
    /// Collection `collection_name` created by `creator`.
    pub async fn get_collection_data(
        &self,
        creator: AccountAddress,
        collection_name: &str,
    ) -> Result<Collection, TokenClientError> {
        let handle = self
            .resolve_handle(creator, |r: CollectionsResource| r.collections)
            .await?;
        self.lookup(
            &handle,
            config::STRING_TYPE,
            config::COLLECTION_TYPE,
            collection_name,
        )
        .await
    }

    /// Metadata of token `token_name` in `creator`'s `collection_name`.
    pub async fn get_token_data(
        &self,
        creator: AccountAddress,
        collection_name: &str,
        token_name: &str,
    ) -> Result<TokenData, TokenClientError> {
        let handle = self
            .resolve_handle(creator, |r: CollectionsResource| r.token_data)
            .await?;
        let id = TokenId::new(creator, collection_name, token_name);
        self.lookup(&handle, config::TOKEN_ID_TYPE, config::TOKEN_DATA_TYPE, &id)
            .await
    }

    /// Balance of `token_id` held by `account`.
    ///
    /// An account that never held the token yields
    /// [`TokenClientError::KeyNotFound`], not a zero balance.
    pub async fn get_token_balance_for_account(
        &self,
        account: AccountAddress,
        token_id: &TokenId,
    ) -> Result<Token, TokenClientError> {
        let handle = self
            .resolve_handle(account, |r: TokenStoreResource| r.tokens)
            .await?;
        self.lookup(&handle, config::TOKEN_ID_TYPE, config::TOKEN_TYPE, token_id)
            .await
    }

    /// [`Self::get_token_balance_for_account`] with the id spelled out.
    pub async fn get_token_balance(
        &self,
        owner: AccountAddress,
        creator: AccountAddress,
        collection_name: &str,
        token_name: &str,
    ) -> Result<Token, TokenClientError> {
        let id = TokenId::new(creator, collection_name, token_name);
        self.get_token_balance_for_account(owner, &id).await
    }

    /// Token-related resources held by `account`. Other resources are
    /// skipped.
    pub async fn account_token_resources(
        &self,
        account: AccountAddress,
    ) -> Result<Vec<TokenResource>, TokenClientError> {
        let resources = self
            .query
            .get_account_resources(account)
            .await
            .map_err(|e| match e {
                LedgerError::NotFound(_) => TokenClientError::ResourceNotFound {
                    address: account.to_hex_literal(),
                    resource_type: "*".to_string(),
                },
                other => TokenClientError::Ledger(other),
            })?;

        let mut token_resources = Vec::new();
        for resource in &resources {
            let parsed = TokenResource::from_account_resource(resource).map_err(|e| {
                TokenClientError::MalformedResource {
                    what: resource.resource_type.clone(),
                    reason: e.to_string(),
                }
            })?;
            if let Some(parsed) = parsed {
                token_resources.push(parsed);
            }
        }
        debug!(
            %account,
            total = resources.len(),
            token = token_resources.len(),
            "listed account resources"
        );
        Ok(token_resources)
    }
}

// ---------------------------------------------------------------------------
// Two-phase resolution
// ---------------------------------------------------------------------------

impl TokenClient {
    /// Phase one: fetch resource `S` from `owner` and pick a handle from it.
    async fn resolve_handle<S, F>(
        &self,
        owner: AccountAddress,
        select: F,
    ) -> Result<TableHandle, TokenClientError>
    where
        S: ResourceSchema,
        F: FnOnce(S) -> TableHandle,
    {
        let resource = self
            .query
            .get_account_resource(owner, S::TYPE)
            .await
            .map_err(|e| match e {
                LedgerError::NotFound(_) => TokenClientError::ResourceNotFound {
                    address: owner.to_hex_literal(),
                    resource_type: S::TYPE.to_string(),
                },
                LedgerError::TypeMismatch(msg) => TokenClientError::TypeMismatch(msg),
                other => TokenClientError::Ledger(other),
            })?;

        let schema = serde_json::from_value::<S>(resource.data).map_err(|e| {
            TokenClientError::MalformedResource {
                what: S::TYPE.to_string(),
                reason: e.to_string(),
            }
        })?;
        let handle = select(schema);
        debug!(%owner, resource = S::TYPE, %handle, "resolved table handle");
        Ok(handle)
    }

    /// Phase two: typed lookup of `key` in `handle`.
    async fn lookup<K, V>(
        &self,
        handle: &TableHandle,
        key_type: &str,
        value_type: &str,
        key: &K,
    ) -> Result<V, TokenClientError>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let key = serde_json::to_value(key)
            .map_err(|e| TokenClientError::InvalidArgument(format!("table key: {e}")))?;
        let request = TableItemRequest {
            key_type: key_type.to_string(),
            value_type: value_type.to_string(),
            key,
        };
        debug!(%handle, key_type, value_type, key = %request.key, "table lookup");

        let value = self
            .query
            .get_table_item(handle, &request)
            .await
            .map_err(|e| match e {
                LedgerError::NotFound(_) => TokenClientError::KeyNotFound {
                    handle: handle.to_string(),
                    key: request.key.to_string(),
                },
                LedgerError::TypeMismatch(msg) => TokenClientError::TypeMismatch(msg),
                other => TokenClientError::Ledger(other),
            })?;

        serde_json::from_value(value).map_err(|e| TokenClientError::MalformedResource {
            what: value_type.to_string(),
            reason: e.to_string(),
        })
    }
}
