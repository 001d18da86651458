//! Typed views of the account resources that own token tables.
//!
//! The ledger hands resources back as `{type, data}` with an untyped `data`
//! blob. Rather than digging fields out of JSON at each call site, every
//! resource we care about gets its own schema here, and [`TokenResource`]
//! is the discriminated union over them.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config;
use crate::ledger::AccountResource;

/// Opaque identifier of an on-chain key-value table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableHandle(String);

impl TableHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tables are embedded in resources as `{"handle": <string or number>}`.
impl<'de> Deserialize<'de> for TableHandle {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Table {
            handle: serde_json::Value,
        }

        let table = Table::deserialize(d)?;
        match table.handle {
            serde_json::Value::String(s) => Ok(TableHandle(s)),
            serde_json::Value::Number(n) => Ok(TableHandle(n.to_string())),
            other => Err(D::Error::custom(format!(
                "table handle must be a string or number, got {other}"
            ))),
        }
    }
}

/// `0x1::Token::Collections`: a creator's collection and token-data tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionsResource {
    /// Collection name -> `Collection`.
    pub collections: TableHandle,
    /// `TokenId` -> `TokenData`.
    pub token_data: TableHandle,
}

/// `0x1::Token::TokenStore`: an account's balance table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenStoreResource {
    /// `TokenId` -> `Token`.
    pub tokens: TableHandle,
}

/// Schema for a resource type with a fixed, registered descriptor.
pub trait ResourceSchema: for<'de> Deserialize<'de> {
    /// Fully-qualified type name the ledger registers this resource under.
    const TYPE: &'static str;
}

impl ResourceSchema for CollectionsResource {
    const TYPE: &'static str = config::COLLECTIONS_RESOURCE;
}

impl ResourceSchema for TokenStoreResource {
    const TYPE: &'static str = config::TOKEN_STORE_RESOURCE;
}

/// Token-related resources an account may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResource {
    Collections(CollectionsResource),
    TokenStore(TokenStoreResource),
}

impl TokenResource {
    /// Classify a raw resource by its type tag.
    ///
    /// Returns `Ok(None)` for resources unrelated to tokens, and an error
    /// when the tag matches but the data does not fit the schema.
    pub fn from_account_resource(
        resource: &AccountResource,
    ) -> Result<Option<Self>, serde_json::Error> {
        match resource.resource_type.as_str() {
            config::COLLECTIONS_RESOURCE => {
                let data = CollectionsResource::deserialize(&resource.data)?;
                Ok(Some(TokenResource::Collections(data)))
            }
            config::TOKEN_STORE_RESOURCE => {
                let data = TokenStoreResource::deserialize(&resource.data)?;
                Ok(Some(TokenResource::TokenStore(data)))
            }
            _ => Ok(None),
        }
    }
}
