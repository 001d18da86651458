//! # Token Types
//!
//! Value types shared by the client and its collaborators:
//!
//! ```text
//! address.rs  : 32-byte account addresses and their hex literal form
//! records.rs  : TokenId, Token, Collection, TokenData as stored on-chain
//! resources.rs: typed account resources that own the token tables
//! ```

pub mod address;
pub mod records;
pub mod resources;

pub use address::{AccountAddress, AddressParseError};
pub use records::{Collection, Royalty, Token, TokenData, TokenId};
pub use resources::{
    CollectionsResource, ResourceSchema, TableHandle, TokenResource, TokenStoreResource,
};
