//! Token records as the ledger stores them.
//!
//! These mirror the JSON the ledger returns for table values. Two encoding
//! conventions show up everywhere:
//!
//! - `u64` values travel as decimal strings so 64-bit magnitudes survive
//!   JSON parsers that only have doubles. We also accept bare numbers.
//! - Optional values travel as `{"vec": []}` or `{"vec": [x]}`.

use serde::{Deserialize, Serialize};

use super::address::AccountAddress;

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Composite key addressing a token type: creator, collection, name.
///
/// Names compare as exact strings. No case folding, no trimming, no
/// Unicode normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    pub creator: AccountAddress,
    pub collection: String,
    pub name: String,
}

impl TokenId {
    pub fn new(
        creator: AccountAddress,
        collection: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            creator,
            collection: collection.into(),
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Token (balance record)
// ---------------------------------------------------------------------------

/// Quantity of one token type held by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    #[serde(with = "u64_string")]
    pub value: u64,
}

impl Token {
    /// A zero balance for `id`. The client never produces this on its own;
    /// it exists for callers that choose to read "never held" as zero.
    pub fn zero(id: TokenId) -> Self {
        Self { id, value: 0 }
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// A creator's named collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub description: String,
    pub name: String,
    pub uri: String,
    /// Number of distinct token types minted into the collection.
    #[serde(with = "u64_string")]
    pub count: u64,
    /// Cap on distinct token types; `None` for unlimited collections.
    #[serde(with = "move_option_u64", default)]
    pub maximum: Option<u64>,
}

// ---------------------------------------------------------------------------
// TokenData
// ---------------------------------------------------------------------------

/// Royalty terms attached to a token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Royalty {
    #[serde(with = "u64_string")]
    pub royalty_points_per_million: u64,
    pub creator_account: AccountAddress,
}

/// Metadata and supply of a token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub collection: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    /// Supply cap; `None` for unlimited tokens.
    #[serde(with = "move_option_u64", default)]
    pub maximum: Option<u64>,
    /// Current minted supply, when the ledger tracks it.
    #[serde(with = "move_option_u64", default)]
    pub supply: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty: Option<Royalty>,
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

/// `u64` as a decimal string on the way out; string or number on the way in.
pub(crate) mod u64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(crate) enum Raw {
        Str(String),
        Num(u64),
    }

    impl Raw {
        pub(crate) fn into_u64<E: de::Error>(self) -> Result<u64, E> {
            match self {
                Raw::Num(n) => Ok(n),
                Raw::Str(s) => s
                    .parse()
                    .map_err(|_| E::custom(format!("invalid u64 string: {s:?}"))),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Raw::deserialize(d)?.into_u64()
    }
}

/// `Option<u64>` in the ledger's `{"vec": [...]}` envelope.
pub(crate) mod move_option_u64 {
    use serde::ser::SerializeStruct;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::u64_string::Raw;

    pub fn serialize<S: Serializer>(v: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        let items: Vec<String> = v.iter().map(u64::to_string).collect();
        let mut st = s.serialize_struct("Option", 1)?;
        st.serialize_field("vec", &items)?;
        st.end()
    }

    #[derive(Deserialize)]
    struct Envelope {
        vec: Vec<Raw>,
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let env = Envelope::deserialize(d)?;
        let mut items = env.vec.into_iter();
        let first = items.next().map(Raw::into_u64::<D::Error>).transpose()?;
        if items.next().is_some() {
            return Err(de::Error::custom("option envelope holds more than one value"));
        }
        Ok(first)
    }
}
