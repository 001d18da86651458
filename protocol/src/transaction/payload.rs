//! Entry-function call payloads.
//!
//! Every mutating token operation is one call to a framework entry
//! function. The wire shape is fixed:
//!
//! ```json
//! {
//!   "type": "script_function_payload",
//!   "function": "0x1::Token::create_unlimited_collection_script",
//!   "type_arguments": [],
//!   "arguments": ["416c696365", "..."]
//! }
//! ```
//!
//! Arguments are encoded by kind, never as raw binary and never as JSON
//! numbers:
//!
//! | kind    | encoding                               |
//! |---------|----------------------------------------|
//! | bytes   | hex of the raw bytes, no prefix        |
//! | u64     | decimal string                         |
//! | bool    | JSON boolean                           |
//! | address | `0x`-prefixed hex literal              |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::types::AccountAddress;

/// Errors from parsing function identifiers or reading arguments back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("malformed function id {0:?}: expected address::module::function")]
    MalformedFunctionId(String),

    #[error("argument {index} missing")]
    MissingArgument { index: usize },

    #[error("argument {index} is not a valid {expected}")]
    InvalidArgument { index: usize, expected: &'static str },
}

// ---------------------------------------------------------------------------
// EntryFunctionId
// ---------------------------------------------------------------------------

/// Fully-qualified entry function: `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryFunctionId {
    pub module_address: AccountAddress,
    pub module_name: String,
    pub function_name: String,
}

impl EntryFunctionId {
    pub fn new(
        module_address: AccountAddress,
        module_name: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            module_address,
            module_name: module_name.into(),
            function_name: function_name.into(),
        }
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.module_address.to_short_hex_literal(),
            self.module_name,
            self.function_name
        )
    }
}

impl FromStr for EntryFunctionId {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PayloadError::MalformedFunctionId(s.to_string());
        let parts: Vec<&str> = s.split("::").collect();
        let [addr, module, function] = parts.as_slice() else {
            return Err(malformed());
        };
        if module.is_empty() || function.is_empty() {
            return Err(malformed());
        }
        let module_address = AccountAddress::from_hex_literal(addr).map_err(|_| malformed())?;
        Ok(Self::new(module_address, *module, *function))
    }
}

impl Serialize for EntryFunctionId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryFunctionId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// A typed entry-function argument prior to wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveArg {
    Bytes(Vec<u8>),
    U64(u64),
    Bool(bool),
    Address(AccountAddress),
}

impl From<MoveArg> for Value {
    fn from(arg: MoveArg) -> Self {
        match arg {
            MoveArg::Bytes(b) => Value::String(hex::encode(b)),
            MoveArg::U64(n) => Value::String(n.to_string()),
            MoveArg::Bool(b) => Value::Bool(b),
            MoveArg::Address(a) => Value::String(a.to_hex_literal()),
        }
    }
}

// ---------------------------------------------------------------------------
// EntryFunctionPayload
// ---------------------------------------------------------------------------

/// Call descriptor for one entry function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    pub function: EntryFunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    /// Start a payload with no arguments.
    pub fn new(function: EntryFunctionId) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// Append any typed argument.
    pub fn arg(mut self, arg: MoveArg) -> Self {
        self.arguments.push(arg.into());
        self
    }

    /// Append a UTF-8 string as a byte-string argument.
    pub fn string_arg(self, s: &str) -> Self {
        self.arg(MoveArg::Bytes(s.as_bytes().to_vec()))
    }

    pub fn u64_arg(self, n: u64) -> Self {
        self.arg(MoveArg::U64(n))
    }

    pub fn bool_arg(self, b: bool) -> Self {
        self.arg(MoveArg::Bool(b))
    }

    pub fn address_arg(self, a: AccountAddress) -> Self {
        self.arg(MoveArg::Address(a))
    }

    fn raw_arg(&self, index: usize) -> Result<&Value, PayloadError> {
        self.arguments
            .get(index)
            .ok_or(PayloadError::MissingArgument { index })
    }

    /// Read argument `index` back as raw bytes (hex, optional `0x`).
    pub fn bytes_at(&self, index: usize) -> Result<Vec<u8>, PayloadError> {
        let invalid = PayloadError::InvalidArgument {
            index,
            expected: "hex byte string",
        };
        let s = self.raw_arg(index)?.as_str().ok_or(invalid.clone())?;
        hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|_| invalid)
    }

    /// Read argument `index` back as a UTF-8 string.
    pub fn string_at(&self, index: usize) -> Result<String, PayloadError> {
        String::from_utf8(self.bytes_at(index)?).map_err(|_| PayloadError::InvalidArgument {
            index,
            expected: "utf-8 string",
        })
    }

    /// Read argument `index` back as a decimal-string `u64`.
    pub fn u64_at(&self, index: usize) -> Result<u64, PayloadError> {
        self.raw_arg(index)?
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or(PayloadError::InvalidArgument {
                index,
                expected: "decimal u64 string",
            })
    }

    pub fn bool_at(&self, index: usize) -> Result<bool, PayloadError> {
        self.raw_arg(index)?
            .as_bool()
            .ok_or(PayloadError::InvalidArgument {
                index,
                expected: "bool",
            })
    }

    pub fn address_at(&self, index: usize) -> Result<AccountAddress, PayloadError> {
        self.raw_arg(index)?
            .as_str()
            .and_then(|s| AccountAddress::from_hex_literal(s).ok())
            .ok_or(PayloadError::InvalidArgument {
                index,
                expected: "address",
            })
    }
}

/// Tagged union of payload kinds. Only entry-function calls are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionPayload {
    #[serde(rename = "script_function_payload")]
    EntryFunction(EntryFunctionPayload),
}

impl TransactionPayload {
    /// The entry-function call inside the payload.
    pub fn entry_function(&self) -> &EntryFunctionPayload {
        match self {
            TransactionPayload::EntryFunction(p) => p,
        }
    }
}

impl From<EntryFunctionPayload> for TransactionPayload {
    fn from(p: EntryFunctionPayload) -> Self {
        TransactionPayload::EntryFunction(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn framework() -> AccountAddress {
        AccountAddress::from_hex_literal("0x1").unwrap()
    }

    #[test]
    fn function_id_renders_short_address() {
        let id = EntryFunctionId::new(framework(), "Token", "create_unlimited_collection_script");
        assert_eq!(
            id.to_string(),
            "0x1::Token::create_unlimited_collection_script"
        );
    }

    #[test]
    fn function_id_parses_back() {
        let id: EntryFunctionId = "0x1::TokenTransfers::offer_script".parse().unwrap();
        assert_eq!(id.module_address, framework());
        assert_eq!(id.module_name, "TokenTransfers");
        assert_eq!(id.function_name, "offer_script");
    }

    #[test]
    fn malformed_function_ids_are_rejected() {
        for bad in ["0x1::Token", "Token::f", "0x1::::f", "0xzz::Token::f", "a::b::c::d"] {
            assert!(bad.parse::<EntryFunctionId>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn wire_shape_matches_ledger_convention() {
        let creator = AccountAddress::from_hex_literal("0xa11ce").unwrap();
        let payload: TransactionPayload = EntryFunctionPayload::new(EntryFunctionId::new(
            framework(),
            "TokenTransfers",
            "offer_script",
        ))
        .address_arg(creator)
        .string_arg("Alice")
        .u64_arg(u64::MAX)
        .bool_arg(true)
        .into();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "script_function_payload");
        assert_eq!(json["function"], "0x1::TokenTransfers::offer_script");
        assert_eq!(json["type_arguments"], json!([]));
        assert_eq!(json["arguments"][0], json!(creator.to_hex_literal()));
        assert_eq!(json["arguments"][1], json!("416c696365"));
        assert_eq!(json["arguments"][2], json!("18446744073709551615"));
        assert_eq!(json["arguments"][3], json!(true));
    }

    #[test]
    fn strings_are_hex_of_raw_utf8_bytes() {
        let p = EntryFunctionPayload::new(EntryFunctionId::new(framework(), "M", "f"))
            .string_arg("Alice Token \"ü\"");
        let encoded = p.arguments[0].as_str().unwrap();
        assert_eq!(
            hex::decode(encoded).unwrap(),
            "Alice Token \"ü\"".as_bytes()
        );
        assert_eq!(p.string_at(0).unwrap(), "Alice Token \"ü\"");
    }

    #[test]
    fn typed_readers_reject_wrong_kinds() {
        let p = EntryFunctionPayload::new(EntryFunctionId::new(framework(), "M", "f"))
            .bool_arg(false)
            .u64_arg(7);
        assert!(p.u64_at(0).is_err());
        assert!(p.bool_at(1).is_err());
        assert_eq!(p.u64_at(1).unwrap(), 7);
        assert_eq!(p.u64_at(5), Err(PayloadError::MissingArgument { index: 5 }));
    }

    #[test]
    fn payload_json_roundtrip() {
        let payload: TransactionPayload =
            EntryFunctionPayload::new(EntryFunctionId::new(framework(), "Token", "f"))
                .string_arg("x")
                .into();
        let json = serde_json::to_string(&payload).unwrap();
        let back: TransactionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, back);
    }
}
