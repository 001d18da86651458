//! # Protocol Configuration & Constants
//!
//! Every fixed name the ledger expects lives here: the framework address,
//! the entry functions we call, and the type descriptors used to address
//! on-chain tables. These strings must byte-match what the ledger has
//! registered. A typo here does not produce a "not found", it produces a
//! type error from the server.
//!
//! The tunable knobs (gas ceiling, confirmation budget, finality policy)
//! are collected in [`ClientConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Framework Identifiers
// ---------------------------------------------------------------------------

/// Address of the framework account that publishes the token modules.
pub const FRAMEWORK_ADDRESS: &str = "0x1";

/// Module holding collections, token data, and token stores.
pub const TOKEN_MODULE: &str = "Token";

/// Module implementing the offer / claim / cancel escrow.
pub const TOKEN_TRANSFERS_MODULE: &str = "TokenTransfers";

/// Discriminator for entry-function call payloads.
pub const ENTRY_FUNCTION_PAYLOAD_TYPE: &str = "script_function_payload";

// ---------------------------------------------------------------------------
// Entry Functions
// ---------------------------------------------------------------------------

pub const CREATE_COLLECTION_FUNCTION: &str = "create_unlimited_collection_script";
pub const CREATE_TOKEN_FUNCTION: &str = "create_unlimited_token_script";
pub const OFFER_FUNCTION: &str = "offer_script";
pub const CLAIM_FUNCTION: &str = "claim_script";
pub const CANCEL_OFFER_FUNCTION: &str = "cancel_offer_script";

// ---------------------------------------------------------------------------
// Type Descriptors
// ---------------------------------------------------------------------------

/// Aggregate resource owning a creator's collection and token-data tables.
pub const COLLECTIONS_RESOURCE: &str = "0x1::Token::Collections";

/// Aggregate resource owning an account's balance table.
pub const TOKEN_STORE_RESOURCE: &str = "0x1::Token::TokenStore";

/// Key type of the collections table.
pub const STRING_TYPE: &str = "0x1::ASCII::String";

/// Value type of the collections table.
pub const COLLECTION_TYPE: &str = "0x1::Token::Collection";

/// Key type of both the token-data table and the balance table.
pub const TOKEN_ID_TYPE: &str = "0x1::Token::TokenId";

/// Value type of the token-data table.
pub const TOKEN_DATA_TYPE: &str = "0x1::Token::TokenData";

/// Value type of the balance table.
pub const TOKEN_TYPE: &str = "0x1::Token::Token";

// ---------------------------------------------------------------------------
// Limits & Defaults
// ---------------------------------------------------------------------------

/// Gas ceiling attached to every transaction unless configured otherwise.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 4_000;

/// Gas unit price bid on every transaction.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 1;

/// Seconds from now after which an unexecuted transaction is discarded.
pub const DEFAULT_EXPIRATION_SECS: u64 = 600;

/// How long the client waits for finality before giving up. Giving up does
/// not cancel anything: the transaction is already broadcast.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between finality polls against the ledger.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Royalties are expressed in points per million.
pub const MAX_ROYALTY_POINTS_PER_MILLION: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Client Configuration
// ---------------------------------------------------------------------------

/// How a finalized-but-failed transaction is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalityPolicy {
    /// Execution failure is an error carrying the hash and the VM status.
    #[default]
    RequireSuccess,
    /// The hash is returned whatever the execution status. Callers must
    /// inspect the transaction themselves; a warning is logged on failure.
    ReturnHash,
}

/// Tunables for [`crate::client::TokenClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gas ceiling for every submitted transaction.
    pub max_gas_amount: u64,
    /// Gas unit price for every submitted transaction.
    pub gas_unit_price: u64,
    /// Expiration window, in seconds from envelope construction.
    pub expiration_secs: u64,
    /// Budget for observing finality after broadcast.
    #[serde(with = "duration_millis")]
    pub confirmation_timeout: Duration,
    /// Delay between finality polls (used by the REST collaborator).
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,
    /// Interpretation of finalized-but-failed transactions.
    pub finality_policy: FinalityPolicy,
    /// Gas currency attached to every envelope. Ledgers still on the
    /// currency-denominated gas schedule (e.g. `XUS`) require it; leave it
    /// unset for ledgers that pay gas in the native coin.
    pub gas_currency_code: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            finality_policy: FinalityPolicy::default(),
            gas_currency_code: None,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
