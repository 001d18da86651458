//! Error types for token operations.
//!
//! Two layers:
//!
//! - [`LedgerError`] is what the collaborators (submission service, table
//!   query service) report. It knows about HTTP-ish failure shapes but not
//!   about what the caller was trying to do.
//! - [`TokenClientError`] is what every public operation returns. The client
//!   classifies collaborator errors per call site, so a `NotFound` from a
//!   resource fetch and a `NotFound` from a table lookup end up as different
//!   variants.
//!
//! Nothing in this crate retries. A failed call is surfaced as-is.

use thiserror::Error;

/// Errors reported by the ledger collaborators.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The addressed resource, table item, or transaction does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The ledger rejected a type descriptor or a key of the wrong shape.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The ledger answered with an unexpected status.
    #[error("ledger api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body or message returned by the ledger.
        message: String,
    },

    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LedgerError::Decode(err.to_string())
        } else {
            LedgerError::Transport(err.to_string())
        }
    }
}

/// Errors returned by [`crate::client::TokenClient`] operations.
#[derive(Debug, Error)]
pub enum TokenClientError {
    /// Building, signing, or broadcasting the transaction failed. Nothing
    /// reached the ledger's execution stage.
    #[error("submission failed: {0}")]
    Submission(#[source] LedgerError),

    /// Finality was not observed within the confirmation budget.
    ///
    /// The transaction was already broadcast and may still land. Re-check
    /// by hash before resubmitting, or risk executing the operation twice.
    #[error("transaction {hash} not finalized within {timeout_ms}ms (it may still land)")]
    ConfirmationTimeout {
        /// Hash of the broadcast transaction.
        hash: String,
        /// Configured budget in milliseconds.
        timeout_ms: u64,
    },

    /// Broadcast succeeded but polling for the outcome failed. Same hazard
    /// as a timeout: the transaction may or may not have landed.
    #[error("lost track of transaction {hash} while awaiting finality: {source}")]
    ConfirmationFailed {
        /// Hash of the broadcast transaction.
        hash: String,
        #[source]
        source: LedgerError,
    },

    /// The ledger executed the transaction and it failed.
    #[error("transaction {hash} rejected by ledger: {vm_status}")]
    TransactionRejected {
        /// Hash of the rejected transaction, for inspection.
        hash: String,
        /// Abort reason reported by the ledger.
        vm_status: String,
    },

    /// The account does not hold the aggregate resource the read needs.
    #[error("resource {resource_type} not found under account {address}")]
    ResourceNotFound {
        /// Queried account.
        address: String,
        /// Resource type descriptor that was requested.
        resource_type: String,
    },

    /// The table exists but has no entry for the key.
    #[error("key {key} not found in table {handle}")]
    KeyNotFound {
        /// Table handle that was searched.
        handle: String,
        /// JSON rendering of the key.
        key: String,
    },

    /// A type descriptor did not match the type registered on the ledger.
    /// Client and ledger disagree on the schema; retrying cannot help.
    #[error("type descriptor mismatch: {0}")]
    TypeMismatch(String),

    /// A caller-supplied argument failed local validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A resource or table value did not have the expected shape.
    #[error("malformed {what}: {reason}")]
    MalformedResource {
        /// What was being decoded.
        what: String,
        /// Why decoding failed.
        reason: String,
    },

    /// Any other collaborator failure on the read path.
    #[error(transparent)]
    Ledger(LedgerError),
}

impl TokenClientError {
    /// True for a table lookup that found the table but not the key.
    ///
    /// Balance readers commonly treat this as "holds zero"; the client
    /// never makes that call on their behalf.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, TokenClientError::KeyNotFound { .. })
    }

    /// Advisory: whether repeating the same read might succeed.
    ///
    /// Only transport failures on the read path qualify. Write-path errors
    /// are never retriable here, since a lost confirmation cannot be told
    /// apart from a lost submission.
    pub fn is_retriable(&self) -> bool {
        matches!(self, TokenClientError::Ledger(LedgerError::Transport(_)))
    }
}
