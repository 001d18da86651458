//! # Transaction Module
//!
//! Call descriptors and envelopes for the write path.
//!
//! ```text
//! payload.rs : entry-function ids, typed arguments, the tagged payload union
//! envelope.rs: unsigned / signed / pending envelopes and finality outcomes
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Describe**: build an [`EntryFunctionPayload`] naming the function
//!    and its encoded arguments.
//! 2. **Generate**: the submission service wraps it in an
//!    [`UnsignedTransaction`] (sender, sequence number, gas, expiry).
//! 3. **Sign**: a [`crate::account::TransactionSigner`] produces a
//!    [`SignedTransaction`].
//! 4. **Submit**: the ledger acknowledges with a [`PendingTransaction`].
//! 5. **Finalize**: the ledger reports a [`TransactionOutcome`].

pub mod envelope;
pub mod payload;

pub use envelope::{
    PendingTransaction, SignedTransaction, TransactionOptions, TransactionOutcome,
    TransactionSignature, UnsignedTransaction,
};
pub use payload::{EntryFunctionId, EntryFunctionPayload, MoveArg, PayloadError, TransactionPayload};
