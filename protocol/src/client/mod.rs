//! # Token Operations Client
//!
//! The facade applications call. Every operation is a stateless `async`
//! unit of work over two collaborators:
//!
//! ```text
//! submit.rs: generate / sign / submit / await finality, finality policy
//! write.rs : collection and token creation, offer / claim / cancel
//! query.rs : two-phase reads: resource -> table handle -> table item
//! ```
//!
//! ## Concurrency
//!
//! [`TokenClient`] holds only immutable configuration and `Arc`'d
//! collaborators. It is `Send + Sync`, cheap to clone, and takes no locks.
//! Ordering between calls is whatever the ledger provides.

mod query;
mod submit;
mod write;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::ledger::{RestClient, SubmissionService, TableQueryService};

pub use write::{
    cancel_offer_payload, claim_payload, create_collection_payload, create_token_payload,
    offer_payload,
};

/// High-level token operations against one ledger.
#[derive(Clone)]
pub struct TokenClient {
    submission: Arc<dyn SubmissionService>,
    query: Arc<dyn TableQueryService>,
    config: ClientConfig,
}

impl TokenClient {
    pub fn new(
        submission: Arc<dyn SubmissionService>,
        query: Arc<dyn TableQueryService>,
        config: ClientConfig,
    ) -> Self {
        Self {
            submission,
            query,
            config,
        }
    }

    /// Client backed by a single REST endpoint for both collaborators. The
    /// REST poll interval is taken from `config`.
    pub fn from_rest(rest: RestClient, config: ClientConfig) -> Self {
        let rest = Arc::new(rest.with_poll_interval(config.poll_interval));
        Self::new(rest.clone(), rest, config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
