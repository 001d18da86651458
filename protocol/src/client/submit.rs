//! The submit helper every write operation funnels through.
//!
//! ```text
//! generate -> sign -> submit -> await_finality (bounded) -> finality policy
//! ```
//!
//! Failures before broadcast are [`TokenClientError::Submission`]. After
//! broadcast the hash is known, and every error carries it.

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::TokenClient;
use crate::account::TransactionSigner;
use crate::config::FinalityPolicy;
use crate::error::TokenClientError;
use crate::transaction::{TransactionOptions, TransactionOutcome, TransactionPayload};

impl TokenClient {
    /// Build, sign, submit, and wait for `payload` to finalize, using the
    /// configured gas and expiry. Returns the transaction hash.
    pub async fn submit_transaction(
        &self,
        signer: &dyn TransactionSigner,
        payload: TransactionPayload,
    ) -> Result<String, TokenClientError> {
        let options = TransactionOptions::from_config(&self.config);
        self.submit_transaction_with(signer, payload, options).await
    }

    /// [`Self::submit_transaction`] with per-call envelope options,
    /// including the confirmation budget.
    ///
    /// Pinning `options.sequence_number` makes a resubmission after a
    /// [`TokenClientError::ConfirmationTimeout`] safe: if the first attempt
    /// landed, the ledger rejects the replay.
    pub async fn submit_transaction_with(
        &self,
        signer: &dyn TransactionSigner,
        payload: TransactionPayload,
        options: TransactionOptions,
    ) -> Result<String, TokenClientError> {
        let sender = signer.address();
        let function = payload.entry_function().function.to_string();
        debug!(
            %sender,
            %function,
            arguments = payload.entry_function().arguments.len(),
            "building transaction"
        );

        let unsigned = self
            .submission
            .generate(sender, payload, &options)
            .await
            .map_err(TokenClientError::Submission)?;
        let signed = self
            .submission
            .sign(signer, unsigned)
            .await
            .map_err(TokenClientError::Submission)?;
        let pending = self
            .submission
            .submit(&signed)
            .await
            .map_err(TokenClientError::Submission)?;

        let hash = pending.hash;
        info!(
            %hash,
            %function,
            sequence_number = signed.raw.sequence_number,
            "transaction submitted"
        );

        let budget = options.confirmation_timeout;
        let finality = timeout(budget, self.submission.await_finality(&hash)).await;
        let outcome = match finality {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(source)) => {
                warn!(
                    %hash,
                    error = %source,
                    "finality poll failed; transaction may still land"
                );
                return Err(TokenClientError::ConfirmationFailed { hash, source });
            }
            Err(_) => {
                let timeout_ms = budget.as_millis() as u64;
                warn!(
                    %hash,
                    timeout_ms,
                    "finality not observed in time; transaction may still land"
                );
                return Err(TokenClientError::ConfirmationTimeout { hash, timeout_ms });
            }
        };

        self.apply_finality_policy(outcome)
    }

    fn apply_finality_policy(
        &self,
        outcome: TransactionOutcome,
    ) -> Result<String, TokenClientError> {
        if outcome.success {
            info!(hash = %outcome.hash, version = ?outcome.version, "transaction finalized");
            return Ok(outcome.hash);
        }

        match self.config.finality_policy {
            FinalityPolicy::RequireSuccess => {
                debug!(
                    hash = %outcome.hash,
                    vm_status = %outcome.vm_status,
                    "transaction rejected"
                );
                Err(TokenClientError::TransactionRejected {
                    hash: outcome.hash,
                    vm_status: outcome.vm_status,
                })
            }
            FinalityPolicy::ReturnHash => {
                warn!(
                    hash = %outcome.hash,
                    vm_status = %outcome.vm_status,
                    "transaction failed on ledger; returning hash per finality policy"
                );
                Ok(outcome.hash)
            }
        }
    }
}
