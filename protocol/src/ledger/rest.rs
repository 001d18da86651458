//! HTTP implementation of both ledger collaborators.
//!
//! | Operation          | Request                                   |
//! |--------------------|-------------------------------------------|
//! | sequence number    | `GET  /accounts/{address}`                |
//! | signing message    | `POST /transactions/encode_submission`    |
//! | submit             | `POST /transactions`                      |
//! | finality poll      | `GET  /transactions/by_hash/{hash}`       |
//! | one resource       | `GET  /accounts/{address}/resource/{type}`|
//! | all resources      | `GET  /accounts/{address}/resources`      |
//! | table item         | `POST /tables/{handle}/item`              |
//!
//! Status mapping: 404 is [`LedgerError::NotFound`]; a 400 on a table
//! lookup is [`LedgerError::TypeMismatch`] (the request shape is fixed, so
//! the only thing the ledger can object to is the descriptors or the key
//! shape); every other non-2xx status is [`LedgerError::Api`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, trace};

use super::{AccountResource, SubmissionService, TableItemRequest, TableQueryService};
use crate::account::TransactionSigner;
use crate::config;
use crate::error::LedgerError;
use crate::transaction::{
    PendingTransaction, SignedTransaction, TransactionOptions, TransactionOutcome,
    TransactionPayload, TransactionSignature, UnsignedTransaction,
};
use crate::types::{AccountAddress, TableHandle};

/// Transaction type reported while a transaction sits in the mempool.
const PENDING_TRANSACTION_TYPE: &str = "pending_transaction";

/// Ledger REST client.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
    poll_interval: Duration,
}

#[derive(Deserialize)]
struct AccountInfo {
    #[serde(with = "crate::types::records::u64_string")]
    sequence_number: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct TransactionStatus {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl RestClient {
    /// Client for the ledger API rooted at `base_url` (e.g.
    /// `http://127.0.0.1:8080/v1`).
    pub fn new(base_url: &str) -> Self {
        debug!(base_url, "ledger rest client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            poll_interval: config::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the delay between finality polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current sequence number of `address`.
    pub async fn sequence_number(&self, address: AccountAddress) -> Result<u64, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, address);
        let response = self.get(&url).await?;
        let info: AccountInfo = response.json().await?;
        Ok(info.sequence_number)
    }
}

impl RestClient {
    async fn get(&self, url: &str) -> Result<Response, LedgerError> {
        trace!(url, "GET");
        let response = self.http.get(url).send().await?;
        check_status(response).await
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response, LedgerError> {
        trace!(url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        check_status(response).await
    }
}

/// Map non-success statuses to [`LedgerError`], keeping the ledger's
/// message when the body carries one.
async fn check_status(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    Err(match status {
        StatusCode::NOT_FOUND => LedgerError::NotFound(format!("{url}: {message}")),
        _ => LedgerError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl SubmissionService for RestClient {
    async fn generate(
        &self,
        sender: AccountAddress,
        payload: TransactionPayload,
        options: &TransactionOptions,
    ) -> Result<UnsignedTransaction, LedgerError> {
        let sequence_number = match options.sequence_number {
            Some(n) => n,
            None => self.sequence_number(sender).await?,
        };
        Ok(UnsignedTransaction::new(
            sender,
            sequence_number,
            payload,
            options,
        ))
    }

    async fn sign(
        &self,
        signer: &dyn TransactionSigner,
        txn: UnsignedTransaction,
    ) -> Result<SignedTransaction, LedgerError> {
        let url = format!("{}/transactions/encode_submission", self.base_url);
        let response = self.post(&url, &txn).await?;
        let encoded: String = response.json().await?;
        let message = hex::decode(encoded.trim_start_matches("0x"))
            .map_err(|e| LedgerError::Decode(format!("signing message: {e}")))?;

        let signature = signer.sign_message(&message)?;
        Ok(SignedTransaction {
            raw: txn,
            signature: TransactionSignature::ed25519(signer.public_key_hex(), &signature),
        })
    }

    async fn submit(&self, txn: &SignedTransaction) -> Result<PendingTransaction, LedgerError> {
        let url = format!("{}/transactions", self.base_url);
        let response = self.post(&url, txn).await?;
        let pending: PendingTransaction = response.json().await?;
        debug!(hash = %pending.hash, "transaction accepted into mempool");
        Ok(pending)
    }

    async fn await_finality(&self, hash: &str) -> Result<TransactionOutcome, LedgerError> {
        let url = format!("{}/transactions/by_hash/{}", self.base_url, hash);
        loop {
            match self.get(&url).await {
                Ok(response) => {
                    let status: TransactionStatus = response.json().await?;
                    if status.kind != PENDING_TRANSACTION_TYPE {
                        return Ok(TransactionOutcome {
                            hash: hash.to_string(),
                            success: status.success.unwrap_or(false),
                            vm_status: status.vm_status.unwrap_or_default(),
                            version: status.version.and_then(|v| v.parse().ok()),
                        });
                    }
                }
                // Not yet indexed by the node we are talking to.
                Err(LedgerError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl TableQueryService for RestClient {
    async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, LedgerError> {
        let url = format!(
            "{}/accounts/{}/resource/{}",
            self.base_url, address, resource_type
        );
        let response = self.get(&url).await?;
        Ok(response.json().await?)
    }

    async fn get_account_resources(
        &self,
        address: AccountAddress,
    ) -> Result<Vec<AccountResource>, LedgerError> {
        let url = format!("{}/accounts/{}/resources", self.base_url, address);
        let response = self.get(&url).await?;
        Ok(response.json().await?)
    }

    async fn get_table_item(
        &self,
        handle: &TableHandle,
        request: &TableItemRequest,
    ) -> Result<serde_json::Value, LedgerError> {
        let url = format!("{}/tables/{}/item", self.base_url, handle);
        match self.post(&url, request).await {
            Ok(response) => Ok(response.json().await?),
            Err(LedgerError::Api {
                status: 400,
                message,
            }) => Err(LedgerError::TypeMismatch(message)),
            Err(e) => Err(e),
        }
    }
}
