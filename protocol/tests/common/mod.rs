//! In-memory ledger shared by the integration tests.
//!
//! Implements both collaborator traits over a single `parking_lot::Mutex`.
//! Transactions execute synchronously at submit time by decoding the
//! wire-encoded entry-function arguments, so the tests exercise the exact
//! payloads the client produces. Tables are registered with key and value
//! type descriptors and reject lookups that name different ones.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use sha3::{Digest, Sha3_256};

use token_protocol::account::{LocalAccount, TransactionSigner};
use token_protocol::config::{self, ClientConfig};
use token_protocol::error::LedgerError;
use token_protocol::ledger::{
    AccountResource, SubmissionService, TableItemRequest, TableQueryService,
};
use token_protocol::transaction::{
    EntryFunctionPayload, PendingTransaction, SignedTransaction, TransactionOptions,
    TransactionOutcome, TransactionPayload, TransactionSignature, UnsignedTransaction,
};
use token_protocol::types::{
    AccountAddress, Collection, Royalty, TableHandle, Token, TokenData, TokenId,
};
use token_protocol::TokenClient;

pub const EXECUTED: &str = "Executed successfully";
pub const ACCOUNT_RESOURCE: &str = "0x1::Account::Account";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Deterministic account from a one-byte seed.
pub fn account(seed: u8) -> LocalAccount {
    LocalAccount::from_seed(&[seed; 32])
}

/// A client over `ledger` with a short poll and confirmation budget.
pub fn client(ledger: &Arc<MockLedger>, config: ClientConfig) -> TokenClient {
    TokenClient::new(ledger.clone(), ledger.clone(), config)
}

pub fn default_client(ledger: &Arc<MockLedger>) -> TokenClient {
    client(ledger, ClientConfig::default())
}

// ---------------------------------------------------------------------------
// Ledger State
// ---------------------------------------------------------------------------

struct Table {
    key_type: String,
    value_type: String,
    items: HashMap<String, Value>,
}

#[derive(Default)]
struct State {
    sequence_numbers: HashMap<AccountAddress, u64>,
    /// owner -> (collections handle, token_data handle)
    collections: HashMap<AccountAddress, (String, String)>,
    /// owner -> tokens handle
    token_stores: HashMap<AccountAddress, String>,
    tables: HashMap<String, Table>,
    next_handle: u64,
    /// (sender, receiver, token) -> escrowed amount
    offers: HashMap<(AccountAddress, AccountAddress, TokenId), u64>,
    outcomes: HashMap<String, TransactionOutcome>,
    submitted: Vec<SignedTransaction>,
    skew_value_types: bool,
}

type Abort = String;

fn item_key<K: Serialize + ?Sized>(key: &K) -> String {
    serde_json::to_value(key)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

impl State {
    fn new_table(&mut self, key_type: &str, value_type: &str) -> String {
        self.next_handle += 1;
        let handle = format!("0x{:x}", 0xabc000 + self.next_handle);
        let value_type = if self.skew_value_types {
            format!("{value_type}V2")
        } else {
            value_type.to_string()
        };
        self.tables.insert(
            handle.clone(),
            Table {
                key_type: key_type.to_string(),
                value_type,
                items: HashMap::new(),
            },
        );
        handle
    }

    fn get<K: Serialize + ?Sized, V: DeserializeOwned>(&self, handle: &str, key: &K) -> Option<V> {
        let item = self.tables.get(handle)?.items.get(&item_key(key))?;
        serde_json::from_value(item.clone()).ok()
    }

    fn put<K: Serialize + ?Sized, V: Serialize>(&mut self, handle: &str, key: &K, value: &V) {
        if let Some(table) = self.tables.get_mut(handle) {
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            table.items.insert(item_key(key), value);
        }
    }

    fn collections_of(&mut self, owner: AccountAddress) -> (String, String) {
        if let Some(handles) = self.collections.get(&owner) {
            return handles.clone();
        }
        let collections = self.new_table(config::STRING_TYPE, config::COLLECTION_TYPE);
        let token_data = self.new_table(config::TOKEN_ID_TYPE, config::TOKEN_DATA_TYPE);
        let handles = (collections, token_data);
        self.collections.insert(owner, handles.clone());
        handles
    }

    fn store_of(&mut self, owner: AccountAddress) -> String {
        if let Some(handle) = self.token_stores.get(&owner) {
            return handle.clone();
        }
        let handle = self.new_table(config::TOKEN_ID_TYPE, config::TOKEN_TYPE);
        self.token_stores.insert(owner, handle.clone());
        handle
    }

    fn deposit(&mut self, owner: AccountAddress, id: &TokenId, amount: u64) {
        let store = self.store_of(owner);
        let mut token: Token = self.get(&store, id).unwrap_or_else(|| Token::zero(id.clone()));
        token.value += amount;
        self.put(&store, id, &token);
    }

    fn withdraw(&mut self, owner: AccountAddress, id: &TokenId, amount: u64) -> Result<(), Abort> {
        let store = self
            .token_stores
            .get(&owner)
            .cloned()
            .ok_or("Move abort: ETOKEN_STORE_NOT_PUBLISHED")?;
        let mut token: Token = self
            .get(&store, id)
            .ok_or("Move abort: ETOKEN_NOT_IN_STORE")?;
        if token.value < amount {
            return Err("Move abort: EINSUFFICIENT_BALANCE".into());
        }
        token.value -= amount;
        self.put(&store, id, &token);
        Ok(())
    }

    // -- entry functions ----------------------------------------------------

    fn execute(
        &mut self,
        sender: AccountAddress,
        call: &EntryFunctionPayload,
    ) -> Result<(), Abort> {
        let bad_arg = |e: token_protocol::transaction::PayloadError| {
            format!("Move abort: EINVALID_ARGUMENT ({e})")
        };
        match (
            call.function.module_name.as_str(),
            call.function.function_name.as_str(),
        ) {
            (config::TOKEN_MODULE, config::CREATE_COLLECTION_FUNCTION) => {
                let description = call.string_at(0).map_err(bad_arg)?;
                let name = call.string_at(1).map_err(bad_arg)?;
                let uri = call.string_at(2).map_err(bad_arg)?;
                self.create_collection(sender, description, name, uri)
            }
            (config::TOKEN_MODULE, config::CREATE_TOKEN_FUNCTION) => {
                let collection = call.string_at(0).map_err(bad_arg)?;
                let name = call.string_at(1).map_err(bad_arg)?;
                let description = call.string_at(2).map_err(bad_arg)?;
                let _unlimited = call.bool_at(3).map_err(bad_arg)?;
                let supply = call.u64_at(4).map_err(bad_arg)?;
                let uri = call.string_at(5).map_err(bad_arg)?;
                let royalty = call.u64_at(6).map_err(bad_arg)?;
                let data = TokenData {
                    collection,
                    name,
                    description,
                    uri,
                    maximum: None,
                    supply: Some(supply),
                    royalty: Some(Royalty {
                        royalty_points_per_million: royalty,
                        creator_account: sender,
                    }),
                };
                self.create_token(sender, data)
            }
            (config::TOKEN_TRANSFERS_MODULE, config::OFFER_FUNCTION) => {
                let receiver = call.address_at(0).map_err(bad_arg)?;
                let id = TokenId::new(
                    call.address_at(1).map_err(bad_arg)?,
                    call.string_at(2).map_err(bad_arg)?,
                    call.string_at(3).map_err(bad_arg)?,
                );
                let amount = call.u64_at(4).map_err(bad_arg)?;
                self.withdraw(sender, &id, amount)?;
                *self.offers.entry((sender, receiver, id)).or_insert(0) += amount;
                Ok(())
            }
            (config::TOKEN_TRANSFERS_MODULE, config::CLAIM_FUNCTION) => {
                let offerer = call.address_at(0).map_err(bad_arg)?;
                let id = TokenId::new(
                    call.address_at(1).map_err(bad_arg)?,
                    call.string_at(2).map_err(bad_arg)?,
                    call.string_at(3).map_err(bad_arg)?,
                );
                let amount = self
                    .offers
                    .remove(&(offerer, sender, id.clone()))
                    .ok_or("Move abort: EOFFER_NOT_EXIST")?;
                self.deposit(sender, &id, amount);
                Ok(())
            }
            (config::TOKEN_TRANSFERS_MODULE, config::CANCEL_OFFER_FUNCTION) => {
                let receiver = call.address_at(0).map_err(bad_arg)?;
                let id = TokenId::new(
                    call.address_at(1).map_err(bad_arg)?,
                    call.string_at(2).map_err(bad_arg)?,
                    call.string_at(3).map_err(bad_arg)?,
                );
                let amount = self
                    .offers
                    .remove(&(sender, receiver, id.clone()))
                    .ok_or("Move abort: EOFFER_NOT_EXIST")?;
                self.deposit(sender, &id, amount);
                Ok(())
            }
            _ => Err(format!("FUNCTION_RESOLUTION_FAILURE: {}", call.function)),
        }
    }

    fn create_collection(
        &mut self,
        creator: AccountAddress,
        description: String,
        name: String,
        uri: String,
    ) -> Result<(), Abort> {
        let (collections, _) = self.collections_of(creator);
        if self.get::<_, Collection>(&collections, &name).is_some() {
            return Err("Move abort: ECOLLECTION_ALREADY_EXISTS".into());
        }
        let collection = Collection {
            description,
            name: name.clone(),
            uri,
            count: 0,
            maximum: None,
        };
        self.put(&collections, &name, &collection);
        Ok(())
    }

    fn create_token(&mut self, creator: AccountAddress, data: TokenData) -> Result<(), Abort> {
        let (collections, token_data) = self
            .collections
            .get(&creator)
            .cloned()
            .ok_or("Move abort: ECOLLECTIONS_NOT_PUBLISHED")?;
        let mut collection: Collection = self
            .get(&collections, &data.collection)
            .ok_or("Move abort: ECOLLECTION_NOT_PUBLISHED")?;

        let id = TokenId::new(creator, data.collection.clone(), data.name.clone());
        if self.get::<_, TokenData>(&token_data, &id).is_some() {
            return Err("Move abort: ETOKEN_ALREADY_EXISTS".into());
        }

        collection.count += 1;
        self.put(&collections, &data.collection, &collection);
        let supply = data.supply.unwrap_or(0);
        self.put(&token_data, &id, &data);
        self.deposit(creator, &id, supply);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockLedger
// ---------------------------------------------------------------------------

/// In-memory ledger with knobs for the failure modes the client handles.
#[derive(Default)]
pub struct MockLedger {
    state: Mutex<State>,
    hang_finality: AtomicBool,
    fail_finality: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A ledger whose tables are registered under value types the client
    /// does not know, as after a framework upgrade.
    pub fn with_skewed_value_types() -> Arc<Self> {
        let ledger = Self::default();
        ledger.state.lock().skew_value_types = true;
        Arc::new(ledger)
    }

    /// Never report finality.
    pub fn set_hang_finality(&self, on: bool) {
        self.hang_finality.store(on, Ordering::SeqCst);
    }

    /// Fail finality polls with a transport error.
    pub fn set_fail_finality(&self, on: bool) {
        self.fail_finality.store(on, Ordering::SeqCst);
    }

    /// Every signed transaction accepted so far, in order.
    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.state.lock().submitted.clone()
    }

    pub fn sequence_number(&self, address: AccountAddress) -> u64 {
        self.state
            .lock()
            .sequence_numbers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Units currently escrowed from `sender` to `receiver`.
    pub fn pending_offer(
        &self,
        sender: AccountAddress,
        receiver: AccountAddress,
        id: &TokenId,
    ) -> u64 {
        self.state
            .lock()
            .offers
            .get(&(sender, receiver, id.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn signing_message(txn: &UnsignedTransaction) -> Result<Vec<u8>, LedgerError> {
        let mut message = b"TOKEN::RawTransaction::".to_vec();
        let body = serde_json::to_vec(txn).map_err(|e| LedgerError::Decode(e.to_string()))?;
        message.extend(body);
        Ok(message)
    }

    fn verify(txn: &SignedTransaction) -> Result<(), LedgerError> {
        let invalid = || LedgerError::Api {
            status: 400,
            message: "INVALID_SIGNATURE".into(),
        };
        let decode = |s: &str| hex::decode(s.trim_start_matches("0x")).map_err(|_| invalid());

        let public_key: [u8; 32] = decode(&txn.signature.public_key)?
            .try_into()
            .map_err(|_| invalid())?;
        let key = VerifyingKey::from_bytes(&public_key).map_err(|_| invalid())?;
        let signature =
            Signature::from_slice(&decode(&txn.signature.signature)?).map_err(|_| invalid())?;
        let message = Self::signing_message(&txn.raw)?;
        key.verify(&message, &signature).map_err(|_| invalid())
    }
}

#[async_trait]
impl SubmissionService for MockLedger {
    async fn generate(
        &self,
        sender: AccountAddress,
        payload: TransactionPayload,
        options: &TransactionOptions,
    ) -> Result<UnsignedTransaction, LedgerError> {
        let sequence_number = match options.sequence_number {
            Some(n) => n,
            None => self.sequence_number(sender),
        };
        Ok(UnsignedTransaction::new(sender, sequence_number, payload, options))
    }

    async fn sign(
        &self,
        signer: &dyn TransactionSigner,
        txn: UnsignedTransaction,
    ) -> Result<SignedTransaction, LedgerError> {
        let message = Self::signing_message(&txn)?;
        let signature = signer.sign_message(&message)?;
        Ok(SignedTransaction {
            raw: txn,
            signature: TransactionSignature::ed25519(signer.public_key_hex(), &signature),
        })
    }

    async fn submit(&self, txn: &SignedTransaction) -> Result<PendingTransaction, LedgerError> {
        Self::verify(txn)?;

        let mut state = self.state.lock();
        let sender = txn.raw.sender;
        let expected = state.sequence_numbers.get(&sender).copied().unwrap_or(0);
        if txn.raw.sequence_number != expected {
            let message = if txn.raw.sequence_number < expected {
                "SEQUENCE_NUMBER_TOO_OLD"
            } else {
                "SEQUENCE_NUMBER_TOO_NEW"
            };
            return Err(LedgerError::Api {
                status: 400,
                message: message.into(),
            });
        }

        let body = serde_json::to_vec(txn).map_err(|e| LedgerError::Decode(e.to_string()))?;
        let hash = format!("0x{}", hex::encode(Sha3_256::digest(&body)));

        state.sequence_numbers.insert(sender, expected + 1);
        let result = state.execute(sender, txn.raw.payload.entry_function());
        let version = state.outcomes.len() as u64 + 1;
        let outcome = match result {
            Ok(()) => TransactionOutcome {
                hash: hash.clone(),
                success: true,
                vm_status: EXECUTED.into(),
                version: Some(version),
            },
            Err(vm_status) => TransactionOutcome {
                hash: hash.clone(),
                success: false,
                vm_status,
                version: Some(version),
            },
        };
        state.outcomes.insert(hash.clone(), outcome);
        state.submitted.push(txn.clone());
        Ok(PendingTransaction { hash })
    }

    async fn await_finality(&self, hash: &str) -> Result<TransactionOutcome, LedgerError> {
        if self.hang_finality.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_finality.load(Ordering::SeqCst) {
            return Err(LedgerError::Transport("connection reset by peer".into()));
        }
        self.state
            .lock()
            .outcomes
            .get(hash)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {hash}")))
    }
}

#[async_trait]
impl TableQueryService for MockLedger {
    async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, LedgerError> {
        let state = self.state.lock();
        let data = match resource_type {
            config::COLLECTIONS_RESOURCE => state.collections.get(&address).map(|(c, t)| {
                json!({
                    "collections": {"handle": c},
                    "token_data": {"handle": t},
                })
            }),
            config::TOKEN_STORE_RESOURCE => state
                .token_stores
                .get(&address)
                .map(|h| json!({"tokens": {"handle": h}})),
            ACCOUNT_RESOURCE => state
                .sequence_numbers
                .get(&address)
                .map(|n| json!({"sequence_number": n.to_string()})),
            _ => None,
        };
        data.map(|data| AccountResource {
            resource_type: resource_type.to_string(),
            data,
        })
        .ok_or_else(|| LedgerError::NotFound(format!("{resource_type} under {address}")))
    }

    async fn get_account_resources(
        &self,
        address: AccountAddress,
    ) -> Result<Vec<AccountResource>, LedgerError> {
        let mut resources = Vec::new();
        for ty in [
            ACCOUNT_RESOURCE,
            config::COLLECTIONS_RESOURCE,
            config::TOKEN_STORE_RESOURCE,
        ] {
            match self.get_account_resource(address, ty).await {
                Ok(r) => resources.push(r),
                Err(LedgerError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        if resources.is_empty() {
            return Err(LedgerError::NotFound(format!("account {address}")));
        }
        Ok(resources)
    }

    async fn get_table_item(
        &self,
        handle: &TableHandle,
        request: &TableItemRequest,
    ) -> Result<Value, LedgerError> {
        let state = self.state.lock();
        let table = state
            .tables
            .get(handle.as_str())
            .ok_or_else(|| LedgerError::NotFound(format!("table {handle}")))?;
        if table.key_type != request.key_type || table.value_type != request.value_type {
            return Err(LedgerError::TypeMismatch(format!(
                "table {handle} holds <{}, {}>, requested <{}, {}>",
                table.key_type, table.value_type, request.key_type, request.value_type
            )));
        }
        table
            .items
            .get(&request.key.to_string())
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("key {} in table {handle}", request.key)))
    }
}
