//! # CLI Interface
//!
//! Defines the command-line argument structure for `token-cli` using
//! `clap` derive. Write subcommands need a signing key; read subcommands
//! only need the node URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use token_protocol::account::LocalAccount;
use token_protocol::config::{ClientConfig, FinalityPolicy};
use token_protocol::types::AccountAddress;

/// Create, transfer, and inspect ledger tokens.
#[derive(Parser, Debug)]
#[command(
    name = "token-cli",
    about = "Create, transfer, and inspect ledger tokens",
    version,
    propagate_version = true
)]
pub struct TokenCli {
    /// Ledger REST endpoint, including the API version prefix.
    #[arg(
        long,
        global = true,
        env = "TOKEN_NODE_URL",
        default_value = "http://127.0.0.1:8080/v1"
    )]
    pub node_url: String,

    /// Hex-encoded Ed25519 secret key of the signing account.
    ///
    /// Prefer the environment variable; flags end up in shell history.
    #[arg(long, global = true, env = "TOKEN_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Signing account address, when it differs from the one derived from
    /// the key (rotated authentication key).
    #[arg(long, global = true, env = "TOKEN_ACCOUNT_ADDRESS")]
    pub account_address: Option<AccountAddress>,

    /// JSON client configuration file. Flags override its values.
    #[arg(long, short = 'c', global = true, env = "TOKEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gas ceiling for submitted transactions.
    #[arg(long, global = true, env = "TOKEN_MAX_GAS")]
    pub max_gas: Option<u64>,

    /// Gas currency code, for ledgers that still require one.
    #[arg(long, global = true, env = "TOKEN_GAS_CURRENCY_CODE")]
    pub gas_currency_code: Option<String>,

    /// How long to wait for finality, in milliseconds.
    #[arg(long, global = true, env = "TOKEN_CONFIRMATION_TIMEOUT_MS")]
    pub confirmation_timeout_ms: Option<u64>,

    /// Return the hash of a transaction the ledger rejected instead of
    /// failing.
    #[arg(long, global = true)]
    pub return_hash: bool,

    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "TOKEN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an unlimited collection owned by the signer.
    CreateCollection {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        uri: String,
    },
    /// Mint a new token type into the signer's store.
    CreateToken {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 1)]
        supply: u64,
        #[arg(long, default_value = "")]
        uri: String,
        /// Royalty in points per million (0..=1000000).
        #[arg(long, default_value_t = 0)]
        royalty: u64,
    },
    /// Offer tokens held by the signer to a receiver.
    Offer {
        #[arg(long)]
        receiver: AccountAddress,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        amount: u64,
    },
    /// Claim an offer made to the signer.
    Claim {
        #[arg(long)]
        sender: AccountAddress,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
    },
    /// Cancel an offer the signer made.
    Cancel {
        #[arg(long)]
        receiver: AccountAddress,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
    },
    /// Show a collection.
    Collection {
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        name: String,
    },
    /// Show token metadata.
    TokenData {
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
    },
    /// Show how many units of a token an account holds.
    Balance {
        #[arg(long)]
        owner: AccountAddress,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
        /// Print 0 instead of failing when the account never held the token.
        #[arg(long)]
        zero_if_missing: bool,
    },
    /// List an account's token resources and their table handles.
    Resources {
        #[arg(long)]
        account: AccountAddress,
    },
    /// Print the address of the configured signing key.
    Address,
    /// Generate a fresh key and print it with its address.
    GenerateKey,
}

impl TokenCli {
    /// Client configuration: defaults, then the config file, then flags.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                ClientConfig::from_json(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => ClientConfig::default(),
        };

        if let Some(max_gas) = self.max_gas {
            config.max_gas_amount = max_gas;
        }
        if let Some(code) = &self.gas_currency_code {
            config.gas_currency_code = Some(code.clone());
        }
        if let Some(ms) = self.confirmation_timeout_ms {
            config.confirmation_timeout = Duration::from_millis(ms);
        }
        if self.return_hash {
            config.finality_policy = FinalityPolicy::ReturnHash;
        }
        Ok(config)
    }

    /// The signing account. Fails when no key was supplied.
    pub fn signer(&self) -> Result<LocalAccount> {
        let key = self
            .private_key
            .as_deref()
            .context("a signing key is required: pass --private-key or set TOKEN_PRIVATE_KEY")?;
        let account = LocalAccount::from_hex(key).context("failed to load signing key")?;
        Ok(match self.account_address {
            Some(address) => account.with_address(address),
            None => account,
        })
    }
}
