// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Token CLI
//!
//! Entry point for the `token-cli` binary. Parses CLI arguments,
//! initializes logging, builds a [`TokenClient`] over the ledger's REST
//! API, and runs one operation.
//!
//! - `create-collection`, `create-token`: mint
//! - `offer`, `claim`, `cancel`: transfer through the offer escrow
//! - `collection`, `token-data`, `balance`, `resources`: read
//! - `address`, `generate-key`: local key helpers
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use token_protocol::account::{LocalAccount, TransactionSigner};
use token_protocol::config;
use token_protocol::ledger::RestClient;
use token_protocol::types::{Token, TokenId, TokenResource};
use token_protocol::TokenClient;

use cli::{Commands, TokenCli};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TokenCli::parse();
    logging::init_logging(
        "token_cli=info,token_protocol=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match &cli.command {
        Commands::Address => {
            let signer = cli.signer()?;
            print_json(&json!({ "address": signer.address() }))
        }
        Commands::GenerateKey => {
            let account = LocalAccount::generate();
            print_json(&json!({
                "address": account.address(),
                "public_key": account.public_key_hex(),
                "private_key": hex::encode(account.secret_key_bytes()),
            }))
        }
        command => {
            let config = cli.client_config()?;
            tracing::debug!(node_url = %cli.node_url, ?config, "connecting");
            let client = TokenClient::from_rest(RestClient::new(&cli.node_url), config);
            run(&cli, &client, command).await
        }
    }
}

/// Runs one ledger-facing subcommand.
async fn run(cli: &TokenCli, client: &TokenClient, command: &Commands) -> Result<()> {
    match command {
        Commands::CreateCollection {
            name,
            description,
            uri,
        } => {
            let signer = cli.signer()?;
            let hash = client
                .create_collection(&signer, name, description, uri)
                .await
                .with_context(|| format!("failed to create collection {name:?}"))?;
            print_hash(&hash)
        }
        Commands::CreateToken {
            collection,
            name,
            description,
            supply,
            uri,
            royalty,
        } => {
            let signer = cli.signer()?;
            let hash = client
                .create_token(&signer, collection, name, description, *supply, uri, *royalty)
                .await
                .with_context(|| format!("failed to create token {name:?} in {collection:?}"))?;
            print_hash(&hash)
        }
        Commands::Offer {
            receiver,
            creator,
            collection,
            name,
            amount,
        } => {
            let signer = cli.signer()?;
            let hash = client
                .offer_token(&signer, *receiver, *creator, collection, name, *amount)
                .await
                .with_context(|| format!("failed to offer {amount} of {name:?} to {receiver}"))?;
            print_hash(&hash)
        }
        Commands::Claim {
            sender,
            creator,
            collection,
            name,
        } => {
            let signer = cli.signer()?;
            let hash = client
                .claim_token(&signer, *sender, *creator, collection, name)
                .await
                .with_context(|| format!("failed to claim {name:?} from {sender}"))?;
            print_hash(&hash)
        }
        Commands::Cancel {
            receiver,
            creator,
            collection,
            name,
        } => {
            let signer = cli.signer()?;
            let hash = client
                .cancel_token_offer(&signer, *receiver, *creator, collection, name)
                .await
                .with_context(|| format!("failed to cancel offer of {name:?} to {receiver}"))?;
            print_hash(&hash)
        }
        Commands::Collection { creator, name } => {
            let collection = client
                .get_collection_data(*creator, name)
                .await
                .with_context(|| format!("failed to read collection {name:?}"))?;
            print_json(&collection)
        }
        Commands::TokenData {
            creator,
            collection,
            name,
        } => {
            let data = client
                .get_token_data(*creator, collection, name)
                .await
                .with_context(|| format!("failed to read token data for {name:?}"))?;
            print_json(&data)
        }
        Commands::Balance {
            owner,
            creator,
            collection,
            name,
            zero_if_missing,
        } => {
            let id = TokenId::new(*creator, collection.as_str(), name.as_str());
            let token = match client.get_token_balance_for_account(*owner, &id).await {
                Ok(token) => token,
                Err(e) if *zero_if_missing && e.is_key_not_found() => Token::zero(id),
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to read balance of {owner}"))
                }
            };
            print_json(&token)
        }
        Commands::Resources { account } => {
            let resources = client
                .account_token_resources(*account)
                .await
                .with_context(|| format!("failed to list resources of {account}"))?;
            let listed: Vec<_> = resources
                .iter()
                .map(|r| match r {
                    TokenResource::Collections(c) => json!({
                        "type": config::COLLECTIONS_RESOURCE,
                        "collections": c.collections.as_str(),
                        "token_data": c.token_data.as_str(),
                    }),
                    TokenResource::TokenStore(s) => json!({
                        "type": config::TOKEN_STORE_RESOURCE,
                        "tokens": s.tokens.as_str(),
                    }),
                })
                .collect();
            print_json(&listed)
        }
        Commands::Address | Commands::GenerateKey => Ok(()),
    }
}

fn print_hash(hash: &str) -> Result<()> {
    print_json(&json!({ "hash": hash }))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
