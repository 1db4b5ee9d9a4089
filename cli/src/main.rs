// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledgerline CLI
//!
//! Entry point for the `ledgerline` binary. Parses arguments, initializes
//! logging, and runs one offline command:
//!
//! - `keygen`: generate an Ed25519 key pair
//! - `network`: print the node table from a config file
//! - `freeze`: build, freeze and operator-sign an opaque transaction
//! - `sign`: add a signature to a serialized transaction
//!
//! `freeze` and `sign` exchange transactions as hex, so a transaction can
//! travel between signers by copy and paste before anyone submits it.

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use ledgerline_sdk::transaction::TransactionData;
use ledgerline_sdk::{Client, ClientConfig, Method, MockTransport, PrivateKey, Transaction};

use cli::{Commands, LedgerlineCli};

fn main() -> Result<()> {
    let cli = LedgerlineCli::parse();
    logging::init(cli.log_format, cli.verbose)?;

    let output = match cli.command {
        Commands::Keygen => keygen()?,
        Commands::Network(args) => {
            let config = ClientConfig::from_file(&args.config)
                .with_context(|| format!("failed to load config {}", args.config.display()))?;
            network_table(&config)?
        }
        Commands::Freeze(args) => {
            let config = ClientConfig::from_file(&args.config)
                .with_context(|| format!("failed to load config {}", args.config.display()))?;
            freeze(&config, &args.method, &args.payload, args.memo.as_deref())?
        }
        Commands::Sign(args) => sign(&args.key, &args.transaction)?,
    };

    println!("{output}");
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyPairOutput {
    private_key: String,
    public_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeOutput {
    node_account_id: String,
    address: String,
}

fn keygen() -> Result<String> {
    let key = PrivateKey::generate();
    let output = KeyPairOutput {
        private_key: key.to_hex(),
        public_key: key.public_key().to_hex(),
    };
    tracing::info!(public_key = %output.public_key, "generated key pair");
    Ok(serde_json::to_string_pretty(&output)?)
}

fn network_table(config: &ClientConfig) -> Result<String> {
    let network = config.network_table().context("invalid network table")?;
    let nodes: Vec<NodeOutput> = network
        .iter()
        .map(|(node, address)| NodeOutput {
            node_account_id: node.to_string(),
            address: address.to_string(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&nodes)?)
}

/// Freezes against the configured network and signs with the operator.
/// Returns the serialized transaction as hex.
fn freeze(config: &ClientConfig, method: &str, payload: &str, memo: Option<&str>) -> Result<String> {
    if config.operator.is_none() {
        bail!("config has no operator; freeze needs a payer");
    }
    let payload = hex::decode(payload.trim()).context("payload is not valid hex")?;
    let client = Client::from_config(config, Arc::new(MockTransport::offline()))
        .context("invalid client config")?;

    let mut tx = Transaction::new(TransactionData::Opaque {
        method: Method::from_name(method),
        payload,
    });
    if let Some(memo) = memo {
        tx.set_transaction_memo(memo)?;
    }
    tx.sign_with_operator(&client)?;

    tracing::info!(
        transaction_id = %tx.transaction_id().map(|id| id.to_string()).unwrap_or_default(),
        nodes = tx.node_account_ids().len(),
        method = %tx.data().method(),
        "transaction frozen and signed"
    );
    Ok(hex::encode(tx.to_bytes()?))
}

/// Adds `key`'s signature to every envelope of a serialized transaction.
fn sign(key: &str, transaction: &str) -> Result<String> {
    let key = PrivateKey::from_hex(key.trim()).context("invalid signing key")?;
    let bytes = hex::decode(transaction.trim()).context("transaction is not valid hex")?;
    let mut tx = Transaction::from_bytes(&bytes).context("failed to decode transaction")?;

    let public_key = key.public_key();
    if tx.is_signed_by(&public_key) {
        tracing::warn!(public_key = %public_key, "key already signed this transaction");
    }
    tx.sign(&key)?;

    tracing::info!(
        public_key = %public_key,
        envelopes = tx.envelopes().len(),
        "signature added"
    );
    Ok(hex::encode(tx.to_bytes()?))
}
