// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledgerline SDK
//!
//! Client-side engine for talking to a ledger served by many independent
//! nodes. Callers describe an operation, the SDK freezes it into one
//! envelope per candidate node, collects signatures over every envelope,
//! and submits it node by node until one accepts. Receipts and read-only
//! queries travel through the same dispatcher.
//!
//! ## Architecture
//!
//! - **ids / amount**: Entity ids, transaction ids, and tinybar amounts.
//! - **crypto**: Ed25519 keys and the injected signer capability.
//! - **network**: Node table, the transport seam, and a scripted transport.
//! - **client**: Operator identity, network table, and retry settings.
//! - **transaction**: Draft → Frozen → Signed → Executed lifecycle.
//! - **execute**: Node iteration, retry/backoff, response classification.
//! - **query**: Cost probing, query payments, and receipt polling.
//! - **status**: The network's response-code catalogue and the single
//!   table that decides what is retryable.
//! - **wire**: Request/response frames exchanged with nodes.
//! - **config**: Protocol constants and the JSON client config.
//!
//! ## Lifecycle in one breath
//!
//! ```rust,no_run
//! # async fn demo(client: &ledgerline_sdk::Client) -> Result<(), ledgerline_sdk::Error> {
//! use ledgerline_sdk::transaction::{CryptoTransfer, Transaction, TransactionData};
//! use ledgerline_sdk::{AccountId, Amount};
//!
//! let transfer = CryptoTransfer::new()
//!     .hbar_transfer(AccountId::new(0, 0, 1001), Amount::new(-1))
//!     .hbar_transfer(AccountId::new(0, 0, 1002), Amount::new(1));
//!
//! let mut tx = Transaction::new(TransactionData::CryptoTransfer(transfer));
//! tx.set_transaction_memo("rent")?;
//!
//! let response = tx.execute(client).await?;
//! let receipt = response.get_receipt(client).await?;
//! println!("{}", receipt.status);
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod execute;
pub mod ids;
pub mod network;
pub mod query;
pub mod status;
pub mod transaction;
pub mod wire;

pub use amount::Amount;
pub use client::{Client, Operator};
pub use config::ClientConfig;
pub use crypto::{PrivateKey, PublicKey};
pub use error::{Error, ErrorKind};
pub use execute::RetryPolicy;
pub use ids::{AccountId, FileId, Timestamp, TokenId, TransactionId};
pub use network::{MockTransport, Network, NodeTarget, Transport, TransportError};
pub use query::{Query, QueryData, QueryResponse, TransactionReceipt, TransactionReceiptQuery};
pub use status::{ResponseClass, Status};
pub use transaction::{Transaction, TransactionResponse, TransactionState};
pub use wire::Method;
