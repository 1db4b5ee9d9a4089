//! # Transaction Module
//!
//! Construction, freezing, signing, and submission of ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! data.rs            TransactionData: the operation payload (transfer, token update, opaque)
//! transfer.rs        CryptoTransfer builder
//! token_update.rs    TokenUpdate builder
//! builder.rs         Common-field setters and freeze
//! signing.rs         Per-envelope signature aggregation
//! submit.rs          Execute through the dispatcher
//! response.rs        TransactionResponse and receipt polling
//! serialize.rs       Offline to_bytes/from_bytes of frozen transactions
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Draft**: Setters mutate freely.
//! 2. **Frozen**: [`Transaction::freeze`] assigns the transaction id,
//!    picks the nodes, and encodes one body per node. Bodies never change
//!    again; every setter now fails with [`Error::TransactionFrozen`].
//! 3. **Signed**: Each signer signs every envelope's bytes separately.
//!    Signing twice with the same key is a no-op.
//! 4. **Executed**: [`Transaction::execute`] submits it. No further
//!    signing or mutation; a fresh attempt needs a new transaction id.
//!
//! The state is a runtime field rather than a type parameter so that
//! misuse surfaces as a typed [`Error`] and a transaction restored with
//! [`Transaction::from_bytes`] can land in whichever state its bytes imply.
//!
//! [`Error`]: crate::Error
//! [`Error::TransactionFrozen`]: crate::Error::TransactionFrozen

mod builder;
mod data;
mod response;
mod serialize;
mod signing;
mod submit;
mod token_update;
mod transfer;

pub use data::TransactionData;
pub use response::TransactionResponse;
pub use token_update::TokenUpdate;
pub use transfer::{AccountAmount, CryptoTransfer};

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;

use crate::amount::Amount;
use crate::config;
use crate::crypto::PublicKey;
use crate::ids::{AccountId, TransactionId};
use crate::wire::{self, SignaturePair, SignedTransaction, WireError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Draft,
    Frozen,
    Signed,
    Executed,
}

/// One node-targeted copy of a frozen transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    node_account_id: AccountId,
    body_bytes: Bytes,
    signatures: BTreeMap<PublicKey, Bytes>,
}

impl Envelope {
    pub fn node_account_id(&self) -> AccountId {
        self.node_account_id
    }

    /// The exact bytes every signature covers.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn signatures(&self) -> &BTreeMap<PublicKey, Bytes> {
        &self.signatures
    }

    pub(crate) fn to_signed(&self) -> SignedTransaction {
        SignedTransaction {
            body_bytes: self.body_bytes.to_vec(),
            sig_map: self
                .signatures
                .iter()
                .map(|(public_key, signature)| SignaturePair {
                    public_key: *public_key,
                    signature: signature.to_vec(),
                })
                .collect(),
        }
    }

    /// The encoded [`SignedTransaction`] sent to this envelope's node.
    pub(crate) fn signed_bytes(&self) -> Result<Bytes, WireError> {
        wire::encode(&self.to_signed())
    }
}

/// A ledger transaction in any lifecycle state.
#[derive(Debug, Clone)]
pub struct Transaction {
    state: TransactionState,
    data: TransactionData,
    transaction_id: Option<TransactionId>,
    node_account_ids: Vec<AccountId>,
    max_transaction_fee: Option<Amount>,
    memo: String,
    valid_duration: Duration,
    envelopes: Vec<Envelope>,
}

impl Transaction {
    pub fn new(data: impl Into<TransactionData>) -> Self {
        Self {
            state: TransactionState::Draft,
            data: data.into(),
            transaction_id: None,
            node_account_ids: Vec::new(),
            max_transaction_fee: None,
            memo: String::new(),
            valid_duration: config::DEFAULT_TRANSACTION_VALID_DURATION,
            envelopes: Vec::new(),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state != TransactionState::Draft
    }

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    /// Explicit fee before freeze; the resolved fee after.
    pub fn max_transaction_fee(&self) -> Option<Amount> {
        self.max_transaction_fee
    }

    pub fn transaction_memo(&self) -> &str {
        &self.memo
    }

    pub fn transaction_valid_duration(&self) -> Duration {
        self.valid_duration
    }

    /// Per-node envelopes, in submission order. Empty while in draft.
    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    /// Signatures grouped by node.
    pub fn signatures(&self) -> BTreeMap<AccountId, BTreeMap<PublicKey, Bytes>> {
        self.envelopes
            .iter()
            .map(|env| (env.node_account_id, env.signatures.clone()))
            .collect()
    }
}

impl From<CryptoTransfer> for Transaction {
    fn from(value: CryptoTransfer) -> Self {
        Self::new(value)
    }
}

impl From<TokenUpdate> for Transaction {
    fn from(value: TokenUpdate) -> Self {
        Self::new(value)
    }
}
