//! Common-field setters and freeze.
//!
//! Setters take `&mut self` and return `Result<&mut Self, Error>` so they
//! chain with `?`. Once a transaction leaves draft, every setter fails and
//! leaves the transaction untouched.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::amount::Amount;
use crate::client::Client;
use crate::config;
use crate::error::Error;
use crate::ids::{AccountId, TransactionId};
use crate::transaction::{Envelope, Transaction, TransactionData, TransactionState};
use crate::wire::{self, TransactionBody};

impl Transaction {
    fn require_draft(&self) -> Result<(), Error> {
        match self.state {
            TransactionState::Draft => Ok(()),
            TransactionState::Executed => Err(Error::TransactionExecuted),
            TransactionState::Frozen | TransactionState::Signed => Err(Error::TransactionFrozen),
        }
    }

    pub fn set_transaction_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, Error> {
        self.require_draft()?;
        self.memo = memo.into();
        Ok(self)
    }

    pub fn set_max_transaction_fee(&mut self, fee: Amount) -> Result<&mut Self, Error> {
        self.require_draft()?;
        self.max_transaction_fee = Some(fee);
        Ok(self)
    }

    pub fn set_transaction_valid_duration(&mut self, duration: Duration) -> Result<&mut Self, Error> {
        self.require_draft()?;
        self.valid_duration = duration;
        Ok(self)
    }

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self, Error> {
        self.require_draft()?;
        self.transaction_id = Some(transaction_id);
        Ok(self)
    }

    /// Explicit target nodes, in submission order. Duplicates are dropped.
    pub fn set_node_account_ids(
        &mut self,
        node_account_ids: impl IntoIterator<Item = AccountId>,
    ) -> Result<&mut Self, Error> {
        self.require_draft()?;
        let mut nodes: Vec<AccountId> = Vec::new();
        for node in node_account_ids {
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        self.node_account_ids = nodes;
        Ok(self)
    }

    pub fn set_data(&mut self, data: impl Into<TransactionData>) -> Result<&mut Self, Error> {
        self.require_draft()?;
        self.data = data.into();
        Ok(self)
    }

    /// Freezes without a client. Needs an explicit transaction id and node
    /// list.
    pub fn freeze(&mut self) -> Result<&mut Self, Error> {
        self.freeze_with(None)
    }

    /// Freezes, filling the payer, nodes, and fee from `client` where the
    /// transaction leaves them unset.
    ///
    /// All-or-nothing: on error the transaction is still a draft with the
    /// fields it had.
    pub fn freeze_with(&mut self, client: Option<&Client>) -> Result<&mut Self, Error> {
        if self.state != TransactionState::Draft {
            return Err(Error::AlreadyFrozen);
        }
        if self.memo.len() > config::MAX_MEMO_LENGTH {
            return Err(Error::MemoTooLong {
                len: self.memo.len(),
                max: config::MAX_MEMO_LENGTH,
            });
        }

        let transaction_id = match (self.transaction_id, client.and_then(Client::operator)) {
            (Some(id), _) => id,
            (None, Some(operator)) => TransactionId::generate(operator.account_id),
            (None, None) => return Err(Error::NoPayer),
        };

        let node_account_ids = if !self.node_account_ids.is_empty() {
            self.node_account_ids.clone()
        } else {
            client
                .map(|client| client.select_nodes(transaction_id.selection_seed()))
                .unwrap_or_default()
        };
        if node_account_ids.is_empty() {
            return Err(Error::NoNetwork);
        }

        let fee = self
            .max_transaction_fee
            .or_else(|| client.and_then(Client::max_transaction_fee))
            .unwrap_or(config::DEFAULT_MAX_TRANSACTION_FEE);

        let method = self.data.method();
        let payload = self.data.payload()?;

        let envelopes = node_account_ids
            .iter()
            .map(|node| -> Result<Envelope, Error> {
                let body = TransactionBody {
                    transaction_id,
                    node_account_id: *node,
                    transaction_fee: fee.to_tinybars(),
                    valid_duration_secs: self.valid_duration.as_secs(),
                    memo: self.memo.clone(),
                    method: method.clone(),
                    data: payload.clone(),
                };
                Ok(Envelope {
                    node_account_id: *node,
                    body_bytes: wire::encode(&body)?,
                    signatures: BTreeMap::new(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        self.transaction_id = Some(transaction_id);
        self.node_account_ids = node_account_ids;
        self.max_transaction_fee = Some(fee);
        self.envelopes = envelopes;
        self.state = TransactionState::Frozen;
        Ok(self)
    }
}
