//! Offline hand-off of frozen transactions.
//!
//! `to_bytes` writes every envelope with its signatures; `from_bytes`
//! restores a transaction another party can co-sign and execute. Restored
//! bodies are used verbatim, never re-encoded, so signatures made before
//! the hand-off stay valid.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;

use crate::amount::Amount;
use crate::error::Error;
use crate::transaction::{Envelope, Transaction, TransactionData, TransactionState};
use crate::wire::{self, TransactionBody, TransactionList, WireError};

impl Transaction {
    /// Serializes all envelopes. Drafts have nothing to serialize yet.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        if self.state == TransactionState::Draft {
            return Err(Error::NotFrozen);
        }
        let list = TransactionList {
            envelopes: self.envelopes.iter().map(Envelope::to_signed).collect(),
        };
        Ok(wire::encode(&list)?.to_vec())
    }

    /// Restores a transaction written by [`to_bytes`](Self::to_bytes).
    ///
    /// Bodies must agree on everything but the node id, node ids must be
    /// distinct, and every signature must verify against its envelope.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let list: TransactionList = wire::decode(bytes)?;
        let first = list.envelopes.first().ok_or(WireError::Empty)?;
        let reference: TransactionBody = wire::decode(&first.body_bytes)?;

        let mut node_account_ids = Vec::with_capacity(list.envelopes.len());
        let mut envelopes = Vec::with_capacity(list.envelopes.len());
        let mut any_signature = false;

        for signed in list.envelopes {
            let body: TransactionBody = wire::decode(&signed.body_bytes)?;
            if !same_content(&reference, &body) {
                return Err(WireError::InconsistentBodies(format!(
                    "envelope for node {} differs from node {}",
                    body.node_account_id, reference.node_account_id
                ))
                .into());
            }
            if node_account_ids.contains(&body.node_account_id) {
                return Err(WireError::InconsistentBodies(format!(
                    "node {} appears twice",
                    body.node_account_id
                ))
                .into());
            }

            let mut signatures = BTreeMap::new();
            for pair in signed.sig_map {
                if !pair.public_key.verify(&signed.body_bytes, &pair.signature) {
                    return Err(WireError::InvalidSignature {
                        node: body.node_account_id,
                        public_key: pair.public_key,
                    }
                    .into());
                }
                signatures.insert(pair.public_key, Bytes::from(pair.signature));
            }
            any_signature |= !signatures.is_empty();

            node_account_ids.push(body.node_account_id);
            envelopes.push(Envelope {
                node_account_id: body.node_account_id,
                body_bytes: Bytes::from(signed.body_bytes),
                signatures,
            });
        }

        Ok(Self {
            state: if any_signature {
                TransactionState::Signed
            } else {
                TransactionState::Frozen
            },
            data: TransactionData::from_wire(reference.method, reference.data),
            transaction_id: Some(reference.transaction_id),
            node_account_ids,
            max_transaction_fee: Some(Amount::from_tinybars(reference.transaction_fee)),
            memo: reference.memo,
            valid_duration: Duration::from_secs(reference.valid_duration_secs),
            envelopes,
        })
    }
}

fn same_content(a: &TransactionBody, b: &TransactionBody) -> bool {
    a.transaction_id == b.transaction_id
        && a.transaction_fee == b.transaction_fee
        && a.valid_duration_secs == b.valid_duration_secs
        && a.memo == b.memo
        && a.method == b.method
        && a.data == b.data
}
