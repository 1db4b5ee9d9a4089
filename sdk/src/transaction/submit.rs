//! Submission through the dispatcher.

use bytes::Bytes;

use crate::client::Client;
use crate::crypto::sha384;
use crate::error::Error;
use crate::execute::{self, Execute};
use crate::ids::{AccountId, TransactionId};
use crate::status::Status;
use crate::transaction::{Transaction, TransactionResponse, TransactionState};
use crate::wire::{self, Method, TransactionResponseFrame};

impl Transaction {
    /// Freezes with `client` if still a draft, signs with the operator when
    /// the operator is the payer and has not signed yet, then submits node
    /// by node.
    ///
    /// The transaction is `Executed` from the moment the first send is
    /// attempted, whatever the outcome. Retrying after a failure means
    /// building a new transaction with a new id. If none of its nodes are
    /// in the client's network nothing is sent and the transaction stays
    /// usable.
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse, Error> {
        if self.state == TransactionState::Executed {
            return Err(Error::TransactionExecuted);
        }
        if self.state == TransactionState::Draft {
            self.freeze_with(Some(client))?;
        }

        let transaction_id = self.transaction_id.ok_or(Error::NoPayer)?;
        if let Some(operator) = client.operator() {
            if operator.account_id == transaction_id.account_id
                && !self.is_signed_by(&operator.public_key)
            {
                let signer = operator.signer.clone();
                self.sign_with(operator.public_key, move |message| signer(message))?;
            }
        }

        let signed = self
            .envelopes
            .iter()
            .map(|envelope| envelope.signed_bytes())
            .collect::<Result<Vec<_>, _>>()?;

        let network = client.network();
        if let Some(&first) = self.node_account_ids.first() {
            if !self
                .node_account_ids
                .iter()
                .any(|node| network.address_of(node).is_some())
            {
                return Err(Error::UnknownNode { node: first });
            }
        }

        let request = SubmitTransaction {
            transaction_id,
            method: self.data.method(),
            node_account_ids: self.node_account_ids.clone(),
            signed,
        };
        self.state = TransactionState::Executed;

        execute::execute(client, &request).await
    }
}

/// Snapshot of a signed transaction handed to the dispatcher. Built before
/// the first send so signing never interleaves with network I/O.
struct SubmitTransaction {
    transaction_id: TransactionId,
    method: Method,
    node_account_ids: Vec<AccountId>,
    signed: Vec<Bytes>,
}

impl Execute for SubmitTransaction {
    type Response = TransactionResponseFrame;
    type Output = TransactionResponse;

    fn operation(&self) -> &'static str {
        "submit_transaction"
    }

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn make_request(&self, index: usize) -> Result<Bytes, Error> {
        Ok(self.signed[index].clone())
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error> {
        Ok(wire::decode(bytes)?)
    }

    fn response_status(&self, response: &Self::Response) -> Status {
        response.precheck
    }

    fn map_response(
        &self,
        _response: Self::Response,
        node: AccountId,
        index: usize,
    ) -> Result<Self::Output, Error> {
        let mut receipt_nodes = self.node_account_ids.clone();
        receipt_nodes.rotate_left(index);

        Ok(TransactionResponse {
            node_id: node,
            transaction_id: self.transaction_id,
            transaction_hash: sha384(&self.signed[index]),
            receipt_node_ids: receipt_nodes,
        })
    }
}
