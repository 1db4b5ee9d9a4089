//! What a node hands back when it accepts a transaction.

use crate::client::Client;
use crate::error::Error;
use crate::ids::{AccountId, TransactionId};
use crate::query::{TransactionReceipt, TransactionReceiptQuery};

/// Acceptance is not consensus: the receipt says whether the transaction
/// actually succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    /// The node that accepted the submission.
    pub node_id: AccountId,
    pub transaction_id: TransactionId,
    /// SHA-384 of the signed envelope the node received.
    pub transaction_hash: Vec<u8>,
    /// Nodes to poll for the receipt, starting with `node_id`.
    pub(crate) receipt_node_ids: Vec<AccountId>,
}

impl TransactionResponse {
    /// Polls for the receipt and fails with [`Error::ReceiptStatus`] if the
    /// transaction reached consensus with anything but `SUCCESS`.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, Error> {
        let mut query = self.get_receipt_query();
        query.set_validate_status(true);
        query.execute(client).await
    }

    /// The receipt query without status validation, for callers who want
    /// to inspect a failed receipt themselves.
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        let mut query = TransactionReceiptQuery::new(self.transaction_id);
        query.set_node_account_ids(self.receipt_node_ids.iter().copied());
        query
    }

    pub fn transaction_hash_hex(&self) -> String {
        hex::encode(&self.transaction_hash)
    }
}
