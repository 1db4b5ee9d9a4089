//! Receipt polling.
//!
//! A receipt is free to ask for. Until consensus is reached the node
//! answers with a pending status, which the dispatcher retries on the same
//! node after a backoff.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Error;
use crate::ids::{AccountId, FileId, TokenId, TransactionId};
use crate::query::{Query, QueryData, QueryResponse};
use crate::status::Status;
use crate::wire::WireError;

/// The consensus outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: Status,
    /// Entity created by the transaction, if it created one.
    pub account_id: Option<AccountId>,
    pub file_id: Option<FileId>,
    pub token_id: Option<TokenId>,
}

impl TransactionReceipt {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            account_id: None,
            file_id: None,
            token_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionReceiptQuery {
    transaction_id: TransactionId,
    node_account_ids: Vec<AccountId>,
    validate_status: bool,
}

impl TransactionReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            node_account_ids: Vec::new(),
            validate_status: false,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    pub fn set_node_account_ids(
        &mut self,
        node_account_ids: impl IntoIterator<Item = AccountId>,
    ) -> &mut Self {
        self.node_account_ids = node_account_ids.into_iter().collect();
        self
    }

    /// When set, a receipt whose status is not `SUCCESS` becomes
    /// [`Error::ReceiptStatus`].
    pub fn set_validate_status(&mut self, validate: bool) -> &mut Self {
        self.validate_status = validate;
        self
    }

    pub async fn execute(&self, client: &Client) -> Result<TransactionReceipt, Error> {
        let mut query = Query::new(QueryData::TransactionReceipt {
            transaction_id: self.transaction_id,
        });
        query.set_node_account_ids(self.node_account_ids.iter().copied());

        let receipt = match query.execute(client).await? {
            QueryResponse::Receipt(receipt) => receipt,
            _ => return Err(WireError::UnexpectedAnswer { expected: "receipt" }.into()),
        };

        if self.validate_status && !receipt.status.is_success() {
            return Err(Error::ReceiptStatus {
                status: receipt.status,
                transaction_id: self.transaction_id,
            });
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{MockTransport, Network};
    use crate::wire::{self, QueryAnswer, QueryRequest, QueryResponseFrame};

    fn client(answer: Status) -> Client {
        let network: Network = [(AccountId::from(3), "n3:50211")].into_iter().collect();
        let transport = MockTransport::shared(move |call| {
            let request: QueryRequest = wire::decode(&call.request)?;
            assert!(request.header.payment.is_none());
            let receipt = TransactionReceipt::new(answer);
            Ok(QueryResponseFrame::new(Status::OK, QueryAnswer::Receipt(receipt)).to_bytes()?)
        });
        Client::new(network, transport)
    }

    #[tokio::test(start_paused = true)]
    async fn returns_failed_receipt_without_validation() {
        let client = client(Status::INSUFFICIENT_PAYER_BALANCE);
        let id = TransactionId::generate(AccountId::from(2));
        let receipt = TransactionReceiptQuery::new(id).execute(&client).await.unwrap();
        assert_eq!(receipt.status, Status::INSUFFICIENT_PAYER_BALANCE);
    }

    #[tokio::test(start_paused = true)]
    async fn validation_turns_failure_into_error() {
        let client = client(Status::INSUFFICIENT_PAYER_BALANCE);
        let id = TransactionId::generate(AccountId::from(2));
        let err = TransactionReceiptQuery::new(id)
            .set_validate_status(true)
            .execute(&client)
            .await
            .unwrap_err();
        match err {
            Error::ReceiptStatus { status, transaction_id } => {
                assert_eq!(status, Status::INSUFFICIENT_PAYER_BALANCE);
                assert_eq!(transaction_id, id);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
