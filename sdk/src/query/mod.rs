//! # Queries
//!
//! Read-only requests answered by a single node. Some are free (receipts,
//! balances); the rest must carry a payment: a small transfer from the
//! operator to the answering node, signed like any other transaction.
//!
//! ## Paying for a query
//!
//! 1. If the caller fixed the payment with [`Query::set_query_payment`],
//!    use it as is.
//! 2. Otherwise ask a node for the price (a cost probe carrying a
//!    zero-value payment) and compare it with the ceiling: the query's own
//!    [`Query::set_max_query_payment`], else the client default. Above the
//!    ceiling the query fails locally with
//!    [`Error::MaxQueryPaymentExceeded`] before any paid call.
//! 3. Freeze and sign one payment per candidate node, all sharing one
//!    transaction id, and dispatch like a transaction.

mod receipt;

pub use receipt::{TransactionReceipt, TransactionReceiptQuery};

use bytes::Bytes;

use crate::amount::Amount;
use crate::client::Client;
use crate::error::Error;
use crate::execute::{self, Execute};
use crate::ids::{AccountId, FileId, TransactionId};
use crate::status::{ResponseClass, Status};
use crate::transaction::{CryptoTransfer, Transaction};
use crate::wire::{
    self, Method, QueryAnswer, QueryBody, QueryHeader, QueryRequest, QueryResponseFrame,
    ResponseType, WireError,
};

/// What to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryData {
    TransactionReceipt { transaction_id: TransactionId },
    AccountBalance { account_id: AccountId },
    FileContents { file_id: FileId },
    /// Any other query. `paid` decides whether a payment is attached.
    Opaque {
        method: Method,
        payload: Vec<u8>,
        paid: bool,
    },
}

impl QueryData {
    pub fn method(&self) -> Method {
        match self {
            Self::TransactionReceipt { .. } => Method::GetTransactionReceipts,
            Self::AccountBalance { .. } => Method::CryptoGetBalance,
            Self::FileContents { .. } => Method::GetFileContent,
            Self::Opaque { method, .. } => method.clone(),
        }
    }

    pub fn is_paid(&self) -> bool {
        match self {
            Self::TransactionReceipt { .. } | Self::AccountBalance { .. } => false,
            Self::FileContents { .. } => true,
            Self::Opaque { paid, .. } => *paid,
        }
    }

    fn body(&self) -> QueryBody {
        match self {
            Self::TransactionReceipt { transaction_id } => QueryBody::TransactionReceipt {
                transaction_id: *transaction_id,
            },
            Self::AccountBalance { account_id } => QueryBody::AccountBalance {
                account_id: *account_id,
            },
            Self::FileContents { file_id } => QueryBody::FileContents { file_id: *file_id },
            Self::Opaque { payload, .. } => QueryBody::Opaque(payload.clone()),
        }
    }

    fn target_transaction_id(&self) -> Option<TransactionId> {
        match self {
            Self::TransactionReceipt { transaction_id } => Some(*transaction_id),
            _ => None,
        }
    }
}

/// A mapped query answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    Receipt(TransactionReceipt),
    Balance(Amount),
    Contents(Bytes),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Query {
    data: QueryData,
    node_account_ids: Vec<AccountId>,
    payment_amount: Option<Amount>,
    max_query_payment: Option<Amount>,
}

impl Query {
    pub fn new(data: QueryData) -> Self {
        Self {
            data,
            node_account_ids: Vec::new(),
            payment_amount: None,
            max_query_payment: None,
        }
    }

    pub fn data(&self) -> &QueryData {
        &self.data
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

    /// Pays exactly `amount`, skipping the cost probe.
    pub fn set_query_payment(&mut self, amount: Amount) -> &mut Self {
        self.payment_amount = Some(amount);
        self
    }

    pub fn set_max_query_payment(&mut self, max: Amount) -> &mut Self {
        self.max_query_payment = Some(max);
        self
    }

    pub fn query_payment(&self) -> Option<Amount> {
        self.payment_amount
    }

    pub fn max_query_payment(&self) -> Option<Amount> {
        self.max_query_payment
    }

    /// What the network would charge. Free queries cost zero without a
    /// round trip.
    pub async fn get_cost(&self, client: &Client) -> Result<Amount, Error> {
        if !self.data.is_paid() {
            return Ok(Amount::ZERO);
        }
        let nodes = self.resolve_nodes(client)?;
        self.probe_cost(client, nodes).await
    }

    pub async fn execute(&self, client: &Client) -> Result<QueryResponse, Error> {
        let nodes = self.resolve_nodes(client)?;

        let payments = if self.data.is_paid() {
            let amount = match self.payment_amount {
                Some(amount) => amount,
                None => {
                    let cost = self.probe_cost(client, nodes.clone()).await?;
                    let max = self
                        .max_query_payment
                        .unwrap_or_else(|| client.default_max_query_payment());
                    if cost > max {
                        return Err(Error::MaxQueryPaymentExceeded { cost, max });
                    }
                    cost
                }
            };
            Some(build_payments(client, &nodes, amount)?)
        } else {
            None
        };

        let request = QueryExecution {
            data: &self.data,
            node_account_ids: nodes,
            payments,
            response_type: ResponseType::AnswerOnly,
        };
        execute::execute(client, &request).await
    }

    async fn probe_cost(&self, client: &Client, nodes: Vec<AccountId>) -> Result<Amount, Error> {
        let payments = build_payments(client, &nodes, Amount::ZERO)?;
        let probe = QueryExecution {
            data: &self.data,
            node_account_ids: nodes,
            payments: Some(payments),
            response_type: ResponseType::CostAnswer,
        };
        let cost = execute::execute(client, &probe).await?;
        match cost {
            QueryResponse::Balance(cost) => Ok(cost),
            _ => Err(WireError::UnexpectedAnswer { expected: "cost" }.into()),
        }
    }

    fn resolve_nodes(&self, client: &Client) -> Result<Vec<AccountId>, Error> {
        let nodes = if self.node_account_ids.is_empty() {
            client.select_nodes(rand::random())
        } else {
            self.node_account_ids.clone()
        };
        if nodes.is_empty() {
            return Err(Error::NoNetwork);
        }
        Ok(nodes)
    }
}

/// One frozen, operator-signed transfer per node, paying that node.
fn build_payments(
    client: &Client,
    nodes: &[AccountId],
    amount: Amount,
) -> Result<Vec<Bytes>, Error> {
    let operator = client.operator().ok_or(Error::NoOperator)?;
    let transaction_id = TransactionId::generate(operator.account_id);

    nodes
        .iter()
        .map(|node| -> Result<Bytes, Error> {
            let transfer = CryptoTransfer::new()
                .hbar_transfer(operator.account_id, -amount)
                .hbar_transfer(*node, amount);
            let mut payment = Transaction::new(transfer);
            payment
                .set_transaction_id(transaction_id)?
                .set_node_account_ids([*node])?
                .freeze_with(Some(client))?
                .sign_with_operator(client)?;
            let envelope = payment.envelopes().first().ok_or(Error::NoNetwork)?;
            Ok(envelope.signed_bytes()?)
        })
        .collect()
}

/// A query bound to its nodes and payments for one dispatch.
struct QueryExecution<'a> {
    data: &'a QueryData,
    node_account_ids: Vec<AccountId>,
    payments: Option<Vec<Bytes>>,
    response_type: ResponseType,
}

impl Execute for QueryExecution<'_> {
    type Response = QueryResponseFrame;
    type Output = QueryResponse;

    fn operation(&self) -> &'static str {
        match self.response_type {
            ResponseType::CostAnswer => "query_cost",
            ResponseType::AnswerOnly => "query",
        }
    }

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    fn method(&self) -> Method {
        self.data.method()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.data.target_transaction_id()
    }

    fn make_request(&self, index: usize) -> Result<Bytes, Error> {
        let payment = match &self.payments {
            Some(payments) => Some(payments.get(index).ok_or(Error::NoNetwork)?.to_vec()),
            None => None,
        };
        let request = QueryRequest {
            header: QueryHeader {
                payment,
                response_type: self.response_type,
            },
            query: self.data.body(),
        };
        Ok(wire::encode(&request)?)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error> {
        Ok(wire::decode(bytes)?)
    }

    /// The precheck, unless a receipt says consensus is still pending.
    fn response_status(&self, response: &Self::Response) -> Status {
        match &response.answer {
            QueryAnswer::Receipt(receipt)
                if response.header.precheck == Status::OK
                    && receipt.status.classify() == ResponseClass::Pending =>
            {
                receipt.status
            }
            _ => response.header.precheck,
        }
    }

    /// Receipt polls stay on the node that accepted the transaction.
    fn polls_same_node(&self) -> bool {
        matches!(self.data, QueryData::TransactionReceipt { .. })
    }

    fn map_response(
        &self,
        response: Self::Response,
        _node: AccountId,
        _index: usize,
    ) -> Result<Self::Output, Error> {
        if self.response_type == ResponseType::CostAnswer {
            return Ok(QueryResponse::Balance(Amount::from_tinybars(
                response.header.cost,
            )));
        }
        let mapped = match (self.data, response.answer) {
            (QueryData::TransactionReceipt { .. }, QueryAnswer::Receipt(receipt)) => {
                QueryResponse::Receipt(receipt)
            }
            (QueryData::AccountBalance { .. }, QueryAnswer::Balance { tinybars }) => {
                QueryResponse::Balance(Amount::from_tinybars(tinybars))
            }
            (QueryData::FileContents { .. }, QueryAnswer::Contents(contents))
            | (QueryData::Opaque { .. }, QueryAnswer::Contents(contents)) => {
                QueryResponse::Contents(Bytes::from(contents))
            }
            (QueryData::Opaque { .. }, QueryAnswer::Empty) => QueryResponse::Empty,
            (QueryData::TransactionReceipt { .. }, _) => {
                return Err(WireError::UnexpectedAnswer { expected: "receipt" }.into())
            }
            (QueryData::AccountBalance { .. }, _) => {
                return Err(WireError::UnexpectedAnswer { expected: "balance" }.into())
            }
            (QueryData::FileContents { .. } | QueryData::Opaque { .. }, _) => {
                return Err(WireError::UnexpectedAnswer { expected: "contents" }.into())
            }
        };
        Ok(mapped)
    }
}
