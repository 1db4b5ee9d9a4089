//! Integration tests for paid and free queries: cost probing, the payment
//! ceiling, and per-node payment transfers.

use std::sync::Arc;

use bytes::Bytes;

use ledgerline_sdk::amount::TINYBARS_PER_UNIT;
use ledgerline_sdk::network::RecordedCall;
use ledgerline_sdk::wire::{
    self, QueryAnswer, QueryBody, QueryRequest, QueryResponseFrame, ResponseType,
    SignedTransaction, TransactionBody,
};
use ledgerline_sdk::{
    AccountId, Amount, Client, Error, FileId, Method, MockTransport, Network, PrivateKey, Query,
    QueryData, QueryResponse, Status, TransportError,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const OPERATOR: u64 = 2;
const FILE_COST: i64 = TINYBARS_PER_UNIT;

fn network() -> Network {
    (3..=4u64)
        .map(|n| (AccountId::from(n), format!("node{n}.test:50211")))
        .collect()
}

/// A file server that charges one whole unit per read.
fn file_server(call: &RecordedCall) -> Result<Bytes, TransportError> {
    let request: QueryRequest = wire::decode(&call.request)?;
    let frame = match (request.header.response_type, request.query) {
        (ResponseType::CostAnswer, _) => QueryResponseFrame::cost(FILE_COST),
        (ResponseType::AnswerOnly, QueryBody::FileContents { .. }) => {
            QueryResponseFrame::new(Status::OK, QueryAnswer::Contents(b"hello".to_vec()))
        }
        (ResponseType::AnswerOnly, QueryBody::AccountBalance { .. }) => {
            QueryResponseFrame::new(Status::OK, QueryAnswer::Balance { tinybars: 42 })
        }
        _ => QueryResponseFrame::new(Status::NOT_SUPPORTED, QueryAnswer::Empty),
    };
    Ok(frame.to_bytes()?)
}

fn client() -> (Client, Arc<MockTransport>, PrivateKey) {
    let transport = MockTransport::shared(file_server);
    let key = PrivateKey::generate();
    let mut client = Client::new(network(), transport.clone());
    client.set_operator(AccountId::from(OPERATOR), key.clone());
    (client, transport, key)
}

fn file_query() -> Query {
    let mut query = Query::new(QueryData::FileContents {
        file_id: FileId::from(111),
    });
    query.set_node_account_ids([AccountId::from(3), AccountId::from(4)]);
    query
}

fn decode_payment(call: &RecordedCall) -> (ResponseType, SignedTransaction, TransactionBody) {
    let request: QueryRequest = wire::decode(&call.request).unwrap();
    let payment = request.header.payment.expect("paid query carries a payment");
    let signed: SignedTransaction = wire::decode(&payment).unwrap();
    let body: TransactionBody = wire::decode(&signed.body_bytes).unwrap();
    (request.header.response_type, signed, body)
}

// ---------------------------------------------------------------------------
// Cost and ceiling
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn get_cost_reports_the_node_price() {
    let (client, transport, _) = client();
    let cost = file_query().get_cost(&client).await.unwrap();
    assert_eq!(cost, Amount::new(1));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (response_type, _, _) = decode_payment(&calls[0]);
    assert_eq!(response_type, ResponseType::CostAnswer);
}

#[tokio::test(start_paused = true)]
async fn cost_above_ceiling_fails_before_paying() {
    let (client, transport, _) = client();
    let mut query = file_query();
    query.set_max_query_payment(Amount::from_tinybars(TINYBARS_PER_UNIT / 2));

    let err = query.execute(&client).await.unwrap_err();
    match err {
        Error::MaxQueryPaymentExceeded { cost, max } => {
            assert_eq!(cost, Amount::new(1));
            assert_eq!(max, Amount::from_tinybars(TINYBARS_PER_UNIT / 2));
        }
        other => panic!("expected payment ceiling, got {other}"),
    }

    // Only the probe went out.
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(decode_payment(&calls[0]).0, ResponseType::CostAnswer);
}

#[tokio::test(start_paused = true)]
async fn client_default_ceiling_applies() {
    let (mut client, transport, _) = client();
    client.set_default_max_query_payment(Amount::from_tinybars(FILE_COST - 1));

    let err = file_query().execute(&client).await.unwrap_err();
    assert!(matches!(err, Error::MaxQueryPaymentExceeded { .. }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn explicit_payment_skips_the_probe() {
    let (client, transport, _) = client();
    let mut query = file_query();
    query.set_query_payment(Amount::from_tinybars(7));

    let answer = query.execute(&client).await.unwrap();
    assert_eq!(answer, QueryResponse::Contents(Bytes::from_static(b"hello")));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (response_type, _, _) = decode_payment(&calls[0]);
    assert_eq!(response_type, ResponseType::AnswerOnly);
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn paid_query_sends_signed_payment_to_answering_node() {
    let (client, transport, key) = client();

    let answer = file_query().execute(&client).await.unwrap();
    assert_eq!(answer, QueryResponse::Contents(Bytes::from_static(b"hello")));

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    let (response_type, signed, body) = decode_payment(&calls[1]);
    assert_eq!(response_type, ResponseType::AnswerOnly);
    assert_eq!(body.node_account_id, calls[1].node);
    assert_eq!(body.transaction_id.account_id, AccountId::from(OPERATOR));
    assert_eq!(body.method, Method::CryptoTransfer);

    let pair = &signed.sig_map[0];
    assert_eq!(pair.public_key, key.public_key());
    assert!(key.public_key().verify(&signed.body_bytes, &pair.signature));
}

#[tokio::test(start_paused = true)]
async fn payments_differ_per_node() {
    let transport = MockTransport::shared(|call: &RecordedCall| {
        if call.node == AccountId::from(3) {
            return Ok(QueryResponseFrame::new(Status::BUSY, QueryAnswer::Empty).to_bytes()?);
        }
        file_server(call)
    });
    let mut client = Client::new(network(), transport.clone());
    client.set_operator(AccountId::from(OPERATOR), PrivateKey::generate());

    let mut query = file_query();
    query.set_query_payment(Amount::from_tinybars(10));
    query.execute(&client).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    let (_, _, first) = decode_payment(&calls[0]);
    let (_, _, second) = decode_payment(&calls[1]);
    assert_eq!(first.node_account_id, AccountId::from(3));
    assert_eq!(second.node_account_id, AccountId::from(4));
    assert_eq!(first.transaction_id, second.transaction_id);
}

#[tokio::test(start_paused = true)]
async fn paid_query_without_operator_fails_locally() {
    let transport = MockTransport::shared(file_server);
    let client = Client::new(network(), transport.clone());

    let mut query = file_query();
    query.set_query_payment(Amount::from_tinybars(1));
    assert!(matches!(query.execute(&client).await, Err(Error::NoOperator)));
    assert_eq!(transport.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Free queries
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn balance_query_is_free() {
    let transport = MockTransport::shared(file_server);
    let client = Client::new(network(), transport.clone());

    let query = Query::new(QueryData::AccountBalance {
        account_id: AccountId::from(1001),
    });
    assert_eq!(query.get_cost(&client).await.unwrap(), Amount::ZERO);

    let answer = query.execute(&client).await.unwrap();
    assert_eq!(answer, QueryResponse::Balance(Amount::from_tinybars(42)));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let request: QueryRequest = wire::decode(&calls[0].request).unwrap();
    assert!(request.header.payment.is_none());
}

#[tokio::test(start_paused = true)]
async fn unsupported_query_is_rejected() {
    let (client, transport, _) = client();
    let mut query = Query::new(QueryData::Opaque {
        method: Method::Custom("/ledger.SmartContractService/getBytecode".into()),
        payload: vec![1, 2, 3],
        paid: false,
    });
    query.set_node_account_ids([AccountId::from(3), AccountId::from(4)]);

    let err = query.execute(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(Status::NOT_SUPPORTED));
    assert_eq!(transport.call_count(), 1);
}
