//! # Wire Frames
//!
//! The request and response frames exchanged with nodes, encoded with
//! `bincode`. Operation payloads ride inside [`TransactionBody::data`] as
//! opaque bytes; this module only defines the envelope around them.
//!
//! ```text
//!   TransactionBody ──bincode──► body_bytes ──sign──► SignedTransaction
//!                                                        │
//!                     TransactionList (to_bytes) ◄───────┘ one per node
//! ```
//!
//! The body bytes are what every signer signs. They are produced once at
//! freeze and never re-encoded afterwards.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::PublicKey;
use crate::ids::{AccountId, FileId, TransactionId};
use crate::query::TransactionReceipt;
use crate::status::Status;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode frame: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[source] bincode::Error),

    #[error("node answered with an unexpected payload: expected {expected}")]
    UnexpectedAnswer { expected: &'static str },

    #[error("serialized transaction carries inconsistent bodies: {0}")]
    InconsistentBodies(String),

    #[error("serialized transaction has no envelopes")]
    Empty,

    #[error("signature by {public_key} does not verify for node {node}")]
    InvalidSignature { node: AccountId, public_key: PublicKey },
}

impl WireError {
    /// True when a node sent something unreadable or of the wrong shape.
    /// The other variants come from local input: encoding our own frames
    /// or loading serialized transactions.
    pub fn is_node_fault(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::UnexpectedAnswer { .. })
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Bytes, WireError> {
    bincode::serialize(value)
        .map(Bytes::from)
        .map_err(WireError::Encode)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    bincode::deserialize(bytes).map_err(WireError::Decode)
}

// ----- Method selectors -----

/// Which remote procedure a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    CryptoTransfer,
    UpdateToken,
    GetTransactionReceipts,
    CryptoGetBalance,
    GetFileContent,
    /// Any other service method, given as its full path.
    Custom(String),
}

impl Method {
    pub fn path(&self) -> &str {
        match self {
            Self::CryptoTransfer => "/ledger.CryptoService/cryptoTransfer",
            Self::UpdateToken => "/ledger.TokenService/updateToken",
            Self::GetTransactionReceipts => "/ledger.CryptoService/getTransactionReceipts",
            Self::CryptoGetBalance => "/ledger.CryptoService/cryptoGetBalance",
            Self::GetFileContent => "/ledger.FileService/getFileContent",
            Self::Custom(path) => path,
        }
    }

    /// Parses a path or one of the short names the CLI accepts.
    pub fn from_name(name: &str) -> Self {
        match name {
            "cryptoTransfer" | "/ledger.CryptoService/cryptoTransfer" => Self::CryptoTransfer,
            "updateToken" | "/ledger.TokenService/updateToken" => Self::UpdateToken,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ----- Transactions -----

/// The canonical signed body. One per target node; bodies of the same
/// transaction differ only in `node_account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub transaction_fee: i64,
    pub valid_duration_secs: u64,
    pub memo: String,
    pub method: Method,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Vec<u8>,
}

/// What actually goes to a node: the body bytes plus every signature over
/// them, ordered by public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: Vec<SignaturePair>,
}

/// All envelopes of one transaction, for offline hand-off between signers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
    pub envelopes: Vec<SignedTransaction>,
}

/// A node's precheck answer to a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponseFrame {
    pub precheck: Status,
    pub cost: i64,
}

impl TransactionResponseFrame {
    pub fn new(precheck: Status) -> Self {
        Self { precheck, cost: 0 }
    }

    pub fn to_bytes(&self) -> Result<Bytes, WireError> {
        encode(self)
    }
}

// ----- Queries -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    AnswerOnly,
    /// Cost probe: the node returns the price instead of the answer.
    CostAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHeader {
    /// Encoded [`SignedTransaction`] paying for the query, if any.
    pub payment: Option<Vec<u8>>,
    pub response_type: ResponseType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryBody {
    TransactionReceipt { transaction_id: TransactionId },
    AccountBalance { account_id: AccountId },
    FileContents { file_id: FileId },
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub header: QueryHeader,
    pub query: QueryBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub precheck: Status,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryAnswer {
    Empty,
    Receipt(TransactionReceipt),
    Balance { tinybars: i64 },
    Contents(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponseFrame {
    pub header: ResponseHeader,
    pub answer: QueryAnswer,
}

impl QueryResponseFrame {
    pub fn new(precheck: Status, answer: QueryAnswer) -> Self {
        Self {
            header: ResponseHeader { precheck, cost: 0 },
            answer,
        }
    }

    /// A cost-probe answer.
    pub fn cost(tinybars: i64) -> Self {
        Self {
            header: ResponseHeader {
                precheck: Status::OK,
                cost: tinybars,
            },
            answer: QueryAnswer::Empty,
        }
    }

    pub fn to_bytes(&self) -> Result<Bytes, WireError> {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Timestamp;

    #[test]
    fn body_encoding_is_deterministic() {
        let body = TransactionBody {
            transaction_id: TransactionId::new(AccountId::from(2), Timestamp::new(10, 0)),
            node_account_id: AccountId::from(3),
            transaction_fee: 1,
            valid_duration_secs: 120,
            memo: "m".into(),
            method: Method::CryptoTransfer,
            data: vec![1, 2, 3],
        };
        assert_eq!(encode(&body).unwrap(), encode(&body.clone()).unwrap());

        let decoded: TransactionBody = decode(&encode(&body).unwrap()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode::<QueryResponseFrame>(&[0xff; 3]).unwrap_err();
        assert!(matches!(err, WireError::Decode(_)));
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::from_name("cryptoTransfer"), Method::CryptoTransfer);
        let custom = Method::from_name("/ledger.SmartContractService/call");
        assert_eq!(custom.path(), "/ledger.SmartContractService/call");
        assert_eq!(Method::UpdateToken.to_string(), "/ledger.TokenService/updateToken");
    }
}
