//! # SDK Errors
//!
//! One error type for everything the SDK can surface, grouped by
//! [`ErrorKind`]:
//!
//! | Kind            | Meaning                                            |
//! |-----------------|----------------------------------------------------|
//! | `State`         | Transaction used in the wrong lifecycle state      |
//! | `Configuration` | Missing payer, network, operator, or bad input     |
//! |                 | (including unreadable serialized transactions)     |
//! | `Payment`       | Query cost above the caller's ceiling              |
//! | `Network`       | Transport failures, surfaced after retry exhaustion|
//! | `Rejection`     | A node or receipt definitively said no             |
//!
//! Retryable failures are handled inside the dispatcher. Callers only ever
//! see the final one, wrapped in [`Error::MaxAttemptsExceeded`].

use thiserror::Error;

use crate::amount::Amount;
use crate::config::ConfigError;
use crate::crypto::KeyError;
use crate::ids::{AccountId, TransactionId};
use crate::network::TransportError;
use crate::status::Status;
use crate::wire::WireError;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    State,
    Configuration,
    Payment,
    Network,
    Rejection,
}

#[derive(Debug, Error)]
pub enum Error {
    // ----- Lifecycle -----
    #[error("transaction is already frozen")]
    AlreadyFrozen,

    #[error("transaction is frozen; its fields can no longer change")]
    TransactionFrozen,

    #[error("transaction must be frozen before signing, and no client was available to freeze it")]
    NotFrozen,

    #[error("transaction was already executed; a retry needs a new transaction id")]
    TransactionExecuted,

    // ----- Configuration -----
    #[error("no payer: set a transaction id or use a client with an operator")]
    NoPayer,

    #[error("no nodes: set node account ids or use a client with a network")]
    NoNetwork,

    #[error("client has no operator configured")]
    NoOperator,

    #[error("node {node} is not in the client's network")]
    UnknownNode { node: AccountId },

    #[error("memo is {len} bytes; the limit is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Key(#[from] KeyError),

    // ----- Payment -----
    #[error("query cost {cost} exceeds the maximum payment {max}")]
    MaxQueryPaymentExceeded { cost: Amount, max: Amount },

    // ----- Network -----
    #[error("transport failure talking to node {node}: {source}")]
    Transport {
        node: AccountId,
        #[source]
        source: TransportError,
    },

    #[error("node {node} is unavailable: {status}")]
    Unavailable { node: AccountId, status: Status },

    #[error("node {node} has no answer yet: {status}")]
    Pending { node: AccountId, status: Status },

    #[error("gave up after {attempts} attempts; last failure: {last}")]
    MaxAttemptsExceeded {
        attempts: u32,
        #[source]
        last: Box<Error>,
    },

    #[error("malformed frame: {0}")]
    Wire(#[from] WireError),

    // ----- Rejection -----
    #[error("node {node} rejected the request: {status}")]
    Rejected {
        node: AccountId,
        status: Status,
        transaction_id: Option<TransactionId>,
    },

    #[error("transaction {transaction_id} reached consensus with status {status}")]
    ReceiptStatus {
        status: Status,
        transaction_id: TransactionId,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyFrozen
            | Self::TransactionFrozen
            | Self::NotFrozen
            | Self::TransactionExecuted => ErrorKind::State,

            Self::Wire(err) if !err.is_node_fault() => ErrorKind::Configuration,

            Self::NoPayer
            | Self::NoNetwork
            | Self::NoOperator
            | Self::UnknownNode { .. }
            | Self::MemoTooLong { .. }
            | Self::Config(_)
            | Self::Key(_) => ErrorKind::Configuration,

            Self::MaxQueryPaymentExceeded { .. } => ErrorKind::Payment,

            Self::Transport { .. }
            | Self::Unavailable { .. }
            | Self::Pending { .. }
            | Self::MaxAttemptsExceeded { .. }
            | Self::Wire(_) => ErrorKind::Network,

            Self::Rejected { .. } | Self::ReceiptStatus { .. } => ErrorKind::Rejection,
        }
    }

    /// Whether the dispatcher would move on to another attempt after this.
    /// Only meaningful for per-attempt errors; callers never see these
    /// unwrapped.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Unavailable { .. } | Self::Pending { .. } => true,
            Self::Wire(err) => err.is_node_fault(),
            _ => false,
        }
    }

    /// Status code carried by the error, if any. For
    /// [`Error::MaxAttemptsExceeded`] this is the last status observed.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Unavailable { status, .. }
            | Self::Pending { status, .. }
            | Self::Rejected { status, .. }
            | Self::ReceiptStatus { status, .. } => Some(*status),
            Self::MaxAttemptsExceeded { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Last node involved, if any.
    pub fn node(&self) -> Option<AccountId> {
        match self {
            Self::Transport { node, .. }
            | Self::Unavailable { node, .. }
            | Self::Pending { node, .. }
            | Self::Rejected { node, .. }
            | Self::UnknownNode { node } => Some(*node),
            Self::MaxAttemptsExceeded { last, .. } => last.node(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::AlreadyFrozen.kind(), ErrorKind::State);
        assert_eq!(Error::NoOperator.kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::MaxQueryPaymentExceeded {
                cost: Amount::new(1),
                max: Amount::ZERO
            }
            .kind(),
            ErrorKind::Payment
        );
        assert_eq!(
            Error::Rejected {
                node: AccountId::from(3),
                status: Status::INVALID_SIGNATURE,
                transaction_id: None
            }
            .kind(),
            ErrorKind::Rejection
        );
    }

    #[test]
    fn exhaustion_exposes_last_context() {
        let err = Error::MaxAttemptsExceeded {
            attempts: 3,
            last: Box::new(Error::Unavailable {
                node: AccountId::from(5),
                status: Status::BUSY,
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(Status::BUSY));
        assert_eq!(err.node(), Some(AccountId::from(5)));
        assert!(err.to_string().contains("BUSY"));
    }

    #[test]
    fn transport_failures_are_retryable() {
        let err = Error::Transport {
            node: AccountId::from(3),
            source: TransportError::Channel("reset".into()),
        };
        assert!(err.is_retryable());
        assert!(!Error::TransactionFrozen.is_retryable());
    }

    #[test]
    fn wire_errors_split_by_origin() {
        let garbled = Error::from(crate::wire::decode::<u64>(&[1]).unwrap_err());
        assert_eq!(garbled.kind(), ErrorKind::Network);
        assert!(garbled.is_retryable());

        let wrong_shape = Error::from(WireError::UnexpectedAnswer { expected: "receipt" });
        assert!(wrong_shape.is_retryable());

        for local in [
            WireError::Empty,
            WireError::InconsistentBodies("memo differs".into()),
        ] {
            let err = Error::from(local);
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(!err.is_retryable());
        }
    }
}
