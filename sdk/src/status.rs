//! # Response Status Catalogue
//!
//! Every node answer carries an `i32` status code. This module names the
//! codes the client cares about and owns the one table that decides what
//! a code means for the dispatcher: done, not known yet, try another node,
//! or give up.
//!
//! Transaction submission, receipt polling and query execution all consult
//! [`Status::classify`]; none of them keep their own list. When the network
//! adds or repurposes a code, this table is the only place to update.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the dispatcher should treat a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// Terminal success. Map the response and return it.
    Success,
    /// The answer is not known yet (e.g. consensus has not produced a
    /// receipt). Back off and retry; receipt polls stay on their node,
    /// everything else moves to the next one.
    Pending,
    /// The node could not take the request (busy, not active, connection
    /// failure). Back off and move to the next node.
    TransportFailure,
    /// Definitive rejection. Never retried.
    Rejected,
}

impl ResponseClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Pending | Self::TransportFailure)
    }
}

/// A response code from the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);
    pub const INVALID_TRANSACTION: Status = Status(1);
    pub const PAYER_ACCOUNT_NOT_FOUND: Status = Status(2);
    pub const INVALID_NODE_ACCOUNT: Status = Status(3);
    pub const TRANSACTION_EXPIRED: Status = Status(4);
    pub const INVALID_TRANSACTION_START: Status = Status(5);
    pub const INVALID_TRANSACTION_DURATION: Status = Status(6);
    pub const INVALID_SIGNATURE: Status = Status(7);
    pub const MEMO_TOO_LONG: Status = Status(8);
    pub const INSUFFICIENT_TX_FEE: Status = Status(9);
    pub const INSUFFICIENT_PAYER_BALANCE: Status = Status(10);
    pub const DUPLICATE_TRANSACTION: Status = Status(11);
    pub const BUSY: Status = Status(12);
    pub const NOT_SUPPORTED: Status = Status(13);
    pub const INVALID_FILE_ID: Status = Status(14);
    pub const INVALID_ACCOUNT_ID: Status = Status(15);
    pub const INVALID_TRANSACTION_ID: Status = Status(17);
    pub const RECEIPT_NOT_FOUND: Status = Status(18);
    pub const RECORD_NOT_FOUND: Status = Status(19);
    pub const UNKNOWN: Status = Status(21);
    pub const SUCCESS: Status = Status(22);
    pub const FAIL_INVALID: Status = Status(23);
    pub const FAIL_FEE: Status = Status(24);
    pub const FAIL_BALANCE: Status = Status(25);
    pub const INSUFFICIENT_ACCOUNT_BALANCE: Status = Status(28);
    pub const INVALID_EXPIRATION_TIME: Status = Status(35);
    pub const INSUFFICIENT_QUERY_PAYMENT: Status = Status(43);
    pub const PLATFORM_TRANSACTION_NOT_CREATED: Status = Status(47);
    pub const FILE_DELETED: Status = Status(68);
    pub const PLATFORM_NOT_ACTIVE: Status = Status(96);
    pub const INVALID_TOKEN_ID: Status = Status(167);
    pub const INVALID_TREASURY_ACCOUNT_FOR_TOKEN: Status = Status(174);
    pub const TOKEN_HAS_NO_FREEZE_KEY: Status = Status(175);
    pub const TOKEN_HAS_NO_KYC_KEY: Status = Status(176);
    pub const TOKEN_HAS_NO_WIPE_KEY: Status = Status(178);
    pub const TOKEN_HAS_NO_SUPPLY_KEY: Status = Status(180);
    pub const TOKEN_IS_IMMUTABLE: Status = Status(193);

    pub const fn code(self) -> i32 {
        self.0
    }

    /// Looks the code up in the classification table. Anything not listed
    /// is a rejection.
    pub fn classify(self) -> ResponseClass {
        CLASSIFICATION
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, class)| *class)
            .unwrap_or(ResponseClass::Rejected)
    }

    pub fn is_success(self) -> bool {
        self.classify() == ResponseClass::Success
    }

    /// Catalogue name, if the code is one we know.
    pub fn name(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, name)| *name)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "STATUS_{}", self.0),
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self, self.0)
    }
}

/// Status → classification. Keep in sync with the network's catalogue.
const CLASSIFICATION: &[(Status, ResponseClass)] = &[
    (Status::OK, ResponseClass::Success),
    (Status::SUCCESS, ResponseClass::Success),
    (Status::UNKNOWN, ResponseClass::Pending),
    (Status::RECEIPT_NOT_FOUND, ResponseClass::Pending),
    (Status::RECORD_NOT_FOUND, ResponseClass::Pending),
    (Status::BUSY, ResponseClass::TransportFailure),
    (Status::PLATFORM_TRANSACTION_NOT_CREATED, ResponseClass::TransportFailure),
    (Status::PLATFORM_NOT_ACTIVE, ResponseClass::TransportFailure),
];

/// Sorted by code.
const NAMES: &[(Status, &str)] = &[
    (Status::OK, "OK"),
    (Status::INVALID_TRANSACTION, "INVALID_TRANSACTION"),
    (Status::PAYER_ACCOUNT_NOT_FOUND, "PAYER_ACCOUNT_NOT_FOUND"),
    (Status::INVALID_NODE_ACCOUNT, "INVALID_NODE_ACCOUNT"),
    (Status::TRANSACTION_EXPIRED, "TRANSACTION_EXPIRED"),
    (Status::INVALID_TRANSACTION_START, "INVALID_TRANSACTION_START"),
    (Status::INVALID_TRANSACTION_DURATION, "INVALID_TRANSACTION_DURATION"),
    (Status::INVALID_SIGNATURE, "INVALID_SIGNATURE"),
    (Status::MEMO_TOO_LONG, "MEMO_TOO_LONG"),
    (Status::INSUFFICIENT_TX_FEE, "INSUFFICIENT_TX_FEE"),
    (Status::INSUFFICIENT_PAYER_BALANCE, "INSUFFICIENT_PAYER_BALANCE"),
    (Status::DUPLICATE_TRANSACTION, "DUPLICATE_TRANSACTION"),
    (Status::BUSY, "BUSY"),
    (Status::NOT_SUPPORTED, "NOT_SUPPORTED"),
    (Status::INVALID_FILE_ID, "INVALID_FILE_ID"),
    (Status::INVALID_ACCOUNT_ID, "INVALID_ACCOUNT_ID"),
    (Status::INVALID_TRANSACTION_ID, "INVALID_TRANSACTION_ID"),
    (Status::RECEIPT_NOT_FOUND, "RECEIPT_NOT_FOUND"),
    (Status::RECORD_NOT_FOUND, "RECORD_NOT_FOUND"),
    (Status::UNKNOWN, "UNKNOWN"),
    (Status::SUCCESS, "SUCCESS"),
    (Status::FAIL_INVALID, "FAIL_INVALID"),
    (Status::FAIL_FEE, "FAIL_FEE"),
    (Status::FAIL_BALANCE, "FAIL_BALANCE"),
    (Status::INSUFFICIENT_ACCOUNT_BALANCE, "INSUFFICIENT_ACCOUNT_BALANCE"),
    (Status::INVALID_EXPIRATION_TIME, "INVALID_EXPIRATION_TIME"),
    (Status::INSUFFICIENT_QUERY_PAYMENT, "INSUFFICIENT_QUERY_PAYMENT"),
    (Status::PLATFORM_TRANSACTION_NOT_CREATED, "PLATFORM_TRANSACTION_NOT_CREATED"),
    (Status::FILE_DELETED, "FILE_DELETED"),
    (Status::PLATFORM_NOT_ACTIVE, "PLATFORM_NOT_ACTIVE"),
    (Status::INVALID_TOKEN_ID, "INVALID_TOKEN_ID"),
    (Status::INVALID_TREASURY_ACCOUNT_FOR_TOKEN, "INVALID_TREASURY_ACCOUNT_FOR_TOKEN"),
    (Status::TOKEN_HAS_NO_FREEZE_KEY, "TOKEN_HAS_NO_FREEZE_KEY"),
    (Status::TOKEN_HAS_NO_KYC_KEY, "TOKEN_HAS_NO_KYC_KEY"),
    (Status::TOKEN_HAS_NO_WIPE_KEY, "TOKEN_HAS_NO_WIPE_KEY"),
    (Status::TOKEN_HAS_NO_SUPPLY_KEY, "TOKEN_HAS_NO_SUPPLY_KEY"),
    (Status::TOKEN_IS_IMMUTABLE, "TOKEN_IS_IMMUTABLE"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_codes() {
        assert_eq!(Status::OK.classify(), ResponseClass::Success);
        assert_eq!(Status::SUCCESS.classify(), ResponseClass::Success);
        assert!(Status::SUCCESS.is_success());
    }

    #[test]
    fn not_yet_known_is_pending() {
        for status in [Status::UNKNOWN, Status::RECEIPT_NOT_FOUND, Status::RECORD_NOT_FOUND] {
            assert_eq!(status.classify(), ResponseClass::Pending, "{status}");
            assert!(status.classify().is_retryable());
        }
    }

    #[test]
    fn busy_nodes_are_transport_failures() {
        for status in [
            Status::BUSY,
            Status::PLATFORM_TRANSACTION_NOT_CREATED,
            Status::PLATFORM_NOT_ACTIVE,
        ] {
            assert_eq!(status.classify(), ResponseClass::TransportFailure, "{status}");
        }
    }

    #[test]
    fn everything_else_is_rejected() {
        for status in [
            Status::INVALID_SIGNATURE,
            Status::INSUFFICIENT_TX_FEE,
            Status::DUPLICATE_TRANSACTION,
            Status::TOKEN_IS_IMMUTABLE,
            Status(9_999),
        ] {
            assert_eq!(status.classify(), ResponseClass::Rejected, "{status}");
            assert!(!status.classify().is_retryable());
        }
    }

    #[test]
    fn classification_table_has_no_duplicates() {
        for (i, (a, _)) in CLASSIFICATION.iter().enumerate() {
            for (b, _) in &CLASSIFICATION[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn catalogue_is_sorted_by_code() {
        for pair in NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{:?} before {:?}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn display_falls_back_to_code() {
        assert_eq!(Status::BUSY.to_string(), "BUSY");
        assert_eq!(Status(4242).to_string(), "STATUS_4242");
        assert_eq!(format!("{:?}", Status::BUSY), "BUSY(12)");
    }
}
