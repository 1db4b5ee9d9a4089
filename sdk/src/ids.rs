//! Entity identifiers and transaction ids.
//!
//! Every entity on the ledger (accounts, tokens, files) is addressed by a
//! `shard.realm.num` triple. A [`TransactionId`] pairs the paying account
//! with the instant the transaction becomes valid; nodes use it to
//! deduplicate submissions and clients use it to look up receipts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Failure to parse an id from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("expected `shard.realm.num`, got `{0}`")]
    Malformed(String),

    #[error("expected `shard.realm.num@seconds.nanos`, got `{0}`")]
    MalformedTransactionId(String),
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        impl From<u64> for $name {
            /// Shorthand for an id in shard 0, realm 0.
            fn from(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_triple(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_id!(
    /// An account. Node accounts double as submission targets.
    AccountId
);

entity_id!(
    /// A token created on the ledger.
    TokenId
);

entity_id!(
    /// A file stored on the ledger.
    FileId
);

fn parse_triple(s: &str) -> Result<(u64, u64, u64), IdParseError> {
    let malformed = || IdParseError::Malformed(s.to_string());
    let mut parts = s.split('.');
    let mut next = || -> Result<u64, IdParseError> {
        parts
            .next()
            .ok_or_else(malformed)?
            .parse::<u64>()
            .map_err(|_| malformed())
    };
    let triple = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(triple)
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Seconds + nanoseconds since the Unix epoch, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Converts back to a calendar time. `None` if out of chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanos).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanos: value.timestamp_subsec_nanos(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Identifies one logical transaction: the payer plus its valid-start time.
///
/// Every per-node envelope of a transaction embeds the same id, and the
/// receipt is looked up by it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
}

impl TransactionId {
    pub const fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }

    /// Generates a fresh id for `payer`.
    ///
    /// The valid start is backdated by a few seconds plus random jitter so
    /// that modest clock skew against the nodes does not make the
    /// transaction look like it starts in the future.
    pub fn generate(payer: AccountId) -> Self {
        let jitter_nanos = config::VALID_START_JITTER.as_nanos() as u64;
        let jitter = Duration::from_nanos(rand::thread_rng().gen_range(0..jitter_nanos.max(1)));
        let backdate = config::VALID_START_BACKDATE + jitter;
        let start = Utc::now() - chrono::Duration::nanoseconds(backdate.as_nanos() as i64);

        Self::new(payer, Timestamp::from(start))
    }

    /// Deterministic seed derived from the id, used to rotate node selection.
    pub(crate) fn selection_seed(&self) -> u64 {
        (self.valid_start.seconds as u64).rotate_left(32) ^ u64::from(self.valid_start.nanos)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)
    }
}

impl FromStr for TransactionId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdParseError::MalformedTransactionId(s.to_string());
        let (account, start) = s.split_once('@').ok_or_else(malformed)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(malformed)?;

        let account_id = account.parse::<AccountId>().map_err(|_| malformed())?;
        let seconds = seconds.parse::<i64>().map_err(|_| malformed())?;
        let nanos = nanos.parse::<u32>().map_err(|_| malformed())?;
        if nanos >= 1_000_000_000 {
            return Err(malformed());
        }

        Ok(Self::new(account_id, Timestamp::new(seconds, nanos)))
    }
}
