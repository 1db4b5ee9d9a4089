//! Monetary amounts.
//!
//! All values are integers in tinybars, the smallest indivisible unit.
//! No floating point anywhere near money.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Tinybars in one whole unit.
pub const TINYBARS_PER_UNIT: i64 = 100_000_000;

/// A signed amount of the ledger's native currency, in tinybars.
///
/// Negative values show up in transfer lists (the debited side).
///
/// ```
/// use ledgerline_sdk::Amount;
///
/// let half = Amount::from_tinybars(50_000_000);
/// assert!(half < Amount::new(1));
/// assert_eq!(half.to_string(), "0.50000000");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// An amount of whole units.
    pub const fn new(units: i64) -> Self {
        Self(units.saturating_mul(TINYBARS_PER_UNIT))
    }

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub const fn to_tinybars(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(self.0.saturating_neg())
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = TINYBARS_PER_UNIT as u64;
        write!(f, "{}{}.{:08}", sign, abs / per_unit, abs % per_unit)
    }
}
