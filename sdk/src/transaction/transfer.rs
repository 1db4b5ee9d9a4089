//! Native-currency transfers.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::AccountId;

/// One leg of a transfer: negative amounts debit, positive amounts credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: Amount,
}

/// A list of balance adjustments that should sum to zero.
///
/// The ledger enforces the balance; the client only merges repeated
/// accounts so each appears once.
///
/// ```
/// use ledgerline_sdk::transaction::CryptoTransfer;
/// use ledgerline_sdk::{AccountId, Amount};
///
/// let transfer = CryptoTransfer::new()
///     .hbar_transfer(AccountId::from(1001), Amount::new(-2))
///     .hbar_transfer(AccountId::from(1002), Amount::new(1))
///     .hbar_transfer(AccountId::from(1002), Amount::new(1));
///
/// assert_eq!(transfer.transfers().len(), 2);
/// assert!(transfer.is_balanced());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransfer {
    transfers: Vec<AccountAmount>,
}

impl CryptoTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hbar_transfer(mut self, account_id: AccountId, amount: Amount) -> Self {
        match self
            .transfers
            .iter_mut()
            .find(|leg| leg.account_id == account_id)
        {
            Some(leg) => leg.amount = leg.amount + amount,
            None => self.transfers.push(AccountAmount { account_id, amount }),
        }
        self
    }

    pub fn transfers(&self) -> &[AccountAmount] {
        &self.transfers
    }

    pub fn is_balanced(&self) -> bool {
        self.transfers
            .iter()
            .fold(Amount::ZERO, |sum, leg| sum + leg.amount)
            .is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_accounts_merge_in_first_seen_order() {
        let transfer = CryptoTransfer::new()
            .hbar_transfer(AccountId::from(7), Amount::new(-3))
            .hbar_transfer(AccountId::from(8), Amount::new(1))
            .hbar_transfer(AccountId::from(7), Amount::new(1));

        assert_eq!(
            transfer.transfers(),
            &[
                AccountAmount {
                    account_id: AccountId::from(7),
                    amount: Amount::new(-2)
                },
                AccountAmount {
                    account_id: AccountId::from(8),
                    amount: Amount::new(1)
                },
            ]
        );
        assert!(!transfer.is_balanced());
    }
}
