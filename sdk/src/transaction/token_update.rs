//! Token property updates.
//!
//! Every field is optional. Unset fields are left unchanged by the ledger;
//! the client does not validate combinations (e.g. a treasury change
//! without an admin key), nodes do.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::ids::{AccountId, Timestamp, TokenId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdate {
    pub token_id: Option<TokenId>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub treasury: Option<AccountId>,
    pub admin_key: Option<PublicKey>,
    pub kyc_key: Option<PublicKey>,
    pub freeze_key: Option<PublicKey>,
    pub wipe_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
    pub auto_renew_account: Option<AccountId>,
    pub auto_renew_period_secs: Option<u64>,
    pub expiration_time: Option<Timestamp>,
}

impl TokenUpdate {
    pub fn new(token_id: TokenId) -> Self {
        Self {
            token_id: Some(token_id),
            ..Self::default()
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// New treasury. The ledger requires the new treasury to sign too.
    pub fn treasury(mut self, account_id: AccountId) -> Self {
        self.treasury = Some(account_id);
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.admin_key = Some(key);
        self
    }

    pub fn kyc_key(mut self, key: PublicKey) -> Self {
        self.kyc_key = Some(key);
        self
    }

    pub fn freeze_key(mut self, key: PublicKey) -> Self {
        self.freeze_key = Some(key);
        self
    }

    pub fn wipe_key(mut self, key: PublicKey) -> Self {
        self.wipe_key = Some(key);
        self
    }

    pub fn supply_key(mut self, key: PublicKey) -> Self {
        self.supply_key = Some(key);
        self
    }

    pub fn auto_renew_account(mut self, account_id: AccountId) -> Self {
        self.auto_renew_account = Some(account_id);
        self
    }

    pub fn auto_renew_period(mut self, period: Duration) -> Self {
        self.auto_renew_period_secs = Some(period.as_secs());
        self
    }

    pub fn expiration_time(mut self, at: Timestamp) -> Self {
        self.expiration_time = Some(at);
        self
    }
}
