//! # Client
//!
//! Everything a request needs from its surroundings: who pays and signs by
//! default (the [`Operator`]), which nodes exist, how to reach them, and how
//! hard to retry.
//!
//! A `Client` is cheap to clone and safe to share. The node table sits
//! behind a read-write lock; in-flight requests work from a snapshot, and
//! [`Client::set_network`] is the only writer.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::amount::Amount;
use crate::config::{self, ClientConfig, ConfigError};
use crate::crypto::{PrivateKey, PublicKey, TransactionSigner};
use crate::error::Error;
use crate::execute::RetryPolicy;
use crate::ids::AccountId;
use crate::network::{Network, Transport};

/// The client's own identity: default payer and signer.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub public_key: PublicKey,
    pub(crate) signer: Arc<TransactionSigner>,
}

impl Operator {
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        (self.signer)(message)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Client {
    network: Arc<RwLock<Network>>,
    transport: Arc<dyn Transport>,
    operator: Option<Operator>,
    retry: RetryPolicy,
    max_transaction_fee: Option<Amount>,
    default_max_query_payment: Amount,
    max_nodes_per_transaction: usize,
}

impl Client {
    pub fn new(network: Network, transport: Arc<dyn Transport>) -> Self {
        Self {
            network: Arc::new(RwLock::new(network)),
            transport,
            operator: None,
            retry: RetryPolicy::default(),
            max_transaction_fee: None,
            default_max_query_payment: config::DEFAULT_MAX_QUERY_PAYMENT,
            max_nodes_per_transaction: config::DEFAULT_MAX_NODES_PER_TRANSACTION,
        }
    }

    /// Builds a client from a parsed config file.
    pub fn from_config(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        let mut client = Self::new(config.network_table()?, transport);
        client.retry = config.retry_policy();

        if let Some(operator) = &config.operator {
            let account_id = operator
                .account_id
                .parse::<AccountId>()
                .map_err(|err| ConfigError::InvalidOperator(err.to_string()))?;
            let key = PrivateKey::from_hex(&operator.private_key)
                .map_err(|err| ConfigError::InvalidOperator(err.to_string()))?;
            client.set_operator(account_id, key);
        }
        if let Some(fee) = config.max_transaction_fee {
            client.max_transaction_fee = Some(Amount::from_tinybars(fee));
        }
        if let Some(max) = config.default_max_query_payment {
            client.default_max_query_payment = Amount::from_tinybars(max);
        }
        if let Some(max) = config.max_nodes_per_transaction {
            client.max_nodes_per_transaction = max;
        }
        Ok(client)
    }

    // ----- Operator -----

    pub fn set_operator(&mut self, account_id: AccountId, key: PrivateKey) -> &mut Self {
        self.operator = Some(Operator {
            account_id,
            public_key: key.public_key(),
            signer: key.signer(),
        });
        self
    }

    /// Operator whose key lives elsewhere (HSM, remote signer).
    pub fn set_operator_with<F>(
        &mut self,
        account_id: AccountId,
        public_key: PublicKey,
        signer: F,
    ) -> &mut Self
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        self.operator = Some(Operator {
            account_id,
            public_key,
            signer: Arc::new(signer),
        });
        self
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.operator.as_ref().map(|op| op.account_id)
    }

    pub fn operator_public_key(&self) -> Option<PublicKey> {
        self.operator.as_ref().map(|op| op.public_key)
    }

    // ----- Network -----

    /// Snapshot of the node table.
    pub fn network(&self) -> Network {
        self.network.read().clone()
    }

    /// Replaces the node table. Requests already in flight keep using the
    /// table they started with.
    pub fn set_network(&self, network: Network) {
        *self.network.write() = network;
    }

    /// Candidate nodes for a new transaction, rotated by `seed`.
    pub fn select_nodes(&self, seed: u64) -> Vec<AccountId> {
        self.network
            .read()
            .node_ids_for(seed, self.max_nodes_per_transaction)
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    // ----- Tuning -----

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) -> &mut Self {
        self.retry = policy;
        self
    }

    pub fn set_max_attempts(&mut self, max_attempts: u32) -> &mut Self {
        self.retry.max_attempts = max_attempts;
        self
    }

    pub fn max_transaction_fee(&self) -> Option<Amount> {
        self.max_transaction_fee
    }

    pub fn set_max_transaction_fee(&mut self, fee: Amount) -> &mut Self {
        self.max_transaction_fee = Some(fee);
        self
    }

    pub fn default_max_query_payment(&self) -> Amount {
        self.default_max_query_payment
    }

    pub fn set_default_max_query_payment(&mut self, max: Amount) -> &mut Self {
        self.default_max_query_payment = max;
        self
    }

    pub fn max_nodes_per_transaction(&self) -> usize {
        self.max_nodes_per_transaction
    }

    /// 0 means every node in the table.
    pub fn set_max_nodes_per_transaction(&mut self, max: usize) -> &mut Self {
        self.max_nodes_per_transaction = max;
        self
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("nodes", &self.network.read().len())
            .field("operator", &self.operator)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockTransport;

    fn offline_client() -> Client {
        let network = (3..=6u64)
            .map(|n| (AccountId::from(n), format!("10.0.0.{n}:50211")))
            .collect();
        Client::new(network, Arc::new(MockTransport::offline()))
    }

    #[test]
    fn operator_signer_verifies() {
        let key = PrivateKey::generate();
        let mut client = offline_client();
        client.set_operator(AccountId::from(2), key.clone());

        let operator = client.operator().unwrap();
        let sig = operator.sign(b"body");
        assert!(key.public_key().verify(b"body", &sig));
        assert_eq!(client.operator_account_id(), Some(AccountId::from(2)));
    }

    #[test]
    fn custom_signer_is_used() {
        let key = PrivateKey::generate();
        let signer_key = key.clone();
        let mut client = offline_client();
        client.set_operator_with(AccountId::from(2), key.public_key(), move |msg| {
            signer_key.sign(msg)
        });
        assert_eq!(client.operator_public_key(), Some(key.public_key()));
    }

    #[test]
    fn selection_respects_max_nodes() {
        let mut client = offline_client();
        client.set_max_nodes_per_transaction(2);
        assert_eq!(client.select_nodes(0), vec![AccountId::from(3), AccountId::from(4)]);
        assert_eq!(client.select_nodes(3), vec![AccountId::from(6), AccountId::from(3)]);
    }

    #[test]
    fn set_network_is_visible_to_clones() {
        let client = offline_client();
        let clone = client.clone();
        client.set_network(Network::new());
        assert!(clone.network().is_empty());
    }

    #[test]
    fn from_config_applies_everything() {
        let key = PrivateKey::generate();
        let json = format!(
            r#"{{
                "network": {{ "0.0.3": "a:1", "0.0.4": "b:1" }},
                "operator": {{ "accountId": "0.0.2", "privateKey": "{}" }},
                "maxAttempts": 2,
                "maxTransactionFee": 500,
                "defaultMaxQueryPayment": 7,
                "maxNodesPerTransaction": 1
            }}"#,
            key.to_hex()
        );
        let config = ClientConfig::from_json_str(&json).unwrap();
        let client = Client::from_config(&config, Arc::new(MockTransport::offline())).unwrap();

        assert_eq!(client.network().len(), 2);
        assert_eq!(client.operator_public_key(), Some(key.public_key()));
        assert_eq!(client.retry_policy().max_attempts, 2);
        assert_eq!(client.max_transaction_fee(), Some(Amount::from_tinybars(500)));
        assert_eq!(client.default_max_query_payment(), Amount::from_tinybars(7));
        assert_eq!(client.max_nodes_per_transaction(), 1);
    }

    #[test]
    fn from_config_rejects_bad_operator() {
        let config = ClientConfig::from_json_str(
            r#"{ "network": {}, "operator": { "accountId": "0.0.2", "privateKey": "nope" } }"#,
        )
        .unwrap();
        let err = Client::from_config(&config, Arc::new(MockTransport::offline())).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidOperator(_))));
    }
}
