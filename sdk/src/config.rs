//! # Client Configuration & Constants
//!
//! Protocol defaults live at the top of this file; the JSON client config
//! that overrides them lives at the bottom. If you are hardcoding a timeout
//! or fee somewhere else, move it here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;
use crate::execute::RetryPolicy;
use crate::ids::AccountId;
use crate::network::Network;

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// How long after its valid start a transaction is accepted by nodes.
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);

/// Fee ceiling used when neither the transaction nor the client sets one.
pub const DEFAULT_MAX_TRANSACTION_FEE: Amount = Amount::new(2);

/// Payment ceiling for paid queries when the query sets none.
pub const DEFAULT_MAX_QUERY_PAYMENT: Amount = Amount::new(1);

/// Memo limit, in UTF-8 bytes.
pub const MAX_MEMO_LENGTH: usize = 100;

/// Generated transaction ids start this far in the past.
pub const VALID_START_BACKDATE: Duration = Duration::from_secs(8);

/// Plus up to this much random jitter, so ids generated in the same instant
/// by different clients do not collide.
pub const VALID_START_JITTER: Duration = Duration::from_secs(5);

/// Nodes picked per transaction when the caller sets no explicit list.
pub const DEFAULT_MAX_NODES_PER_TRANSACTION: usize = 10;

// ---------------------------------------------------------------------------
// Retry Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// ±20% jitter on every backoff.
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Per-attempt timeout handed to the transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Cumulative ceiling for one execute call, across all attempts.
pub const DEFAULT_EXECUTION_DEADLINE: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Client config file
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid node account id `{id}`: {reason}")]
    InvalidNodeId { id: String, reason: String },

    #[error("invalid operator: {0}")]
    InvalidOperator(String),
}

/// Operator entry of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfig {
    pub account_id: String,
    pub private_key: String,
}

/// JSON client configuration.
///
/// ```json
/// {
///   "network": { "0.0.3": "node0.example:50211", "0.0.4": "node1.example:50211" },
///   "operator": { "accountId": "0.0.2", "privateKey": "<64 hex chars>" },
///   "maxAttempts": 5
/// }
/// ```
///
/// Every field except `network` is optional; omitted tuning fields fall back
/// to the constants above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub network: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_backoff_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
    /// Tinybars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_transaction_fee: Option<i64>,
    /// Tinybars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_query_payment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes_per_transaction: Option<usize>,
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses the `network` map into a node table.
    pub fn network_table(&self) -> Result<Network, ConfigError> {
        let mut network = Network::new();
        for (id, address) in &self.network {
            let account_id = id
                .parse::<AccountId>()
                .map_err(|err| ConfigError::InvalidNodeId {
                    id: id.clone(),
                    reason: err.to_string(),
                })?;
            network.insert(account_id, address.clone());
        }
        Ok(network)
    }

    /// Retry settings with config overrides applied to the defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(max_attempts) = self.max_attempts {
            policy.max_attempts = max_attempts;
        }
        if let Some(ms) = self.min_backoff_ms {
            policy.min_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_backoff_ms {
            policy.max_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = self.request_timeout_ms {
            policy.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.deadline_ms {
            policy.deadline = Duration::from_millis(ms);
        }
        policy
    }
}
