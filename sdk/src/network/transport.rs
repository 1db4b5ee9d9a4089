//! The transport seam.
//!
//! The SDK never opens sockets itself. Whatever actually reaches a node
//! (gRPC channel, HTTP gateway, in-process fake) implements [`Transport`].
//! Every [`TransportError`] is treated as retryable on the next node.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::network::NodeTarget;
use crate::wire::{Method, WireError};

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}: {message}")]
    Connect { address: String, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("channel error: {0}")]
    Channel(String),
}

/// Lets scripted transports build frames with `?`.
impl From<WireError> for TransportError {
    fn from(err: WireError) -> Self {
        TransportError::Channel(err.to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request to one node and returns the raw response frame.
    ///
    /// Implementations should honor `timeout`; the dispatcher enforces it
    /// as well, so a transport that ignores it only wastes the attempt.
    async fn send(
        &self,
        node: &NodeTarget,
        method: &Method,
        request: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, TransportError>;
}
