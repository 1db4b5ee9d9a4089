//! Scripted in-memory transport.
//!
//! Each call is recorded and handed to a closure that decides the answer.
//! Used throughout the test suites and by the CLI for offline commands.
//!
//! ```
//! use ledgerline_sdk::wire::TransactionResponseFrame;
//! use ledgerline_sdk::{MockTransport, Status};
//!
//! let transport = MockTransport::new(|_call| {
//!     Ok(TransactionResponseFrame::new(Status::OK).to_bytes()?)
//! });
//! assert_eq!(transport.call_count(), 0);
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::ids::AccountId;
use crate::network::{NodeTarget, Transport, TransportError};
use crate::wire::Method;

/// One observed `send`.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub node: AccountId,
    pub address: String,
    pub method: Method,
    pub request: Bytes,
}

type Handler = dyn Fn(&RecordedCall) -> Result<Bytes, TransportError> + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedCall) -> Result<Bytes, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for the common `Arc<dyn Transport>` shape.
    pub fn shared<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&RecordedCall) -> Result<Bytes, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self::new(handler))
    }

    /// A transport that refuses every call. For offline-only clients.
    pub fn offline() -> Self {
        Self::new(|call| {
            Err(TransportError::Connect {
                address: call.address.clone(),
                message: "offline".into(),
            })
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Nodes contacted, in order.
    pub fn nodes_called(&self) -> Vec<AccountId> {
        self.calls.lock().iter().map(|call| call.node).collect()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        node: &NodeTarget,
        method: &Method,
        request: Bytes,
        _timeout: Duration,
    ) -> Result<Bytes, TransportError> {
        let call = RecordedCall {
            node: node.account_id,
            address: node.address.clone(),
            method: method.clone(),
            request,
        };
        let result = (self.handler)(&call);
        self.calls.lock().push(call);
        result
    }
}
