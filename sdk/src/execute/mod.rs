//! # Execution Dispatcher
//!
//! Drives one request (transaction submission, receipt poll, or paid
//! query) across the candidate nodes until one of them gives a final
//! answer.
//!
//! ```text
//!   ┌────────────┐   ┌──────┐   ┌──────────┐
//!   │ SelectNode │──►│ Send │──►│ Classify │──► Success  → map response
//!   └────────────┘   └──────┘   └──────────┘──► Rejected → return at once
//!         ▲                          │
//!         │  next node (unavailable, pending, transport error, bad frame)
//!         │  same node (pending receipt poll)
//!         └──────── backoff ◄────────┘
//! ```
//!
//! Nodes are tried one at a time, in the order fixed when the request was
//! built. The list is never wrapped: running off its end, hitting the
//! attempt ceiling, or passing the deadline all end in
//! [`Error::MaxAttemptsExceeded`] carrying the last failure seen. A node
//! missing from the client's table is skipped without spending an attempt.
//!
//! Retryability comes from [`Status::classify`] alone, so transactions,
//! receipts and queries all behave identically. The one difference is
//! where a pending answer goes next; see `Execute::polls_same_node`.

mod retry;

pub use retry::RetryPolicy;

use std::time::Duration;

use backoff::backoff::Backoff;
use bytes::Bytes;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::Error;
use crate::ids::{AccountId, TransactionId};
use crate::network::TransportError;
use crate::status::{ResponseClass, Status};
use crate::wire::Method;

/// A request the dispatcher knows how to send and interpret.
///
/// `index` always refers to a position in [`node_account_ids`]; paid
/// requests carry a different payment per node, so the bytes are produced
/// per attempt.
///
/// [`node_account_ids`]: Execute::node_account_ids
pub(crate) trait Execute {
    type Response: Send;
    type Output;

    /// Short label for logs.
    fn operation(&self) -> &'static str;

    fn node_account_ids(&self) -> &[AccountId];

    fn method(&self) -> Method;

    fn transaction_id(&self) -> Option<TransactionId>;

    fn make_request(&self, index: usize) -> Result<Bytes, Error>;

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error>;

    fn response_status(&self, response: &Self::Response) -> Status;

    /// Ask the same node again after a pending answer instead of moving on.
    fn polls_same_node(&self) -> bool {
        false
    }

    fn map_response(
        &self,
        response: Self::Response,
        node: AccountId,
        index: usize,
    ) -> Result<Self::Output, Error>;
}

/// What the dispatcher does after one failed attempt.
enum Next {
    SameNode,
    NextNode,
}

pub(crate) async fn execute<E>(client: &Client, request: &E) -> Result<E::Output, Error>
where
    E: Execute + Sync,
{
    let nodes = request.node_account_ids();
    if nodes.is_empty() {
        return Err(Error::NoNetwork);
    }

    let network = client.network();
    let policy = client.retry_policy().clone();
    let max_attempts = policy.max_attempts.max(1);
    let method = request.method();
    let transaction_id = request.transaction_id().map(|id| id.to_string());
    let started = Instant::now();

    let mut schedule = policy.backoff_schedule();
    let mut attempt: u32 = 0;
    let mut index = 0;
    let mut last_error: Option<Error> = None;

    while index < nodes.len() && attempt < max_attempts {
        let elapsed = started.elapsed();
        if attempt > 0 && elapsed >= policy.deadline {
            warn!(
                operation = request.operation(),
                attempts = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "Execution deadline reached"
            );
            break;
        }

        let node = nodes[index];
        let Some(target) = network.target(&node) else {
            warn!(
                operation = request.operation(),
                node = %node,
                "Node is not in the network table, skipping"
            );
            if last_error.is_none() {
                last_error = Some(Error::UnknownNode { node });
            }
            index += 1;
            continue;
        };
        let timeout = policy
            .request_timeout
            .min(policy.deadline.saturating_sub(elapsed))
            .max(Duration::from_millis(1));
        let bytes = request.make_request(index)?;
        attempt += 1;

        debug!(
            operation = request.operation(),
            node = %node,
            attempt,
            max_attempts,
            transaction_id = transaction_id.as_deref().unwrap_or("-"),
            "Sending request"
        );

        let sent = tokio::time::timeout(
            timeout,
            client.transport().send(&target, &method, bytes, timeout),
        )
        .await
        .unwrap_or(Err(TransportError::Timeout(timeout)));

        let (failure, next) = match sent {
            Err(source) => (Error::Transport { node, source }, Next::NextNode),
            Ok(raw) => match request.decode_response(&raw) {
                Err(err) if err.is_retryable() => (err, Next::NextNode),
                Err(err) => return Err(err),
                Ok(response) => {
                    let status = request.response_status(&response);
                    match status.classify() {
                        ResponseClass::Success => {
                            match request.map_response(response, node, index) {
                                Ok(output) => {
                                    info!(
                                        operation = request.operation(),
                                        node = %node,
                                        attempts = attempt,
                                        transaction_id = transaction_id.as_deref().unwrap_or("-"),
                                        "Request accepted"
                                    );
                                    return Ok(output);
                                }
                                Err(err) if err.is_retryable() => (err, Next::NextNode),
                                Err(err) => return Err(err),
                            }
                        }
                        ResponseClass::Rejected => {
                            warn!(
                                operation = request.operation(),
                                node = %node,
                                status = %status,
                                "Request rejected"
                            );
                            return Err(Error::Rejected {
                                node,
                                status,
                                transaction_id: request.transaction_id(),
                            });
                        }
                        ResponseClass::Pending if request.polls_same_node() => {
                            (Error::Pending { node, status }, Next::SameNode)
                        }
                        ResponseClass::Pending => (Error::Pending { node, status }, Next::NextNode),
                        ResponseClass::TransportFailure => {
                            (Error::Unavailable { node, status }, Next::NextNode)
                        }
                    }
                }
            },
        };

        if matches!(next, Next::NextNode) {
            index += 1;
        }

        let more = index < nodes.len() && attempt < max_attempts;
        if more {
            let backoff = schedule
                .next_backoff()
                .unwrap_or(policy.max_backoff)
                .min(policy.deadline.saturating_sub(started.elapsed()));
            warn!(
                operation = request.operation(),
                node = %node,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %failure,
                "Retryable failure, backing off"
            );
            tokio::time::sleep(backoff).await;
        }
        last_error = Some(failure);
    }

    let last = last_error.unwrap_or(Error::NoNetwork);
    if attempt == 0 {
        return Err(last);
    }
    warn!(
        operation = request.operation(),
        attempts = attempt,
        error = %last,
        "All attempts exhausted"
    );
    Err(Error::MaxAttemptsExceeded {
        attempts: attempt,
        last: Box::new(last),
    })
}
