//! # Network
//!
//! The node table and the seam through which bytes reach a node.
//!
//! - [`table`]: which nodes exist and how they are addressed, plus the
//!   deterministic subset selection used when freezing.
//! - [`transport`]: the injected `send(node, method, bytes, timeout)`
//!   capability and its error type.
//! - [`mock`]: a scripted in-memory transport for tests and offline use.

pub mod mock;
pub mod table;
pub mod transport;

pub use mock::{MockTransport, RecordedCall};
pub use table::{Network, NodeTarget};
pub use transport::{Transport, TransportError};
