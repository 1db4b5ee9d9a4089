//! Operation payloads.
//!
//! A transaction carries exactly one [`TransactionData`]. The engine only
//! asks it two things: which method to call and what bytes to embed.

use serde::de::DeserializeOwned;

use crate::transaction::{CryptoTransfer, TokenUpdate};
use crate::wire::{self, Method, WireError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionData {
    CryptoTransfer(CryptoTransfer),
    TokenUpdate(TokenUpdate),
    /// Any operation this SDK has no typed builder for. The payload is
    /// embedded untouched.
    Opaque { method: Method, payload: Vec<u8> },
}

impl TransactionData {
    pub fn method(&self) -> Method {
        match self {
            Self::CryptoTransfer(_) => Method::CryptoTransfer,
            Self::TokenUpdate(_) => Method::UpdateToken,
            Self::Opaque { method, .. } => method.clone(),
        }
    }

    pub(crate) fn payload(&self) -> Result<Vec<u8>, WireError> {
        match self {
            Self::CryptoTransfer(transfer) => Ok(wire::encode(transfer)?.to_vec()),
            Self::TokenUpdate(update) => Ok(wire::encode(update)?.to_vec()),
            Self::Opaque { payload, .. } => Ok(payload.clone()),
        }
    }

    /// Rebuilds the payload from a decoded body. Payloads that do not
    /// decode as their method's type stay opaque.
    pub(crate) fn from_wire(method: Method, payload: Vec<u8>) -> Self {
        fn typed<T: DeserializeOwned>(payload: &[u8]) -> Option<T> {
            wire::decode(payload).ok()
        }

        match method {
            Method::CryptoTransfer => match typed(&payload) {
                Some(transfer) => Self::CryptoTransfer(transfer),
                None => Self::Opaque { method, payload },
            },
            Method::UpdateToken => match typed(&payload) {
                Some(update) => Self::TokenUpdate(update),
                None => Self::Opaque { method, payload },
            },
            method => Self::Opaque { method, payload },
        }
    }
}

impl From<CryptoTransfer> for TransactionData {
    fn from(value: CryptoTransfer) -> Self {
        Self::CryptoTransfer(value)
    }
}

impl From<TokenUpdate> for TransactionData {
    fn from(value: TokenUpdate) -> Self {
        Self::TokenUpdate(value)
    }
}
