//! # Cryptographic Primitives
//!
//! Ed25519 keys and the signing capability the rest of the SDK consumes.
//!
//! The transaction engine never touches key material directly. It asks for
//! a [`TransactionSigner`], a plain `Fn(&[u8]) -> Vec<u8>`, paired with the
//! [`PublicKey`] that keys the signature map. [`PrivateKey::signer`] is the
//! stock implementation; hardware wallets and remote signers plug in the
//! same way through `Transaction::sign_with`.

pub mod hash;
pub mod keys;

pub use hash::sha384;
pub use keys::{KeyError, PrivateKey, PublicKey, TransactionSigner};
