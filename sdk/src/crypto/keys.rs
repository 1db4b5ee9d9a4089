//! # Key Management
//!
//! Ed25519 keys for operators and co-signers.
//!
//! - Private keys come from `OsRng` or from 32 bytes of hex supplied by the
//!   caller (config files, the CLI).
//! - Public keys are plain 32-byte values. They key each envelope's
//!   signature map, so they are `Ord + Hash`.
//! - Key bytes are never logged. `Debug` on [`PrivateKey`] prints only the
//!   public half.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The injected signing capability: `sign(bytes) -> signatureBytes`.
///
/// Called once per envelope with that envelope's body bytes.
pub type TransactionSigner = dyn Fn(&[u8]) -> Vec<u8> + Send + Sync;

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid private key: expected 32 bytes of hex")]
    InvalidPrivateKey,

    #[error("invalid public key: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 private key.
///
/// Not `Serialize`; secret material leaves only through
/// [`to_hex`](Self::to_hex).
///
/// ```
/// use ledgerline_sdk::PrivateKey;
///
/// let key = PrivateKey::generate();
/// let sig = key.sign(b"transfer 1 unit");
/// assert!(key.public_key().verify(b"transfer 1 unit", &sig));
/// ```
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Parses 64 hex characters of secret key material.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidPrivateKey)?;
        let arr: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_bytes(&arr))
    }

    /// Secret key as hex. Handle with care.
    pub fn to_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Signs `message`, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    /// Wraps a copy of this key as an injectable signer.
    pub fn signer(&self) -> Arc<TransactionSigner> {
        let key = self.clone();
        Arc::new(move |message: &[u8]| key.sign(message))
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self::from_bytes(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(pub={})", self.public_key())
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of an Ed25519 key. Safe to share and log.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; 32],
}

impl PublicKey {
    /// Validates that `bytes` decode to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes: arr })
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `true` iff `signature` is a valid Ed25519 signature of `message`.
    /// Wrong-length signatures simply fail.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        verifying_key
            .verify(message, &Signature::from_bytes(&sig_bytes))
            .is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let key = PrivateKey::generate();
        let sig = key.sign(b"hello");
        assert_eq!(sig.len(), 64);
        assert!(key.public_key().verify(b"hello", &sig));
        assert!(!key.public_key().verify(b"hullo", &sig));
    }

    #[test]
    fn verify_rejects_wrong_length() {
        let key = PrivateKey::generate();
        assert!(!key.public_key().verify(b"hello", &[0u8; 10]));
    }

    #[test]
    fn hex_round_trip_preserves_identity() {
        let key = PrivateKey::generate();
        let restored = PrivateKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(restored.public_key(), key.public_key());

        let public = PublicKey::from_hex(&key.public_key().to_hex()).unwrap();
        assert_eq!(public, key.public_key());
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(PrivateKey::from_hex("zz").is_err());
        assert!(PrivateKey::from_hex("abcd").is_err());
        assert!(PublicKey::from_hex("00").is_err());
    }

    #[test]
    fn signer_matches_direct_signing() {
        let key = PrivateKey::generate();
        let signer = key.signer();
        assert_eq!(signer(b"payload"), key.sign(b"payload"));
    }

    #[test]
    fn debug_never_prints_secret() {
        let key = PrivateKey::generate();
        let debug = format!("{key:?}");
        assert!(!debug.contains(&key.to_hex()));
        assert!(debug.contains(&key.public_key().to_hex()));
    }
}
