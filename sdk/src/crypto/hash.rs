//! Hashing used on the client side.
//!
//! Nodes identify a submitted transaction by the SHA-384 digest of the
//! exact signed envelope bytes they received, so that is what
//! [`TransactionResponse::transaction_hash`](crate::TransactionResponse)
//! carries.

use sha2::{Digest, Sha384};

/// SHA-384 of `data`. 48 bytes.
///
/// ```
/// use ledgerline_sdk::crypto::sha384;
///
/// assert_eq!(sha384(b"ledger").len(), 48);
/// ```
pub fn sha384(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha384::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha384_known_vector() {
        // FIPS 180-2 test vector for "abc".
        assert_eq!(
            hex::encode(sha384(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn sha384_is_deterministic_and_input_sensitive() {
        assert_eq!(sha384(b"one"), sha384(b"one"));
        assert_ne!(sha384(b"one"), sha384(b"two"));
    }
}
