//! Signature aggregation.
//!
//! One logical "sign" fans out to every envelope: each envelope's body
//! differs by its node id, so each gets its own signature. Signatures are
//! keyed by public key; a key that already signed an envelope is skipped,
//! so a repeated call never invokes the signer again and never produces a
//! second entry.

use bytes::Bytes;

use crate::client::Client;
use crate::crypto::{PrivateKey, PublicKey};
use crate::error::Error;
use crate::transaction::{Transaction, TransactionState};

impl Transaction {
    /// Signs every envelope with `key`.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<&mut Self, Error> {
        self.sign_with(key.public_key(), |message| key.sign(message))
    }

    /// Signs every envelope with an external signer.
    ///
    /// A draft is frozen first; that only works when the transaction
    /// already carries an explicit id and node list, otherwise this fails
    /// with [`Error::NotFrozen`].
    pub fn sign_with<F>(&mut self, public_key: PublicKey, signer: F) -> Result<&mut Self, Error>
    where
        F: Fn(&[u8]) -> Vec<u8>,
    {
        match self.state {
            TransactionState::Executed => return Err(Error::TransactionExecuted),
            TransactionState::Draft => {
                self.freeze_with(None).map_err(|err| match err {
                    Error::NoPayer | Error::NoNetwork => Error::NotFrozen,
                    other => other,
                })?;
            }
            TransactionState::Frozen | TransactionState::Signed => {}
        }

        for envelope in &mut self.envelopes {
            if envelope.signatures.contains_key(&public_key) {
                continue;
            }
            let signature = signer(&envelope.body_bytes[..]);
            envelope.signatures.insert(public_key, Bytes::from(signature));
        }

        self.state = TransactionState::Signed;
        Ok(self)
    }

    /// Freezes with `client` if needed, then signs with its operator.
    pub fn sign_with_operator(&mut self, client: &Client) -> Result<&mut Self, Error> {
        let operator = client.operator().ok_or(Error::NoOperator)?;
        if self.state == TransactionState::Draft {
            self.freeze_with(Some(client))?;
        }
        let signer = operator.signer.clone();
        self.sign_with(operator.public_key, move |message| signer(message))
    }

    /// `true` if `public_key` has signed every envelope.
    pub fn is_signed_by(&self, public_key: &PublicKey) -> bool {
        !self.envelopes.is_empty()
            && self
                .envelopes
                .iter()
                .all(|envelope| envelope.signatures.contains_key(public_key))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::amount::Amount;
    use crate::ids::{AccountId, Timestamp, TransactionId};
    use crate::network::{MockTransport, Network};
    use crate::transaction::CryptoTransfer;

    fn frozen(nodes: u64) -> Transaction {
        let mut tx = Transaction::new(
            CryptoTransfer::new()
                .hbar_transfer(AccountId::from(2), Amount::new(-1))
                .hbar_transfer(AccountId::from(98), Amount::new(1)),
        );
        tx.set_transaction_id(TransactionId::new(AccountId::from(2), Timestamp::new(1_000, 0)))
            .unwrap()
            .set_node_account_ids((3..3 + nodes).map(AccountId::from))
            .unwrap()
            .freeze()
            .unwrap();
        tx
    }

    #[test]
    fn each_envelope_gets_its_own_verifiable_signature() {
        let key = PrivateKey::generate();
        let mut tx = frozen(3);
        tx.sign(&key).unwrap();

        let public = key.public_key();
        let envelopes = tx.envelopes();
        assert_eq!(envelopes.len(), 3);
        for envelope in envelopes {
            let sig = &envelope.signatures()[&public];
            assert!(public.verify(envelope.body_bytes(), sig));
        }

        // Not interchangeable across nodes.
        let sig_for_first = &envelopes[0].signatures()[&public];
        assert!(!public.verify(envelopes[1].body_bytes(), sig_for_first));
    }

    #[test]
    fn signing_twice_with_same_key_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let key = PrivateKey::generate();
        let mut tx = frozen(2);

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let key = key.clone();
            tx.sign_with(key.public_key(), move |message| {
                calls.fetch_add(1, Ordering::SeqCst);
                key.sign(message)
            })
            .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        for envelope in tx.envelopes() {
            assert_eq!(envelope.signatures().len(), 1);
        }
        assert_eq!(tx.state(), TransactionState::Signed);
    }

    #[test]
    fn multiple_signers_accumulate() {
        let a = PrivateKey::generate();
        let b = PrivateKey::generate();
        let mut tx = frozen(2);
        tx.sign(&a).unwrap().sign(&b).unwrap();

        assert!(tx.is_signed_by(&a.public_key()));
        assert!(tx.is_signed_by(&b.public_key()));
        for envelope in tx.envelopes() {
            assert_eq!(envelope.signatures().len(), 2);
        }
    }

    #[test]
    fn signing_a_draft_freezes_it_when_possible() {
        let mut tx = Transaction::new(CryptoTransfer::new());
        tx.set_transaction_id(TransactionId::generate(AccountId::from(2)))
            .unwrap()
            .set_node_account_ids([AccountId::from(3)])
            .unwrap();
        tx.sign(&PrivateKey::generate()).unwrap();
        assert_eq!(tx.state(), TransactionState::Signed);
    }

    #[test]
    fn signing_an_unfreezable_draft_is_not_frozen() {
        let mut tx = Transaction::new(CryptoTransfer::new());
        let err = tx.sign(&PrivateKey::generate()).unwrap_err();
        assert!(matches!(err, Error::NotFrozen));
        assert_eq!(tx.state(), TransactionState::Draft);
    }

    #[test]
    fn sign_with_operator_needs_an_operator() {
        let network: Network = [(AccountId::from(3), "a:1")].into_iter().collect();
        let client = Client::new(network, Arc::new(MockTransport::offline()));
        let mut tx = Transaction::new(CryptoTransfer::new());
        assert!(matches!(tx.sign_with_operator(&client), Err(Error::NoOperator)));
    }

    #[test]
    fn sign_with_operator_freezes_from_the_client() {
        let key = PrivateKey::generate();
        let network: Network = [(AccountId::from(3), "a:1"), (AccountId::from(4), "b:1")]
            .into_iter()
            .collect();
        let mut client = Client::new(network, Arc::new(MockTransport::offline()));
        client.set_operator(AccountId::from(2), key.clone());

        let mut tx = Transaction::new(CryptoTransfer::new());
        tx.sign_with_operator(&client).unwrap();

        assert_eq!(tx.transaction_id().unwrap().account_id, AccountId::from(2));
        assert_eq!(tx.envelopes().len(), 2);
        assert!(tx.is_signed_by(&key.public_key()));
    }
}
