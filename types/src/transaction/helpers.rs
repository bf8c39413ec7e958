// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::transaction::{
    any_key::{AnyPublicKey, AnySignature},
    authenticator::{AccountAuthenticator, AuthenticationKey, SingleKeyAuthenticator},
};
use anyhow::Result;
use aptos_crypto::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature},
    multi_ed25519::{MultiEd25519PrivateKey, MultiEd25519PublicKey, MultiEd25519Signature},
    secp256k1::{Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature},
    SigningKey,
};

/// Key material able to produce the account authenticator of one transaction participant.
pub trait TransactionSigner {
    /// Signs `message`, which is already the full signing message (domain prefix included).
    fn sign_message(&self, message: &[u8]) -> Result<AccountAuthenticator>;

    /// An authenticator with the signer's public key and a zero signature of the same shape.
    fn simulation_authenticator(&self) -> AccountAuthenticator;

    /// The authentication key of an account controlled by this signer.
    fn authentication_key(&self) -> AuthenticationKey;
}

impl TransactionSigner for Ed25519PrivateKey {
    fn sign_message(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::ed25519(
            Ed25519PublicKey::from(self),
            self.sign(message),
        ))
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        AccountAuthenticator::ed25519(
            Ed25519PublicKey::from(self),
            Ed25519Signature::dummy_signature(),
        )
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::ed25519(&Ed25519PublicKey::from(self))
    }
}

/// Secp256k1 accounts are single-key accounts.
impl TransactionSigner for Secp256k1PrivateKey {
    fn sign_message(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        let signature = self.sign(message)?;
        Ok(AccountAuthenticator::single_key(SingleKeyAuthenticator::new(
            AnyPublicKey::secp256k1_ecdsa(Secp256k1PublicKey::from(self)),
            AnySignature::secp256k1_ecdsa(signature),
        )))
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        AccountAuthenticator::single_key(SingleKeyAuthenticator::new(
            AnyPublicKey::secp256k1_ecdsa(Secp256k1PublicKey::from(self)),
            AnySignature::secp256k1_ecdsa(Secp256k1Signature::dummy_signature()),
        ))
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::any_key(&AnyPublicKey::secp256k1_ecdsa(
            Secp256k1PublicKey::from(self),
        ))
    }
}

impl TransactionSigner for MultiEd25519PrivateKey {
    fn sign_message(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::multi_ed25519(
            MultiEd25519PublicKey::from(self),
            self.sign_arbitrary_message(message)?,
        ))
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        let public_key = MultiEd25519PublicKey::from(self);
        let signature = MultiEd25519Signature::dummy(&public_key);
        AccountAuthenticator::multi_ed25519(public_key, signature)
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::multi_ed25519(&MultiEd25519PublicKey::from(self))
    }
}
