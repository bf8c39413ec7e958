// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    transaction_builder::{TransactionBuilder, UnsignedTransaction},
    Error, Result,
};
use anyhow::ensure;
use aptos_crypto::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey},
    multi_ed25519::MultiEd25519PrivateKey,
    secp256k1::{Secp256k1PrivateKey, Secp256k1PublicKey},
    Aip80PrivateKey, Uniform,
};
use aptos_types::{
    account_address::AccountAddress,
    transaction::{
        any_key::{AnyPublicKey, AnySignature},
        authenticator::{
            AccountAuthenticator, AuthenticationKey, MultiKeyAuthenticator,
            SingleKeyAuthenticator,
        },
        multi_key::{MultiKey, MultiKeySignature},
        RawTransaction, RawTransactionWithData, SignedTransaction, TransactionSigner,
    },
};
use tracing::debug;

pub use aptos_types::*;

#[derive(Debug)]
pub struct LocalAccount {
    /// Address of the account.
    address: AccountAddress,
    /// Signing key of the account.
    key: AccountKey,
    /// Latest known sequence number of the account, it can be different from validator.
    sequence_number: u64,
}

impl LocalAccount {
    pub fn new<T: Into<AccountKey>>(address: AccountAddress, key: T, sequence_number: u64) -> Self {
        Self {
            address,
            key: key.into(),
            sequence_number,
        }
    }

    /// A fresh Ed25519 account at the address derived from its key.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: ::rand::RngCore + ::rand::CryptoRng,
    {
        let key = AccountKey::generate(rng);
        let address = key.authentication_key().account_address();

        Self::new(address, key, 0)
    }

    /// An account at the address derived from `key`.
    pub fn from_key<T: Into<AccountKey>>(key: T, sequence_number: u64) -> Self {
        let key = key.into();
        let address = key.authentication_key().account_address();
        Self::new(address, key, sequence_number)
    }

    /// Parses an AIP-80 private key string (or plain hex, taken as Ed25519).
    pub fn from_private_key(private_key: &str, sequence_number: u64) -> Result<Self> {
        Ok(Self::from_key(
            AccountKey::from_aip80_string(private_key)?,
            sequence_number,
        ))
    }

    pub fn sign_transaction(&self, txn: RawTransaction) -> Result<SignedTransaction> {
        let message = txn.signing_message()?;
        let authenticator = self.sign_message(&message)?;
        Ok(SignedTransaction::new(txn, authenticator))
    }

    /// This account's authenticator over a transaction with other participants.
    pub fn sign_unsigned_transaction(
        &self,
        txn: &UnsignedTransaction,
    ) -> Result<AccountAuthenticator> {
        self.sign_message(&txn.signing_message()?)
    }

    /// The transaction as the simulation endpoint expects it: this account's public key and
    /// a zero signature.
    pub fn simulate_transaction(&self, txn: RawTransaction) -> SignedTransaction {
        let authenticator = self.key.simulation_authenticator();
        debug!(
            sender = %self.address,
            scheme = %authenticator.scheme(),
            "produced simulation authenticator"
        );
        SignedTransaction::new(txn, authenticator)
    }

    pub fn sign_with_transaction_builder(
        &mut self,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.sequence_number())
            .build()?;
        let signed_txn = self.sign_transaction(raw_txn)?;
        self.increment_sequence_number();
        Ok(signed_txn)
    }

    pub fn sign_multi_agent_with_transaction_builder(
        &mut self,
        secondary_signers: Vec<&Self>,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let secondary_signer_addresses: Vec<_> = secondary_signers
            .iter()
            .map(|signer| signer.address())
            .collect();
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.sequence_number())
            .build()?;
        let txn = UnsignedTransaction::WithData(RawTransactionWithData::new_multi_agent(
            raw_txn.clone(),
            secondary_signer_addresses.clone(),
        ));
        let sender = self.sign_unsigned_transaction(&txn)?;
        let secondary_signers = secondary_signers
            .iter()
            .map(|signer| signer.sign_unsigned_transaction(&txn))
            .collect::<Result<Vec<_>>>()?;
        self.increment_sequence_number();
        Ok(SignedTransaction::new_multi_agent(
            raw_txn,
            sender,
            secondary_signer_addresses,
            secondary_signers,
        ))
    }

    pub fn sign_fee_payer_with_transaction_builder(
        &mut self,
        secondary_signers: Vec<&Self>,
        fee_payer_signer: &Self,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let secondary_signer_addresses: Vec<_> = secondary_signers
            .iter()
            .map(|signer| signer.address())
            .collect();
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.sequence_number())
            .build()?;
        let txn = UnsignedTransaction::WithData(RawTransactionWithData::new_fee_payer(
            raw_txn.clone(),
            secondary_signer_addresses.clone(),
            fee_payer_signer.address(),
        ));
        let sender = self.sign_unsigned_transaction(&txn)?;
        let secondary_signers = secondary_signers
            .iter()
            .map(|signer| signer.sign_unsigned_transaction(&txn))
            .collect::<Result<Vec<_>>>()?;
        let fee_payer = fee_payer_signer.sign_unsigned_transaction(&txn)?;
        self.increment_sequence_number();
        Ok(SignedTransaction::new_fee_payer(
            raw_txn,
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_signer.address(),
            fee_payer,
        ))
    }

    fn sign_message(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        let authenticator = self.key.sign_message(message)?;
        debug!(
            sender = %self.address,
            scheme = %authenticator.scheme(),
            message_len = message.len(),
            "signed transaction"
        );
        Ok(authenticator)
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn key(&self) -> &AccountKey {
        &self.key
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        self.key.authentication_key()
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn sequence_number_mut(&mut self) -> &mut u64 {
        &mut self.sequence_number
    }

    pub fn increment_sequence_number(&mut self) -> u64 {
        self.sequence_number += 1;
        self.sequence_number
    }

    pub fn rotate_key<T: Into<AccountKey>>(&mut self, new_key: T) -> AccountKey {
        std::mem::replace(&mut self.key, new_key.into())
    }
}

/// The key material an account signs with, one variant per account kind.
#[derive(Debug)]
pub enum AccountKey {
    Ed25519(Ed25519PrivateKey),
    /// Ed25519 or Secp256k1 key of a single-key account.
    SingleKey(SingleKeyPrivateKey),
    MultiEd25519(MultiEd25519PrivateKey),
    MultiKey(MultiKeySigner),
}

impl AccountKey {
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: ::rand::RngCore + ::rand::CryptoRng,
    {
        AccountKey::Ed25519(Ed25519PrivateKey::generate(rng))
    }

    /// `secp256k1-priv-` keys become single-key accounts; everything else is read as Ed25519.
    pub fn from_aip80_string(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.starts_with(Secp256k1PrivateKey::AIP80_PREFIX) {
            Ok(Secp256k1PrivateKey::from_aip80_string(value)?.into())
        } else {
            Ok(Ed25519PrivateKey::from_aip80_string(value)?.into())
        }
    }

    fn signer(&self) -> &dyn TransactionSigner {
        match self {
            AccountKey::Ed25519(key) => key,
            AccountKey::SingleKey(key) => key,
            AccountKey::MultiEd25519(key) => key,
            AccountKey::MultiKey(key) => key,
        }
    }
}

impl TransactionSigner for AccountKey {
    fn sign_message(&self, message: &[u8]) -> anyhow::Result<AccountAuthenticator> {
        self.signer().sign_message(message)
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        self.signer().simulation_authenticator()
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.signer().authentication_key()
    }
}

impl From<Ed25519PrivateKey> for AccountKey {
    fn from(private_key: Ed25519PrivateKey) -> Self {
        AccountKey::Ed25519(private_key)
    }
}

impl From<Secp256k1PrivateKey> for AccountKey {
    fn from(private_key: Secp256k1PrivateKey) -> Self {
        AccountKey::SingleKey(SingleKeyPrivateKey::Secp256k1(private_key))
    }
}

impl From<SingleKeyPrivateKey> for AccountKey {
    fn from(private_key: SingleKeyPrivateKey) -> Self {
        AccountKey::SingleKey(private_key)
    }
}

impl From<MultiEd25519PrivateKey> for AccountKey {
    fn from(private_key: MultiEd25519PrivateKey) -> Self {
        AccountKey::MultiEd25519(private_key)
    }
}

impl From<MultiKeySigner> for AccountKey {
    fn from(signer: MultiKeySigner) -> Self {
        AccountKey::MultiKey(signer)
    }
}

/// A private key signing through the `SingleKey` authenticator.
#[derive(Debug)]
pub enum SingleKeyPrivateKey {
    Ed25519(Ed25519PrivateKey),
    Secp256k1(Secp256k1PrivateKey),
}

impl SingleKeyPrivateKey {
    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(key) => AnyPublicKey::ed25519(Ed25519PublicKey::from(key)),
            Self::Secp256k1(key) => AnyPublicKey::secp256k1_ecdsa(Secp256k1PublicKey::from(key)),
        }
    }

    pub fn sign(&self, message: &[u8]) -> anyhow::Result<AnySignature> {
        Ok(match self {
            Self::Ed25519(key) => AnySignature::ed25519(key.sign(message)),
            Self::Secp256k1(key) => AnySignature::secp256k1_ecdsa(key.sign(message)?),
        })
    }
}

impl TransactionSigner for SingleKeyPrivateKey {
    fn sign_message(&self, message: &[u8]) -> anyhow::Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::single_key(SingleKeyAuthenticator::new(
            self.public_key(),
            self.sign(message)?,
        )))
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        let public_key = self.public_key();
        let signature = AnySignature::simulation_for(&public_key);
        AccountAuthenticator::single_key(SingleKeyAuthenticator::new(public_key, signature))
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::any_key(&self.public_key())
    }
}

/// The locally held keys of a multi-key account, each with its index in the account's key list.
#[derive(Debug)]
pub struct MultiKeySigner {
    multi_key: MultiKey,
    private_keys: Vec<(u8, SingleKeyPrivateKey)>,
}

impl MultiKeySigner {
    /// Every private key must match the public key at its index and together they must meet
    /// the threshold.
    pub fn new(multi_key: MultiKey, private_keys: Vec<(u8, SingleKeyPrivateKey)>) -> Result<Self> {
        Self::check(&multi_key, &private_keys).map_err(Error::crypto)?;
        Ok(Self {
            multi_key,
            private_keys,
        })
    }

    fn check(multi_key: &MultiKey, private_keys: &[(u8, SingleKeyPrivateKey)]) -> anyhow::Result<()> {
        ensure!(
            private_keys.len() >= multi_key.signatures_required() as usize,
            "{} keys cannot meet a threshold of {}",
            private_keys.len(),
            multi_key.signatures_required()
        );
        let mut seen = Vec::with_capacity(private_keys.len());
        for (index, private_key) in private_keys {
            ensure!(!seen.contains(index), "Duplicate key index {}", index);
            seen.push(*index);
            let public_key = multi_key.public_keys().get(*index as usize);
            ensure!(
                public_key == Some(&private_key.public_key()),
                "Private key does not match public key {}",
                index
            );
        }
        Ok(())
    }

    pub fn multi_key(&self) -> &MultiKey {
        &self.multi_key
    }
}

impl TransactionSigner for MultiKeySigner {
    fn sign_message(&self, message: &[u8]) -> anyhow::Result<AccountAuthenticator> {
        let signatures = self
            .private_keys
            .iter()
            .map(|(index, private_key)| Ok((*index, private_key.sign(message)?)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(AccountAuthenticator::multi_key(MultiKeyAuthenticator::new(
            self.multi_key.clone(),
            MultiKeySignature::new(signatures)?,
        )))
    }

    fn simulation_authenticator(&self) -> AccountAuthenticator {
        AccountAuthenticator::multi_key(MultiKeyAuthenticator::new(
            self.multi_key.clone(),
            MultiKeySignature::dummy(&self.multi_key),
        ))
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::multi_key(&self.multi_key)
    }
}
