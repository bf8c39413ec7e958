// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    account_address::AccountAddress,
    transaction::{
        any_key::{AnyPublicKey, AnySignature},
        multi_key::{MultiKey, MultiKeySignature},
        RawTransaction, RawTransactionWithData,
    },
};
use anyhow::{ensure, Error, Result};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use aptos_crypto::{
    ed25519::{Ed25519PublicKey, Ed25519Signature},
    multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature},
    traits::Signature,
    CryptoMaterialError, HashValue, ValidCryptoMaterial,
};
use rand::{rngs::OsRng, Rng};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Maximum number of signatures supported in `TransactionAuthenticator`,
/// across all `AccountAuthenticator`s included.
pub const MAX_NUM_OF_SIGS: usize = 32;

/// An error enum for issues related to transaction or account authentication.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{:?}", self)]
pub enum AuthenticationError {
    /// The number of signatures exceeds the maximum supported.
    MaxSignaturesExceeded,
}

/// Each transaction submitted to the Aptos blockchain contains a `TransactionAuthenticator`.
/// During validation, the node checks that every `AccountAuthenticator`'s signature on the
/// signing message is valid and that the hash of its public key and scheme matches the
/// `AuthenticationKey` stored under the participating signer's account address.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TransactionAuthenticator {
    /// Single signature
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    /// K-of-N multisignature
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    /// Multi-agent transaction.
    MultiAgent {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Optional multi-agent transaction with a fee payer.
    FeePayer {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    },
    /// A single signer using any account authenticator.
    SingleSender { sender: AccountAuthenticator },
}

impl TransactionAuthenticator {
    /// Create a single-signature ed25519 authenticator
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Create a multisignature ed25519 authenticator
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Create a multi-agent authenticator
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Self {
        Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }

    /// Create a fee payer authenticator
    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Self {
        Self::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        }
    }

    /// Create a single sender authenticator
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        Self::SingleSender { sender }
    }

    /// Total number of signatures across all participants.
    pub fn number_of_signatures(&self) -> usize {
        self.all_signers()
            .iter()
            .map(AccountAuthenticator::number_of_signatures)
            .sum()
    }

    /// Checks the signature budget and every participant's signature.
    pub fn check_signatures(&self, raw_txn: &RawTransaction) -> Result<()> {
        if self.number_of_signatures() > MAX_NUM_OF_SIGS {
            return Err(Error::new(AuthenticationError::MaxSignaturesExceeded));
        }
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => signature.verify_arbitrary_msg(&raw_txn.signing_message()?, public_key),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => signature.verify_arbitrary_msg(&raw_txn.signing_message()?, public_key),
            Self::SingleSender { sender } => {
                ensure!(
                    sender.verify(&raw_txn.signing_message()?),
                    "Invalid sender signature"
                );
                Ok(())
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                ensure!(
                    secondary_signer_addresses.len() == secondary_signers.len(),
                    "Secondary signer addresses and signers differ in length"
                );
                let message = RawTransactionWithData::new_multi_agent(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                )
                .signing_message()?;
                ensure!(sender.verify(&message), "Invalid sender signature");
                for signer in secondary_signers {
                    ensure!(signer.verify(&message), "Invalid secondary signature");
                }
                Ok(())
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                ensure!(
                    secondary_signer_addresses.len() == secondary_signers.len(),
                    "Secondary signer addresses and signers differ in length"
                );
                let message = RawTransactionWithData::new_fee_payer(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                    *fee_payer_address,
                )
                .signing_message()?;
                // The sender and secondary signers may sign before the fee payer is known, in
                // which case they sign with the zero address in its place.
                let unknown_fee_payer = RawTransactionWithData::new_fee_payer(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                    AccountAddress::ZERO,
                )
                .signing_message()?;
                for signer in std::iter::once(sender).chain(secondary_signers) {
                    ensure!(
                        signer.verify(&message) || signer.verify(&unknown_fee_payer),
                        "Invalid sender or secondary signature"
                    );
                }
                ensure!(
                    fee_payer_signer.verify(&message),
                    "Invalid fee payer signature"
                );
                Ok(())
            }
        }
    }

    /// Returns `true` if every signature of the transaction verifies.
    pub fn verify(&self, raw_txn: &RawTransaction) -> bool {
        self.check_signatures(raw_txn).is_ok()
    }

    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(public_key.clone(), signature.clone()),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::multi_ed25519(public_key.clone(), signature.clone()),
            Self::MultiAgent { sender, .. }
            | Self::FeePayer { sender, .. }
            | Self::SingleSender { sender } => sender.clone(),
        }
    }

    pub fn secondary_signer_addresses(&self) -> Vec<AccountAddress> {
        match self {
            Self::Ed25519 { .. } | Self::MultiEd25519 { .. } | Self::SingleSender { .. } => {
                vec![]
            }
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses.to_vec(),
        }
    }

    pub fn secondary_signers(&self) -> Vec<AccountAuthenticator> {
        match self {
            Self::Ed25519 { .. } | Self::MultiEd25519 { .. } | Self::SingleSender { .. } => {
                vec![]
            }
            Self::MultiAgent {
                secondary_signers, ..
            }
            | Self::FeePayer {
                secondary_signers, ..
            } => secondary_signers.to_vec(),
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::FeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
            _ => None,
        }
    }

    pub fn fee_payer_signer(&self) -> Option<AccountAuthenticator> {
        match self {
            Self::FeePayer {
                fee_payer_signer, ..
            } => Some(fee_payer_signer.clone()),
            _ => None,
        }
    }

    /// The sender, then the secondary signers, then the fee payer.
    pub fn all_signers(&self) -> Vec<AccountAuthenticator> {
        let mut signers = vec![self.sender()];
        signers.extend(self.secondary_signers());
        signers.extend(self.fee_payer_signer());
        signers
    }

    /// The same authenticator with every signature replaced by a zero signature of the same
    /// shape, for transaction simulation.
    pub fn simulation(&self) -> Self {
        match self {
            Self::Ed25519 { public_key, .. } => {
                Self::ed25519(public_key.clone(), Ed25519Signature::dummy_signature())
            }
            Self::MultiEd25519 { public_key, .. } => Self::multi_ed25519(
                public_key.clone(),
                MultiEd25519Signature::dummy(public_key),
            ),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => Self::multi_agent(
                sender.simulation(),
                secondary_signer_addresses.clone(),
                secondary_signers
                    .iter()
                    .map(AccountAuthenticator::simulation)
                    .collect(),
            ),
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => Self::fee_payer(
                sender.simulation(),
                secondary_signer_addresses.clone(),
                secondary_signers
                    .iter()
                    .map(AccountAuthenticator::simulation)
                    .collect(),
                *fee_payer_address,
                fee_payer_signer.simulation(),
            ),
            Self::SingleSender { sender } => Self::single_sender(sender.simulation()),
        }
    }
}

impl fmt::Display for TransactionAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 { .. } => write!(
                f,
                "TransactionAuthenticator[scheme: Ed25519, sender: {}]",
                self.sender()
            ),
            Self::MultiEd25519 { .. } => write!(
                f,
                "TransactionAuthenticator[scheme: MultiEd25519, sender: {}]",
                self.sender()
            ),
            Self::SingleSender { sender } => write!(
                f,
                "TransactionAuthenticator[scheme: SingleSender, sender: {}]",
                sender
            ),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                let mut sec_addrs: String = "".to_string();
                for sec_addr in secondary_signer_addresses {
                    sec_addrs = format!("{}\n\t\t\t{:#?},", sec_addrs, sec_addr);
                }
                let mut sec_signers: String = "".to_string();
                for sec_signer in secondary_signers {
                    sec_signers = format!("{}\n\t\t\t{:#?},", sec_signers, sec_signer);
                }
                write!(
                    f,
                    "TransactionAuthenticator[\n\
                        \tscheme: MultiAgent, \n\
                        \tsender: {}\n\
                        \tsecondary signer addresses: {}\n\
                        \tsecondary signers: {}]",
                    sender, sec_addrs, sec_signers,
                )
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                let mut sec_addrs: String = "".to_string();
                for sec_addr in secondary_signer_addresses {
                    sec_addrs = format!("{}\n\t\t\t{:#?},", sec_addrs, sec_addr);
                }
                let mut sec_signers: String = "".to_string();
                for sec_signer in secondary_signers {
                    sec_signers = format!("{}\n\t\t\t{:#?},", sec_signers, sec_signer);
                }
                write!(
                    f,
                    "TransactionAuthenticator[\n\
                        \tscheme: FeePayer, \n\
                        \tsender: {}\n\
                        \tsecondary signer addresses: {}\n\
                        \tsecondary signers: {}\n\
                        \tfee payer address: {}\n\
                        \tfee payer signer: {}]",
                    sender, sec_addrs, sec_signers, fee_payer_address, fee_payer_signer,
                )
            }
        }
    }
}

impl CanonicalSerialize for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer
                    .encode_variant_index(0)
                    .encode_struct(public_key)
                    .encode_struct(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer
                    .encode_variant_index(1)
                    .encode_struct(public_key)
                    .encode_struct(signature);
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                serializer
                    .encode_variant_index(2)
                    .encode_struct(sender)
                    .encode_vec(secondary_signer_addresses)
                    .encode_vec(secondary_signers);
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                serializer
                    .encode_variant_index(3)
                    .encode_struct(sender)
                    .encode_vec(secondary_signer_addresses)
                    .encode_vec(secondary_signers)
                    .encode_struct(fee_payer_address)
                    .encode_struct(fee_payer_signer);
            }
            Self::SingleSender { sender } => {
                serializer.encode_variant_index(4).encode_struct(sender);
            }
        }
    }
}

impl CanonicalDeserialize for TransactionAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        Ok(match deserializer.decode_variant_index() {
            0 => Self::ed25519(deserializer.decode_struct()?, deserializer.decode_struct()?),
            1 => Self::multi_ed25519(deserializer.decode_struct()?, deserializer.decode_struct()?),
            2 => Self::multi_agent(
                deserializer.decode_struct()?,
                deserializer.decode_vec()?,
                deserializer.decode_vec()?,
            ),
            3 => Self::fee_payer(
                deserializer.decode_struct()?,
                deserializer.decode_vec()?,
                deserializer.decode_vec()?,
                deserializer.decode_struct()?,
                deserializer.decode_struct()?,
            ),
            4 => Self::single_sender(deserializer.decode_struct()?),
            index => {
                deserializer.check()?;
                return Err(aptos_bcs::Error::unknown_variant(
                    "TransactionAuthenticator",
                    index,
                ));
            }
        })
    }
}

/// Scheme bytes appended to a preimage before hashing it into an authentication key or a
/// derived address.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Scheme {
    Ed25519 = 0,
    MultiEd25519 = 1,
    SingleKey = 2,
    MultiKey = 3,
    /// Used by `NoAccountAuthenticator`, which has no key.
    NoScheme = 250,
    DeriveObjectAddressFromObject = 0xFC,
    DeriveObjectAddressFromGuid = 0xFD,
    DeriveObjectAddressFromSeed = 0xFE,
    DeriveResourceAccountAddress = 0xFF,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = match self {
            Scheme::Ed25519 => "Ed25519",
            Scheme::MultiEd25519 => "MultiEd25519",
            Scheme::SingleKey => "SingleKey",
            Scheme::MultiKey => "MultiKey",
            Scheme::NoScheme => "NoScheme",
            Scheme::DeriveObjectAddressFromObject => "DeriveObjectAddressFromObject",
            Scheme::DeriveObjectAddressFromGuid => "DeriveObjectAddressFromGuid",
            Scheme::DeriveObjectAddressFromSeed => "DeriveObjectAddressFromSeed",
            Scheme::DeriveResourceAccountAddress => "DeriveResourceAccountAddress",
        };
        write!(f, "Scheme::{}", display)
    }
}

/// A single key of any supported scheme and its signature.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SingleKeyAuthenticator {
    public_key: AnyPublicKey,
    signature: AnySignature,
}

impl SingleKeyAuthenticator {
    pub fn new(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    pub fn signature(&self) -> &AnySignature {
        &self.signature
    }

    pub fn verify(&self, message: &[u8]) -> bool {
        self.signature.verify(message, &self.public_key)
    }
}

/// K-of-N keys of any supported schemes and the signatures of the signing subset.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MultiKeyAuthenticator {
    public_keys: MultiKey,
    signatures: MultiKeySignature,
}

impl MultiKeyAuthenticator {
    pub fn new(public_keys: MultiKey, signatures: MultiKeySignature) -> Self {
        Self {
            public_keys,
            signatures,
        }
    }

    pub fn public_keys(&self) -> &MultiKey {
        &self.public_keys
    }

    pub fn signatures(&self) -> &MultiKeySignature {
        &self.signatures
    }

    pub fn verify(&self, message: &[u8]) -> bool {
        self.signatures.verify(message, &self.public_keys)
    }
}

/// An `AccountAuthenticator` is an an abstraction of a signature scheme. It must know:
/// (1) How to check its signature against a message and public key
/// (2) How to convert its public key into an `AuthenticationKeyPreimage` structured as
/// (public_key | signature_scheme_id).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AccountAuthenticator {
    /// Single signature
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    /// K-of-N multisignature
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    SingleKey {
        authenticator: SingleKeyAuthenticator,
    },
    MultiKey {
        authenticator: MultiKeyAuthenticator,
    },
    /// Placeholder for a signer that has not signed, e.g. a fee payer during simulation.
    NoAccountAuthenticator,
}

impl AccountAuthenticator {
    /// Unique identifier for the signature scheme
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Ed25519 { .. } => Scheme::Ed25519,
            Self::MultiEd25519 { .. } => Scheme::MultiEd25519,
            Self::SingleKey { .. } => Scheme::SingleKey,
            Self::MultiKey { .. } => Scheme::MultiKey,
            Self::NoAccountAuthenticator => Scheme::NoScheme,
        }
    }

    /// Create a single-signature ed25519 authenticator
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Create a multisignature ed25519 authenticator
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    pub fn single_key(authenticator: SingleKeyAuthenticator) -> Self {
        Self::SingleKey { authenticator }
    }

    pub fn multi_key(authenticator: MultiKeyAuthenticator) -> Self {
        Self::MultiKey { authenticator }
    }

    /// Returns `true` if the signature is valid for `message`. Never true for
    /// `NoAccountAuthenticator`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => signature.verify_arbitrary_msg(message, public_key).is_ok(),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => signature.verify_arbitrary_msg(message, public_key).is_ok(),
            Self::SingleKey { authenticator } => authenticator.verify(message),
            Self::MultiKey { authenticator } => authenticator.verify(message),
            Self::NoAccountAuthenticator => false,
        }
    }

    /// Return the raw bytes of `self.public_key`
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519 { public_key, .. } => public_key.to_bytes().to_vec(),
            Self::MultiEd25519 { public_key, .. } => public_key.to_bytes(),
            Self::SingleKey { authenticator } => authenticator.public_key.to_bytes(),
            Self::MultiKey { authenticator } => authenticator.public_keys.to_bytes(),
            Self::NoAccountAuthenticator => vec![],
        }
    }

    /// Return the raw bytes of `self.signature`
    pub fn signature_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519 { signature, .. } => signature.to_bytes().to_vec(),
            Self::MultiEd25519 { signature, .. } => signature.to_bytes(),
            Self::SingleKey { authenticator } => {
                aptos_bcs::to_bytes(&authenticator.signature).unwrap_or_default()
            }
            Self::MultiKey { authenticator } => {
                aptos_bcs::to_bytes(&authenticator.signatures).unwrap_or_default()
            }
            Self::NoAccountAuthenticator => vec![],
        }
    }

    /// Return an authentication key preimage derived from `self`'s public key and scheme id
    pub fn authentication_key_preimage(&self) -> Option<AuthenticationKeyPreimage> {
        match self {
            Self::NoAccountAuthenticator => None,
            _ => Some(AuthenticationKeyPreimage::new(
                self.public_key_bytes(),
                self.scheme(),
            )),
        }
    }

    /// Return an authentication key derived from `self`'s public key and scheme id
    pub fn authentication_key(&self) -> Option<AuthenticationKey> {
        self.authentication_key_preimage()
            .map(|preimage| AuthenticationKey::new(*HashValue::sha3_256_of(&preimage.0).as_ref()))
    }

    /// Return the number of signatures included in this account authenticator.
    pub fn number_of_signatures(&self) -> usize {
        match self {
            Self::Ed25519 { .. } => 1,
            Self::MultiEd25519 { signature, .. } => signature.signatures().len(),
            Self::SingleKey { .. } => 1,
            Self::MultiKey { authenticator } => authenticator.signatures.signatures().len(),
            Self::NoAccountAuthenticator => 0,
        }
    }

    /// The same authenticator with a zero signature of the same shape, for simulation.
    pub fn simulation(&self) -> Self {
        match self {
            Self::Ed25519 { public_key, .. } => {
                Self::ed25519(public_key.clone(), Ed25519Signature::dummy_signature())
            }
            Self::MultiEd25519 { public_key, .. } => Self::multi_ed25519(
                public_key.clone(),
                MultiEd25519Signature::dummy(public_key),
            ),
            Self::SingleKey { authenticator } => Self::single_key(SingleKeyAuthenticator::new(
                authenticator.public_key.clone(),
                AnySignature::simulation_for(&authenticator.public_key),
            )),
            Self::MultiKey { authenticator } => Self::multi_key(MultiKeyAuthenticator::new(
                authenticator.public_keys.clone(),
                MultiKeySignature::dummy(&authenticator.public_keys),
            )),
            Self::NoAccountAuthenticator => Self::NoAccountAuthenticator,
        }
    }
}

impl fmt::Display for AccountAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccountAuthenticator[scheme id: {:?}, public key: {}, signature: {}]",
            self.scheme(),
            hex::encode(self.public_key_bytes()),
            hex::encode(self.signature_bytes())
        )
    }
}

impl CanonicalSerialize for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer
                    .encode_variant_index(0)
                    .encode_struct(public_key)
                    .encode_struct(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer
                    .encode_variant_index(1)
                    .encode_struct(public_key)
                    .encode_struct(signature);
            }
            Self::SingleKey { authenticator } => {
                serializer
                    .encode_variant_index(2)
                    .encode_struct(&authenticator.public_key)
                    .encode_struct(&authenticator.signature);
            }
            Self::MultiKey { authenticator } => {
                serializer
                    .encode_variant_index(3)
                    .encode_struct(&authenticator.public_keys)
                    .encode_struct(&authenticator.signatures);
            }
            Self::NoAccountAuthenticator => {
                serializer.encode_variant_index(4);
            }
        }
    }
}

impl CanonicalDeserialize for AccountAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        Ok(match deserializer.decode_variant_index() {
            0 => Self::ed25519(deserializer.decode_struct()?, deserializer.decode_struct()?),
            1 => Self::multi_ed25519(deserializer.decode_struct()?, deserializer.decode_struct()?),
            2 => Self::single_key(SingleKeyAuthenticator::new(
                deserializer.decode_struct()?,
                deserializer.decode_struct()?,
            )),
            3 => Self::multi_key(MultiKeyAuthenticator::new(
                deserializer.decode_struct()?,
                deserializer.decode_struct()?,
            )),
            4 => {
                deserializer.check()?;
                Self::NoAccountAuthenticator
            }
            index => {
                deserializer.check()?;
                return Err(aptos_bcs::Error::unknown_variant(
                    "AccountAuthenticator",
                    index,
                ));
            }
        })
    }
}

/// A struct that represents an account authentication key. A new account's address equals the
/// authentication key used to create it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AuthenticationKey([u8; AuthenticationKey::LENGTH]);

impl AuthenticationKey {
    /// Create an authentication key from `bytes`
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Return an authentication key that is impossible (in expectation) to sign for--useful for
    /// intentionally relinquishing control of an account.
    pub const fn zero() -> Self {
        Self([0; 32])
    }

    /// The number of bytes in an authentication key.
    pub const LENGTH: usize = 32;

    /// Create an authentication key from a preimage by appending the scheme byte and taking the
    /// sha3 hash.
    pub fn from_preimage(mut public_key_bytes: Vec<u8>, scheme: Scheme) -> AuthenticationKey {
        public_key_bytes.push(scheme as u8);
        AuthenticationKey::new(*HashValue::sha3_256_of(&public_key_bytes).as_ref())
    }

    /// Create an authentication key from an Ed25519 public key
    pub fn ed25519(public_key: &Ed25519PublicKey) -> AuthenticationKey {
        Self::from_preimage(public_key.to_bytes().to_vec(), Scheme::Ed25519)
    }

    /// Create an authentication key from a MultiEd25519 public key
    pub fn multi_ed25519(public_key: &MultiEd25519PublicKey) -> Self {
        Self::from_preimage(public_key.to_bytes(), Scheme::MultiEd25519)
    }

    /// Create an authentication key for a single key of any scheme
    pub fn any_key(public_key: &AnyPublicKey) -> Self {
        Self::from_preimage(public_key.to_bytes(), Scheme::SingleKey)
    }

    /// Create an authentication key for a multi-key account
    pub fn multi_key(public_keys: &MultiKey) -> Self {
        Self::from_preimage(public_keys.to_bytes(), Scheme::MultiKey)
    }

    /// The address of an account created with this authentication key.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }

    /// Construct a vector from this authentication key
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Create a random authentication key. For testing only
    pub fn random() -> Self {
        let mut rng = OsRng;
        let buf: [u8; Self::LENGTH] = rng.gen();
        AuthenticationKey::new(buf)
    }
}

impl ValidCryptoMaterial for AuthenticationKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

/// A value that can be hashed to produce an authentication key
pub struct AuthenticationKeyPreimage(Vec<u8>);

impl AuthenticationKeyPreimage {
    /// Return bytes for (public_key | scheme_id)
    fn new(mut public_key_bytes: Vec<u8>, scheme: Scheme) -> Self {
        public_key_bytes.push(scheme as u8);
        Self(public_key_bytes)
    }

    /// Construct a preimage from an Ed25519 public key
    pub fn ed25519(public_key: &Ed25519PublicKey) -> AuthenticationKeyPreimage {
        Self::new(public_key.to_bytes().to_vec(), Scheme::Ed25519)
    }

    /// Construct a preimage from a MultiEd25519 public key
    pub fn multi_ed25519(public_key: &MultiEd25519PublicKey) -> AuthenticationKeyPreimage {
        Self::new(public_key.to_bytes(), Scheme::MultiEd25519)
    }

    /// Construct a vector from this authentication key
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl TryFrom<&[u8]> for AuthenticationKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> std::result::Result<AuthenticationKey, CryptoMaterialError> {
        if bytes.len() != Self::LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let mut addr = [0u8; Self::LENGTH];
        addr.copy_from_slice(bytes);
        Ok(AuthenticationKey(addr))
    }
}

impl TryFrom<Vec<u8>> for AuthenticationKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: Vec<u8>) -> std::result::Result<AuthenticationKey, CryptoMaterialError> {
        AuthenticationKey::try_from(&bytes[..])
    }
}

impl FromStr for AuthenticationKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ensure!(
            !s.is_empty(),
            "authentication key string should not be empty.",
        );
        let bytes_out = ::hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        let key = AuthenticationKey::try_from(bytes_out.as_slice())?;
        Ok(key)
    }
}

impl AsRef<[u8]> for AuthenticationKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::LowerHex for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        // Forward to the LowerHex impl with a "0x" prepended (the # flag).
        write!(f, "{:#x}", self)
    }
}

impl CanonicalSerialize for AuthenticationKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_bytes(&self.0);
    }
}

impl CanonicalDeserialize for AuthenticationKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let bytes = deserializer.decode_bytes();
        deserializer.check()?;
        AuthenticationKey::try_from(bytes).map_err(aptos_bcs::Error::custom)
    }
}
