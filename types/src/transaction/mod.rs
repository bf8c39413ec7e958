// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    account_address::AccountAddress,
    chain_id::ChainId,
    transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator},
};
use anyhow::Result;
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use aptos_crypto::{
    ed25519::{Ed25519PublicKey, Ed25519Signature},
    hash::{hash_prefix, DefaultHasher},
    multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature},
    HashValue,
};
use once_cell::sync::Lazy;
use std::{fmt, ops::Deref, time::Duration};

pub mod any_key;
pub mod authenticator;
mod helpers;
pub mod multi_key;
mod multisig;
mod script;
mod transaction_argument;

pub use helpers::TransactionSigner;
pub use multisig::{Multisig, MultisigTransactionPayload};
pub use script::{EntryFunction, Script};
pub use transaction_argument::TransactionArgument;

static RAW_TRANSACTION_PREFIX: Lazy<HashValue> = Lazy::new(|| hash_prefix(b"RawTransaction"));
static RAW_TRANSACTION_WITH_DATA_PREFIX: Lazy<HashValue> =
    Lazy::new(|| hash_prefix(b"RawTransactionWithData"));
static TRANSACTION_PREFIX: Lazy<HashValue> = Lazy::new(|| hash_prefix(b"Transaction"));

/// Concatenates the domain prefix of a signed type with the BCS encoding of the value. This is
/// the exact byte string every signer signs; it is not hashed again here.
fn signing_message<T: CanonicalSerialize>(prefix: &HashValue, value: &T) -> Result<Vec<u8>> {
    let mut message = prefix.to_vec();
    message.extend(aptos_bcs::to_bytes(value)?);
    Ok(message)
}

/// RawTransaction is the portion of a transaction that a client signs.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct RawTransaction {
    /// Sender's address.
    sender: AccountAddress,

    /// Sequence number of this transaction. This must match the sequence number
    /// stored in the sender's account at the time the transaction executes.
    sequence_number: u64,

    /// The transaction payload, e.g., a script to execute.
    payload: TransactionPayload,

    /// Maximal total gas to spend for this transaction.
    max_gas_amount: u64,

    /// Price to be paid per gas unit.
    gas_unit_price: u64,

    /// Expiration timestamp for this transaction, represented
    /// as seconds from the Unix Epoch. If the current blockchain timestamp
    /// is greater than or equal to this time, then the transaction has
    /// expired and will be discarded. This can be set to a large value far
    /// in the future to indicate that a transaction does not expire.
    expiration_timestamp_secs: u64,

    /// Chain ID of the Aptos network this transaction is intended for.
    chain_id: ChainId,
}

impl RawTransaction {
    /// Create a new `RawTransaction` with a payload.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Create a new `RawTransaction` with a script.
    pub fn new_script(
        sender: AccountAddress,
        sequence_number: u64,
        script: Script,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::Script(script),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    /// Create a new `RawTransaction` calling an entry function.
    pub fn new_entry_function(
        sender: AccountAddress,
        sequence_number: u64,
        entry_function: EntryFunction,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::EntryFunction(entry_function),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    pub fn sender(&self) -> AccountAddress {
        self.sender
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    pub fn into_payload(self) -> TransactionPayload {
        self.payload
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    pub fn gas_unit_price(&self) -> u64 {
        self.gas_unit_price
    }

    pub fn expiration_timestamp_secs(&self) -> u64 {
        self.expiration_timestamp_secs
    }

    pub fn expiration_time(&self) -> Duration {
        Duration::from_secs(self.expiration_timestamp_secs)
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The bytes a single sender signs: the `RawTransaction` domain prefix followed by the BCS
    /// encoding of `self`.
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        signing_message(&RAW_TRANSACTION_PREFIX, self)
    }

    /// Signs the given `RawTransaction`. Note that this consumes the `RawTransaction` and turns it
    /// into a `SignatureCheckedTransaction`.
    ///
    /// For a transaction that has just been signed, its signature is expected to be valid.
    pub fn sign<S: TransactionSigner + ?Sized>(
        self,
        signer: &S,
    ) -> Result<SignatureCheckedTransaction> {
        let authenticator = signer.sign_message(&self.signing_message()?)?;
        Ok(SignatureCheckedTransaction(SignedTransaction::new(
            self,
            authenticator,
        )))
    }

    pub fn raw_txn_bytes_len(&self) -> usize {
        aptos_bcs::to_bytes(self).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

impl CanonicalSerialize for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.sender)
            .encode_u64(self.sequence_number)
            .encode_struct(&self.payload)
            .encode_u64(self.max_gas_amount)
            .encode_u64(self.gas_unit_price)
            .encode_u64(self.expiration_timestamp_secs)
            .encode_struct(&self.chain_id);
    }
}

impl CanonicalDeserialize for RawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let sender = deserializer.decode_struct()?;
        let sequence_number = deserializer.decode_u64();
        let payload = deserializer.decode_struct()?;
        let max_gas_amount = deserializer.decode_u64();
        let gas_unit_price = deserializer.decode_u64();
        let expiration_timestamp_secs = deserializer.decode_u64();
        let chain_id = deserializer.decode_struct()?;
        deserializer.check()?;
        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        ))
    }
}

/// Different kinds of transactions.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TransactionPayload {
    /// A transaction that executes code.
    Script(Script),
    /// Module bundles are no longer accepted by the network. The variant keeps its wire slot
    /// and can be neither encoded nor decoded.
    ModuleBundle,
    /// A transaction that executes an existing entry function published on-chain.
    EntryFunction(EntryFunction),
    /// A multisig transaction that allows an owner of a multisig account to execute a
    /// pre-approved transaction as the multisig account.
    Multisig(Multisig),
}

impl CanonicalSerialize for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            TransactionPayload::Script(script) => {
                serializer.encode_variant_index(0).encode_struct(script);
            }
            TransactionPayload::ModuleBundle => {
                serializer.set_error(aptos_bcs::Error::custom(
                    "Module bundle payloads are deprecated",
                ));
            }
            TransactionPayload::EntryFunction(entry_function) => {
                serializer
                    .encode_variant_index(2)
                    .encode_struct(entry_function);
            }
            TransactionPayload::Multisig(multisig) => {
                serializer.encode_variant_index(3).encode_struct(multisig);
            }
        }
    }
}

impl CanonicalDeserialize for TransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        match deserializer.decode_variant_index() {
            0 => Ok(TransactionPayload::Script(deserializer.decode_struct()?)),
            2 => Ok(TransactionPayload::EntryFunction(
                deserializer.decode_struct()?,
            )),
            3 => Ok(TransactionPayload::Multisig(deserializer.decode_struct()?)),
            1 => {
                deserializer.check()?;
                Err(aptos_bcs::Error::custom(
                    "Module bundle payloads are deprecated",
                ))
            }
            index => {
                deserializer.check()?;
                Err(aptos_bcs::Error::unknown_variant(
                    "TransactionPayload",
                    index,
                ))
            }
        }
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry_function)
    }
}

impl From<Multisig> for TransactionPayload {
    fn from(multisig: Multisig) -> Self {
        TransactionPayload::Multisig(multisig)
    }
}

/// A raw transaction together with the additional signers every participant commits to. Its
/// signing message is what secondary signers and fee payers sign.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum RawTransactionWithData {
    MultiAgent {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    MultiAgentWithFeePayer {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        Self::MultiAgent {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    ) -> Self {
        Self::MultiAgentWithFeePayer {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        }
    }

    pub fn raw_txn(&self) -> &RawTransaction {
        match self {
            Self::MultiAgent { raw_txn, .. } | Self::MultiAgentWithFeePayer { raw_txn, .. } => {
                raw_txn
            }
        }
    }

    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::MultiAgentWithFeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::MultiAgent { .. } => None,
            Self::MultiAgentWithFeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
        }
    }

    /// The bytes every participant signs: the `RawTransactionWithData` domain prefix followed by
    /// the BCS encoding of `self`.
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        signing_message(&RAW_TRANSACTION_WITH_DATA_PREFIX, self)
    }

    /// Produces the account authenticator of one participant.
    pub fn sign<S: TransactionSigner + ?Sized>(&self, signer: &S) -> Result<AccountAuthenticator> {
        signer.sign_message(&self.signing_message()?)
    }
}

impl CanonicalSerialize for RawTransactionWithData {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                serializer
                    .encode_variant_index(0)
                    .encode_struct(raw_txn)
                    .encode_vec(secondary_signer_addresses);
            }
            Self::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                serializer
                    .encode_variant_index(1)
                    .encode_struct(raw_txn)
                    .encode_vec(secondary_signer_addresses)
                    .encode_struct(fee_payer_address);
            }
        }
    }
}

impl CanonicalDeserialize for RawTransactionWithData {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        match deserializer.decode_variant_index() {
            0 => Ok(Self::new_multi_agent(
                deserializer.decode_struct()?,
                deserializer.decode_vec()?,
            )),
            1 => Ok(Self::new_fee_payer(
                deserializer.decode_struct()?,
                deserializer.decode_vec()?,
                deserializer.decode_struct()?,
            )),
            index => {
                deserializer.check()?;
                Err(aptos_bcs::Error::unknown_variant(
                    "RawTransactionWithData",
                    index,
                ))
            }
        }
    }
}

/// A transaction that has been signed.
///
/// A `SignedTransaction` is a single transaction that can be atomically executed. Clients submit
/// these to validator nodes, and the validator and executor submits these to the VM.
///
/// **IMPORTANT:** The signature of a `SignedTransaction` is not guaranteed to be verified. For a
/// transaction whose signature is statically guaranteed to be verified, see
/// [`SignatureCheckedTransaction`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SignedTransaction {
    /// The raw transaction
    raw_txn: RawTransaction,

    /// Public key and signature to authenticate
    authenticator: TransactionAuthenticator,
}

/// A transaction for which the signature has been verified. Created by
/// [`SignedTransaction::check_signature`] and [`RawTransaction::sign`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SignatureCheckedTransaction(SignedTransaction);

impl SignatureCheckedTransaction {
    /// Returns the `SignedTransaction` within.
    pub fn into_inner(self) -> SignedTransaction {
        self.0
    }

    /// Returns the `RawTransaction` within.
    pub fn into_raw_transaction(self) -> RawTransaction {
        self.0.into_raw_transaction()
    }
}

impl Deref for SignatureCheckedTransaction {
    type Target = SignedTransaction;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SignedTransaction {{ \n \
             {{ raw_txn: {:#?}, \n \
             authenticator: {:#?}, \n \
             }} \n \
             }}",
            self.raw_txn, self.authenticator
        )
    }
}

impl SignedTransaction {
    /// Wraps a single sender's account authenticator. Ed25519 and MultiEd25519 senders keep
    /// their dedicated transaction authenticators; every other scheme is carried as a single
    /// sender.
    pub fn new(raw_txn: RawTransaction, authenticator: AccountAuthenticator) -> SignedTransaction {
        let authenticator = match authenticator {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => TransactionAuthenticator::ed25519(public_key, signature),
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => TransactionAuthenticator::multi_ed25519(public_key, signature),
            sender => TransactionAuthenticator::single_sender(sender),
        };
        Self::new_with_authenticator(raw_txn, authenticator)
    }

    pub fn new_with_authenticator(
        raw_txn: RawTransaction,
        authenticator: TransactionAuthenticator,
    ) -> SignedTransaction {
        SignedTransaction {
            raw_txn,
            authenticator,
        }
    }

    pub fn new_ed25519(
        raw_txn: RawTransaction,
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    ) -> SignedTransaction {
        Self::new_with_authenticator(
            raw_txn,
            TransactionAuthenticator::ed25519(public_key, signature),
        )
    }

    pub fn new_multi_ed25519(
        raw_txn: RawTransaction,
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> SignedTransaction {
        Self::new_with_authenticator(
            raw_txn,
            TransactionAuthenticator::multi_ed25519(public_key, signature),
        )
    }

    pub fn new_single_sender(
        raw_txn: RawTransaction,
        sender: AccountAuthenticator,
    ) -> SignedTransaction {
        Self::new_with_authenticator(raw_txn, TransactionAuthenticator::single_sender(sender))
    }

    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> SignedTransaction {
        Self::new_with_authenticator(
            raw_txn,
            TransactionAuthenticator::multi_agent(
                sender,
                secondary_signer_addresses,
                secondary_signers,
            ),
        )
    }

    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> SignedTransaction {
        Self::new_with_authenticator(
            raw_txn,
            TransactionAuthenticator::fee_payer(
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            ),
        )
    }

    /// The same transaction with every signature replaced by a zero signature, suitable for
    /// the simulation endpoint. The result never verifies.
    pub fn simulation(&self) -> SignedTransaction {
        Self::new_with_authenticator(self.raw_txn.clone(), self.authenticator.simulation())
    }

    pub fn authenticator(&self) -> TransactionAuthenticator {
        self.authenticator.clone()
    }

    pub fn authenticator_ref(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    pub fn raw_transaction_ref(&self) -> &RawTransaction {
        &self.raw_txn
    }

    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    pub fn into_raw_transaction(self) -> RawTransaction {
        self.raw_txn
    }

    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    pub fn chain_id(&self) -> ChainId {
        self.raw_txn.chain_id
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.raw_txn.payload
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.raw_txn.max_gas_amount
    }

    pub fn gas_unit_price(&self) -> u64 {
        self.raw_txn.gas_unit_price
    }

    pub fn expiration_timestamp_secs(&self) -> u64 {
        self.raw_txn.expiration_timestamp_secs
    }

    pub fn raw_txn_bytes_len(&self) -> usize {
        self.raw_txn.raw_txn_bytes_len()
    }

    /// Returns `true` if every signature carried by the authenticator verifies.
    pub fn verify_signature(&self) -> bool {
        self.authenticator.verify(&self.raw_txn)
    }

    /// Checks that the signature of given transaction. Returns `Ok(SignatureCheckedTransaction)` if
    /// the signature is valid.
    pub fn check_signature(self) -> Result<SignatureCheckedTransaction> {
        self.authenticator.check_signatures(&self.raw_txn)?;
        Ok(SignatureCheckedTransaction(self))
    }

    /// The hash the chain records for this transaction once committed: the `Transaction` domain
    /// prefix, the user transaction tag and the BCS encoding of `self`.
    pub fn committed_hash(&self) -> Result<HashValue> {
        let mut hasher = DefaultHasher::with_prefix(&TRANSACTION_PREFIX);
        hasher.update(&[0]);
        hasher.update(&aptos_bcs::to_bytes(self)?);
        Ok(hasher.finish())
    }
}

impl CanonicalSerialize for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.raw_txn)
            .encode_struct(&self.authenticator);
    }
}

impl CanonicalDeserialize for SignedTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let raw_txn = deserializer.decode_struct()?;
        let authenticator = deserializer.decode_struct()?;
        Ok(SignedTransaction::new_with_authenticator(
            raw_txn,
            authenticator,
        ))
    }
}
