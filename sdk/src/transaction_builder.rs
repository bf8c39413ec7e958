// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    config::{TransactionConfig, TransactionOption},
    transport::Transport,
    Error, Result,
};
use aptos_types::{
    account_address::AccountAddress,
    chain_id::ChainId,
    transaction::{
        authenticator::AccountAuthenticator, EntryFunction, RawTransaction,
        RawTransactionWithData, Script, TransactionPayload, TransactionSigner,
    },
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: TransactionPayload,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: u64,
    chain_id: ChainId,
}

impl TransactionBuilder {
    pub fn new(
        payload: TransactionPayload,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender: None,
            sequence_number: None,
            payload,
            max_gas_amount: crate::config::DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: crate::config::DEFAULT_GAS_UNIT_PRICE,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = expiration_timestamp_secs;
        self
    }

    pub fn build(self) -> Result<RawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| Error::config("sender must have been set"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| Error::config("sequence number must have been set"))?;
        Ok(RawTransaction::new(
            sender,
            sequence_number,
            self.payload,
            self.max_gas_amount,
            self.gas_unit_price,
            self.expiration_timestamp_secs,
            self.chain_id,
        ))
    }
}

#[derive(Clone, Debug)]
pub struct TransactionFactory {
    max_gas_amount: u64,
    gas_unit_price: u64,
    transaction_expiration_time: u64,
    chain_id: ChainId,
}

impl TransactionFactory {
    pub fn new(chain_id: ChainId) -> Self {
        Self::from_config(&TransactionConfig::default(), chain_id)
    }

    /// Takes the defaults of `config`; its chain id, when set, wins over `chain_id`.
    pub fn from_config(config: &TransactionConfig, chain_id: ChainId) -> Self {
        Self {
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            transaction_expiration_time: config.expiration_seconds,
            chain_id: config.chain_id.unwrap_or(chain_id),
        }
    }

    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    pub fn with_gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    pub fn with_transaction_expiration_time(mut self, transaction_expiration_time: u64) -> Self {
        self.transaction_expiration_time = transaction_expiration_time;
        self
    }

    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn payload(&self, payload: TransactionPayload) -> Result<TransactionBuilder> {
        Ok(TransactionBuilder {
            sender: None,
            sequence_number: None,
            payload,
            max_gas_amount: self.max_gas_amount,
            gas_unit_price: self.gas_unit_price,
            expiration_timestamp_secs: expiration_timestamp(self.transaction_expiration_time)?,
            chain_id: self.chain_id,
        })
    }

    pub fn entry_function(&self, function: EntryFunction) -> Result<TransactionBuilder> {
        self.payload(TransactionPayload::EntryFunction(function))
    }

    pub fn script(&self, script: Script) -> Result<TransactionBuilder> {
        self.payload(TransactionPayload::Script(script))
    }
}

fn expiration_timestamp(expiration_seconds: u64) -> Result<u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::config("system clock is set before the unix epoch"))?
        .as_secs();
    now.checked_add(expiration_seconds)
        .ok_or_else(|| Error::config("expiration time overflows"))
}

/// A transaction ready to be signed by each of its participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnsignedTransaction {
    /// Signed by the sender alone.
    Raw(RawTransaction),
    /// Multi-agent or fee payer transaction.
    WithData(RawTransactionWithData),
}

impl UnsignedTransaction {
    pub fn raw_txn(&self) -> &RawTransaction {
        match self {
            Self::Raw(raw_txn) => raw_txn,
            Self::WithData(with_data) => with_data.raw_txn(),
        }
    }

    pub fn into_raw_transaction(self) -> RawTransaction {
        match self {
            Self::Raw(raw_txn) => raw_txn,
            Self::WithData(with_data) => with_data.raw_txn().clone(),
        }
    }

    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::Raw(_) => &[],
            Self::WithData(with_data) => with_data.secondary_signer_addresses(),
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::Raw(_) => None,
            Self::WithData(with_data) => with_data.fee_payer_address(),
        }
    }

    pub fn signing_message(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Self::Raw(raw_txn) => raw_txn.signing_message()?,
            Self::WithData(with_data) => with_data.signing_message()?,
        })
    }

    pub fn sign<S: TransactionSigner + ?Sized>(&self, signer: &S) -> Result<AccountAuthenticator> {
        Ok(signer.sign_message(&self.signing_message()?)?)
    }
}

/// Builds a transaction for `sender`, filling in whatever `options` leave open from `config`
/// and, for the sequence number and chain id, from `transport`.
pub async fn build_transaction<T: Transport + ?Sized>(
    transport: &T,
    sender: AccountAddress,
    payload: TransactionPayload,
    config: &TransactionConfig,
    options: &[TransactionOption],
) -> Result<UnsignedTransaction> {
    let mut max_gas_amount = config.max_gas_amount;
    let mut gas_unit_price = config.gas_unit_price;
    let mut expiration_seconds = config.expiration_seconds;
    let mut sequence_number = None;
    let mut chain_id = config.chain_id;
    let mut fee_payer = None;
    let mut secondary_signers = None;
    for option in options {
        match option {
            TransactionOption::MaxGasAmount(amount) => max_gas_amount = *amount,
            TransactionOption::GasUnitPrice(price) => gas_unit_price = *price,
            TransactionOption::ExpirationSeconds(seconds) => expiration_seconds = *seconds,
            TransactionOption::SequenceNumber(number) => sequence_number = Some(*number),
            TransactionOption::ChainId(id) => chain_id = Some(*id),
            TransactionOption::FeePayer(address) => fee_payer = Some(*address),
            TransactionOption::AdditionalSigners(addresses) => {
                secondary_signers = Some(addresses.clone())
            }
        }
    }

    let sequence_number = match sequence_number {
        Some(sequence_number) => sequence_number,
        None => {
            let sequence_number = transport.get_sequence_number(sender).await?;
            trace!(sender = %sender, sequence_number, "fetched sequence number");
            sequence_number
        }
    };
    let chain_id = match chain_id {
        Some(chain_id) => chain_id,
        None => {
            let chain_id = transport.get_chain_id().await?;
            trace!(chain_id = %chain_id, "fetched chain id");
            chain_id
        }
    };

    let raw_txn = RawTransaction::new(
        sender,
        sequence_number,
        payload,
        max_gas_amount,
        gas_unit_price,
        expiration_timestamp(expiration_seconds)?,
        chain_id,
    );
    debug!(
        sender = %sender,
        sequence_number,
        chain_id = %chain_id,
        expiration_timestamp_secs = raw_txn.expiration_timestamp_secs(),
        fee_payer = ?fee_payer,
        "built transaction"
    );

    Ok(match (fee_payer, secondary_signers) {
        (Some(fee_payer), secondary_signers) => {
            UnsignedTransaction::WithData(RawTransactionWithData::new_fee_payer(
                raw_txn,
                secondary_signers.unwrap_or_default(),
                fee_payer,
            ))
        }
        (None, Some(secondary_signers)) => UnsignedTransaction::WithData(
            RawTransactionWithData::new_multi_agent(raw_txn, secondary_signers),
        ),
        (None, None) => UnsignedTransaction::Raw(raw_txn),
    })
}
