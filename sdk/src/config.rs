// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Result};
use aptos_types::{account_address::AccountAddress, chain_id::ChainId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 100_000;
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 300;

/// Defaults applied to every transaction built by a `TransactionFactory`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransactionConfig {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    /// Seconds from the time of building until the transaction expires.
    pub expiration_seconds: u64,
    /// Fetched from the transport when absent.
    pub chain_id: Option<ChainId>,
}

impl Default for TransactionConfig {
    fn default() -> TransactionConfig {
        TransactionConfig {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
            chain_id: None,
        }
    }
}

impl TransactionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::config)
    }

    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

/// A per-transaction override of the configured defaults. When the same option is given more
/// than once the last one wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionOption {
    MaxGasAmount(u64),
    GasUnitPrice(u64),
    ExpirationSeconds(u64),
    /// Skips fetching the sender's sequence number.
    SequenceNumber(u64),
    /// Skips fetching the chain id.
    ChainId(ChainId),
    /// Turns the transaction into a fee payer transaction. `AccountAddress::ZERO` leaves the fee
    /// payer to be decided after the sender has signed.
    FeePayer(AccountAddress),
    /// Turns the transaction into a multi-agent transaction.
    AdditionalSigners(Vec<AccountAddress>),
}

/// Options of the typed argument marshaller.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentOptions {
    /// Lets an `Option<T>` argument be given as hex of the already BCS encoded `T`.
    pub compatibility_mode: bool,
}
