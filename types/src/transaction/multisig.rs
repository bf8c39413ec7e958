// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{account_address::AccountAddress, transaction::script::EntryFunction};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};

/// A transaction executed on behalf of an on-chain multisig account.
///
/// The payload may be omitted when it was stored on chain at proposal time; only its hash is
/// checked at execution.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Multisig {
    pub multisig_address: AccountAddress,
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum MultisigTransactionPayload {
    EntryFunction(EntryFunction),
}

impl CanonicalSerialize for Multisig {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.multisig_address)
            .encode_optional(&self.transaction_payload);
    }
}

impl CanonicalDeserialize for Multisig {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let multisig_address = deserializer.decode_struct()?;
        let transaction_payload = deserializer.decode_optional()?;
        Ok(Multisig {
            multisig_address,
            transaction_payload,
        })
    }
}

impl CanonicalSerialize for MultisigTransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            MultisigTransactionPayload::EntryFunction(entry_function) => {
                serializer
                    .encode_variant_index(0)
                    .encode_struct(entry_function);
            }
        }
    }
}

impl CanonicalDeserialize for MultisigTransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        match deserializer.decode_variant_index() {
            0 => Ok(MultisigTransactionPayload::EntryFunction(
                deserializer.decode_struct()?,
            )),
            index => {
                deserializer.check()?;
                Err(aptos_bcs::Error::unknown_variant(
                    "MultisigTransactionPayload",
                    index,
                ))
            }
        }
    }
}
