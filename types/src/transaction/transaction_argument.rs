// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::account_address::AccountAddress;
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer, U256};
use std::fmt;

/// A typed argument of a script payload.
#[derive(Clone, Hash, Eq, PartialEq)]
pub enum TransactionArgument {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(AccountAddress),
    U8Vector(Vec<u8>),
    Bool(bool),
}

impl fmt::Debug for TransactionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionArgument::U8(value) => write!(f, "{{U8: {}}}", value),
            TransactionArgument::U16(value) => write!(f, "{{U16: {}}}", value),
            TransactionArgument::U32(value) => write!(f, "{{U32: {}}}", value),
            TransactionArgument::U64(value) => write!(f, "{{U64: {}}}", value),
            TransactionArgument::U128(value) => write!(f, "{{U128: {}}}", value),
            TransactionArgument::U256(value) => write!(f, "{{U256: {}}}", value),
            TransactionArgument::Bool(boolean) => write!(f, "{{BOOL: {}}}", boolean),
            TransactionArgument::Address(address) => write!(f, "{{ADDRESS: {:?}}}", address),
            TransactionArgument::U8Vector(vector) => {
                write!(f, "{{U8Vector: 0x{}}}", hex::encode(vector))
            }
        }
    }
}

impl CanonicalSerialize for TransactionArgument {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            TransactionArgument::U8(value) => serializer.encode_variant_index(0).encode_u8(*value),
            TransactionArgument::U64(value) => {
                serializer.encode_variant_index(1).encode_u64(*value)
            }
            TransactionArgument::U128(value) => {
                serializer.encode_variant_index(2).encode_u128(*value)
            }
            TransactionArgument::Address(address) => {
                serializer.encode_variant_index(3).encode_struct(address)
            }
            TransactionArgument::U8Vector(bytes) => {
                serializer.encode_variant_index(4).encode_bytes(bytes)
            }
            TransactionArgument::Bool(value) => {
                serializer.encode_variant_index(5).encode_bool(*value)
            }
            TransactionArgument::U16(value) => {
                serializer.encode_variant_index(6).encode_u16(*value)
            }
            TransactionArgument::U32(value) => {
                serializer.encode_variant_index(7).encode_u32(*value)
            }
            TransactionArgument::U256(value) => {
                serializer.encode_variant_index(8).encode_u256(*value)
            }
        };
    }
}

impl CanonicalDeserialize for TransactionArgument {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let argument = match deserializer.decode_variant_index() {
            0 => TransactionArgument::U8(deserializer.decode_u8()),
            1 => TransactionArgument::U64(deserializer.decode_u64()),
            2 => TransactionArgument::U128(deserializer.decode_u128()),
            3 => TransactionArgument::Address(deserializer.decode_struct()?),
            4 => TransactionArgument::U8Vector(deserializer.decode_bytes()),
            5 => TransactionArgument::Bool(deserializer.decode_bool()),
            6 => TransactionArgument::U16(deserializer.decode_u16()),
            7 => TransactionArgument::U32(deserializer.decode_u32()),
            8 => TransactionArgument::U256(deserializer.decode_u256()),
            index => {
                deserializer.check()?;
                return Err(aptos_bcs::Error::unknown_variant("TransactionArgument", index));
            }
        };
        deserializer.check().map(|_| argument)
    }
}

macro_rules! impl_from_argument {
    ($($type:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$type> for TransactionArgument {
                fn from(value: $type) -> Self {
                    TransactionArgument::$variant(value)
                }
            }
        )*
    };
}

impl_from_argument!(
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    U256 => U256,
    bool => Bool,
    AccountAddress => Address,
    Vec<u8> => U8Vector,
);
