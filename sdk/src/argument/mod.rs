// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversion of user supplied values into the BCS bytes of Move function arguments.
//!
//! Values are given as [`Arg`]s and checked against the declared Move type of the parameter:
//! integers are range checked, strings are parsed where the type calls for it and the
//! framework `String`, `Object<T>` and `Option<T>` structs get their natural representations.

mod abi;
mod convert;

pub use abi::{
    EntryFunctionAbi, MoveFunction, MoveFunctionGenericTypeParam, MoveModule, ViewFunction,
    ViewFunctionAbi,
};
pub use convert::convert_arg;

use crate::{Error, Result};
use aptos_bcs::{I256, U256};
use aptos_types::account_address::AccountAddress;
use num_bigint::{BigInt, Sign};

/// A Move argument before it is matched against its parameter type.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Address(AccountAddress),
    Seq(Vec<Arg>),
    /// An explicit `Option` value, as the REST API renders it (`{"vec": [..]}`).
    Option(Option<Box<Arg>>),
}

impl Arg {
    pub fn bytes<T: Into<Vec<u8>>>(bytes: T) -> Self {
        Arg::Bytes(bytes.into())
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Bool(_) => "bool",
            Arg::Int(_) => "integer",
            Arg::Float(_) => "float",
            Arg::String(_) => "string",
            Arg::Bytes(_) => "bytes",
            Arg::Address(_) => "address",
            Arg::Seq(_) => "sequence",
            Arg::Option(_) => "option",
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl From<U256> for Arg {
    fn from(value: U256) -> Self {
        Arg::Int(BigInt::from_bytes_le(Sign::Plus, &value.to_le_bytes()))
    }
}

impl From<I256> for Arg {
    fn from(value: I256) -> Self {
        Arg::Int(BigInt::from_signed_bytes_le(&value.to_le_bytes()))
    }
}

impl From<BigInt> for Arg {
    fn from(value: BigInt) -> Self {
        Arg::Int(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::String(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::String(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

impl From<AccountAddress> for Arg {
    fn from(value: AccountAddress) -> Self {
        Arg::Address(value)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Arg::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// JSON values as the REST API renders Move values. An `Option` appears as `{"vec": [..]}` with
/// at most one element; other objects have no argument form.
impl TryFrom<&serde_json::Value> for Arg {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => Arg::Null,
            Value::Bool(b) => Arg::Bool(*b),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Arg::from(v)
                } else if let Some(v) = n.as_i64() {
                    Arg::from(v)
                } else {
                    Arg::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Arg::String(s.clone()),
            Value::Array(items) => Arg::Seq(
                items
                    .iter()
                    .map(Arg::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(fields) => match (fields.len(), fields.get("vec")) {
                (1, Some(Value::Array(items))) if items.len() <= 1 => Arg::Option(
                    items
                        .first()
                        .map(Arg::try_from)
                        .transpose()?
                        .map(Box::new),
                ),
                _ => return Err(Error::value(format!("unsupported JSON argument {}", value))),
            },
        })
    }
}

impl TryFrom<serde_json::Value> for Arg {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Arg::try_from(&value)
    }
}
