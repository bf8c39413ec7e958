// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! 32-byte account addresses and their textual forms.
//!
//! An address has a *long* form (`0x` followed by exactly 64 hex characters) and a *short* form
//! (`0x` followed by the hex digits left after stripping leading zeros, `0x0` for zero). The
//! *standard* form used by `Display` follows AIP-40: special addresses `0x0`..`0xf` are written
//! short, every other address long.

use crate::transaction::authenticator::{AuthenticationKey, Scheme};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use rand::{rngs::OsRng, Rng};
use serde::{de::Error as _, Deserialize, Deserializer as SerdeDeserializer, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A struct that represents an account address.
#[derive(Ord, PartialOrd, Eq, PartialEq, Hash, Default, Clone, Copy)]
pub struct AccountAddress([u8; AccountAddress::LENGTH]);

impl AccountAddress {
    /// The number of bytes in an address.
    pub const LENGTH: usize = 32;

    /// `0x0`
    pub const ZERO: Self = Self::from_suffix(0);
    /// `0x1`, the core framework address.
    pub const ONE: Self = Self::from_suffix(1);
    /// `0x2`
    pub const TWO: Self = Self::from_suffix(2);
    /// `0x3`, the token address.
    pub const THREE: Self = Self::from_suffix(3);
    /// `0x4`, the digital asset address.
    pub const FOUR: Self = Self::from_suffix(4);

    pub const fn new(address: [u8; Self::LENGTH]) -> Self {
        Self(address)
    }

    const fn from_suffix(last: u8) -> Self {
        let mut address = [0u8; Self::LENGTH];
        address[Self::LENGTH - 1] = last;
        Self(address)
    }

    pub fn random() -> Self {
        let mut rng = OsRng;
        let buf: [u8; Self::LENGTH] = rng.gen();
        Self::new(buf)
    }

    /// Addresses `0x0` through `0xf`.
    pub fn is_special(&self) -> bool {
        self.0[..Self::LENGTH - 1].iter().all(|byte| *byte == 0) && self.0[Self::LENGTH - 1] < 0x10
    }

    /// Hex without `0x` and without leading zeros; `0` for the zero address.
    pub fn short_str_lossless(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// `0x` followed by the short form, e.g. `0x1` or `0xa550c18`.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", self.short_str_lossless())
    }

    /// `0x` followed by all 64 hex characters.
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The AIP-40 form: short for special addresses, long otherwise.
    pub fn to_standard_string(&self) -> String {
        if self.is_special() {
            self.to_hex_literal()
        } else {
            self.to_long_string()
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn into_bytes(self) -> [u8; Self::LENGTH] {
        self.0
    }

    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, AccountAddressParseError> {
        <[u8; Self::LENGTH]>::try_from(bytes.as_ref())
            .map(Self)
            .map_err(|_| AccountAddressParseError::WrongLength(bytes.as_ref().len()))
    }

    /// Parses a `0x`-prefixed hex literal of 1 to 64 digits, left-padding with zeros.
    pub fn from_hex_literal(literal: &str) -> Result<Self, AccountAddressParseError> {
        match literal.strip_prefix("0x") {
            Some(hex) => Self::from_hex_digits(hex),
            None => Err(AccountAddressParseError::LeadingZeroXRequired),
        }
    }

    /// Parses exactly 64 hex digits without a prefix.
    pub fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, AccountAddressParseError> {
        let mut address = [0u8; Self::LENGTH];
        hex::decode_to_slice(hex.as_ref(), &mut address)
            .map_err(|_| AccountAddressParseError::InvalidHexChars)?;
        Ok(Self(address))
    }

    /// Relaxed parsing: an optional `0x` (or `0X`) followed by 1 to 64 hex digits.
    pub fn from_str_relaxed(s: &str) -> Result<Self, AccountAddressParseError> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        Self::from_hex_digits(hex)
    }

    /// Strict AIP-40 parsing: `0x` and the long form, except that special addresses may use a
    /// single hex digit.
    pub fn from_str_strict(s: &str) -> Result<Self, AccountAddressParseError> {
        let hex = s
            .strip_prefix("0x")
            .ok_or(AccountAddressParseError::LeadingZeroXRequired)?;
        if hex.len() == 2 * Self::LENGTH {
            return Self::from_hex(hex);
        }
        let address = Self::from_hex_digits(hex)?;
        if address.is_special() && hex.len() == 1 {
            Ok(address)
        } else {
            Err(AccountAddressParseError::LongFormRequiredUnlessSpecial)
        }
    }

    fn from_hex_digits(hex: &str) -> Result<Self, AccountAddressParseError> {
        if hex.is_empty() {
            return Err(AccountAddressParseError::TooShort);
        }
        if hex.len() > 2 * Self::LENGTH {
            return Err(AccountAddressParseError::TooLong(hex.len()));
        }
        let padded = format!("{:0>width$}", hex, width = 2 * Self::LENGTH);
        Self::from_hex(padded)
    }

    /// Address of an object created by `creator` from a GUID creation number.
    pub fn object_from_guid(creator: &AccountAddress, creation_num: u64) -> Self {
        // BCS of the framework's `ID { creation_num, addr }`.
        let mut preimage = creation_num.to_le_bytes().to_vec();
        preimage.extend_from_slice(creator.as_ref());
        AuthenticationKey::from_preimage(preimage, Scheme::DeriveObjectAddressFromGuid)
            .account_address()
    }

    /// Address of a named object created by `creator` from `seed`.
    pub fn object_from_seed(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive(creator, seed, Scheme::DeriveObjectAddressFromSeed)
    }

    /// Address of an object derived from another object owned by `creator`.
    pub fn object_from_object(creator: &AccountAddress, object: &AccountAddress) -> Self {
        Self::derive(creator, object.as_ref(), Scheme::DeriveObjectAddressFromObject)
    }

    /// Address of a resource account created by `creator` from `seed`.
    pub fn resource_account(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive(creator, seed, Scheme::DeriveResourceAccountAddress)
    }

    fn derive(creator: &AccountAddress, data: &[u8], scheme: Scheme) -> Self {
        let mut preimage = creator.to_vec();
        preimage.extend_from_slice(data);
        AuthenticationKey::from_preimage(preimage, scheme).account_address()
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for AccountAddress {
    type Target = [u8; Self::LENGTH];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_standard_string())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::LowerHex for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; AccountAddress::LENGTH]> for AccountAddress {
    fn from(bytes: [u8; AccountAddress::LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl TryFrom<&[u8]> for AccountAddress {
    type Error = AccountAddressParseError;

    /// Tries to convert the provided byte array into Address.
    fn try_from(bytes: &[u8]) -> Result<AccountAddress, AccountAddressParseError> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for AccountAddress {
    type Error = AccountAddressParseError;

    fn try_from(bytes: Vec<u8>) -> Result<AccountAddress, AccountAddressParseError> {
        Self::from_bytes(bytes)
    }
}

impl From<AccountAddress> for Vec<u8> {
    fn from(addr: AccountAddress) -> Vec<u8> {
        addr.0.to_vec()
    }
}

impl From<&AccountAddress> for String {
    fn from(addr: &AccountAddress) -> String {
        addr.to_standard_string()
    }
}

impl FromStr for AccountAddress {
    type Err = AccountAddressParseError;

    /// Parsing is relaxed; use [`AccountAddress::from_str_strict`] to enforce AIP-40.
    fn from_str(s: &str) -> Result<Self, AccountAddressParseError> {
        Self::from_str_relaxed(s)
    }
}

/// Errors raised while parsing an [`AccountAddress`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AccountAddressParseError {
    #[error("address must start with 0x")]
    LeadingZeroXRequired,
    #[error("address has no hex digits")]
    TooShort,
    #[error("address has {0} hex digits, at most 64 are allowed")]
    TooLong(usize),
    #[error("address contains invalid hex characters")]
    InvalidHexChars,
    #[error("address must be {} bytes, found {0}", AccountAddress::LENGTH)]
    WrongLength(usize),
    #[error("only special addresses 0x0 to 0xf may use the short form")]
    LongFormRequiredUnlessSpecial,
}

/// Addresses are written as 32 raw bytes.
impl CanonicalSerialize for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_fixed_bytes(&self.0);
    }
}

impl CanonicalDeserialize for AccountAddress {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let address = deserializer.decode_array();
        deserializer.check().map(|_| Self(address))
    }
}

// JSON payloads (REST responses, module ABIs) carry addresses as strings.
impl Serialize for AccountAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_standard_string())
        } else {
            Serialize::serialize(&self.0, serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: SerdeDeserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <String as Deserialize>::deserialize(deserializer)?;
            AccountAddress::from_str_relaxed(&s).map_err(D::Error::custom)
        } else {
            <[u8; AccountAddress::LENGTH] as Deserialize>::deserialize(deserializer).map(Self)
        }
    }
}

#[cfg(any(test, feature = "fuzzing"))]
impl proptest::arbitrary::Arbitrary for AccountAddress {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        prop_oneof![
            (0u8..0x10).prop_map(Self::from_suffix),
            any::<[u8; AccountAddress::LENGTH]>().prop_map(Self::new),
        ]
        .boxed()
    }
}
