// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! This module defines the 32-byte [`HashValue`] and the SHA3-256 hashing helpers used throughout
//! Aptos.
//!
//! Structured data is hashed with a domain separation prefix so that two different kinds of
//! values can never produce the same preimage. The prefix of a type is
//! `SHA3-256("APTOS::" || type_name)`, e.g. the signing message of a raw transaction starts with
//! `SHA3-256("APTOS::RawTransaction")`.
//!
//! ```
//! use aptos_crypto::hash::{DefaultHasher, HashValue};
//!
//! let mut hasher = DefaultHasher::new(b"RawTransaction");
//! hasher.update(&[1, 2, 3]);
//! let digest: HashValue = hasher.finish();
//! assert_ne!(digest, HashValue::sha3_256_of(&[1, 2, 3]));
//! ```

use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use sha3::{Digest, Sha3_256};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Prefix prepended to type names to build domain separation tags.
pub const HASH_PREFIX: &[u8] = b"APTOS::";

/// Output value of our hash function. Intentionally opaque for safety and modularity.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord, Default)]
pub struct HashValue {
    hash: [u8; HashValue::LENGTH],
}

impl HashValue {
    /// The length of the hash in bytes.
    pub const LENGTH: usize = 32;
    /// The length of the hash in bits.
    pub const LENGTH_IN_BITS: usize = Self::LENGTH * 8;

    /// Create a new [`HashValue`] from a byte array.
    pub const fn new(hash: [u8; HashValue::LENGTH]) -> Self {
        HashValue { hash }
    }

    /// Create from a slice (e.g. retrieved from storage).
    pub fn from_slice<T: AsRef<[u8]>>(bytes: T) -> Result<Self, HashValueParseError> {
        <[u8; Self::LENGTH]>::try_from(bytes.as_ref())
            .map_err(|_| HashValueParseError)
            .map(Self::new)
    }

    /// Dumps into a vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    /// Creates a zero-initialized instance.
    pub const fn zero() -> Self {
        HashValue {
            hash: [0; HashValue::LENGTH],
        }
    }

    /// Convenience function that computes a `HashValue` internally equal to
    /// the sha3_256 of a byte buffer. It will handle hasher creation, data
    /// feeding and finalization.
    pub fn sha3_256_of(buffer: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(buffer);
        HashValue::from_digest(hasher)
    }

    fn from_digest(hasher: Sha3_256) -> Self {
        let mut hash = [0u8; HashValue::LENGTH];
        hash.copy_from_slice(&hasher.finalize());
        HashValue { hash }
    }

    /// Full hex representation of a given hash value, without `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Hex representation with `0x` prefix, as used by the REST API.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Parse a given hex string to a hash value. The `0x` prefix is optional.
    pub fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, HashValueParseError> {
        let hex = hex.as_ref();
        let hex = hex.strip_prefix(b"0x").unwrap_or(hex);
        let mut hash = [0u8; HashValue::LENGTH];
        hex::decode_to_slice(hex, &mut hash).map_err(|_| HashValueParseError)?;
        Ok(HashValue { hash })
    }
}

impl AsRef<[u8; HashValue::LENGTH]> for HashValue {
    fn as_ref(&self) -> &[u8; HashValue::LENGTH] {
        &self.hash
    }
}

impl std::ops::Deref for HashValue {
    type Target = [u8; Self::LENGTH];

    fn deref(&self) -> &Self::Target {
        &self.hash
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_literal())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self.to_hex())
    }
}

impl FromStr for HashValue {
    type Err = HashValueParseError;

    fn from_str(s: &str) -> Result<Self, HashValueParseError> {
        HashValue::from_hex(s)
    }
}

/// Hashes are written as fixed 32 bytes, without a length prefix.
impl CanonicalSerialize for HashValue {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_fixed_bytes(&self.hash);
    }
}

impl CanonicalDeserialize for HashValue {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let hash = deserializer.decode_array();
        deserializer.check().map(|_| HashValue { hash })
    }
}

/// Parse error when attempting to construct a HashValue
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("unable to parse HashValue")]
pub struct HashValueParseError;

/// Returns `SHA3-256("APTOS::" || type_name)`, the domain separation prefix of `type_name`.
pub fn hash_prefix(type_name: &[u8]) -> HashValue {
    let mut hasher = Sha3_256::new();
    hasher.update(HASH_PREFIX);
    hasher.update(type_name);
    HashValue::from_digest(hasher)
}

/// SHA3-256 hasher seeded with the domain separation prefix of a type.
#[derive(Clone)]
pub struct DefaultHasher {
    state: Sha3_256,
}

impl DefaultHasher {
    /// Initialize a new hasher whose input starts with the prefix for `type_name`.
    pub fn new(type_name: &[u8]) -> Self {
        Self::with_prefix(&hash_prefix(type_name))
    }

    /// Initialize a new hasher with an already computed prefix.
    pub fn with_prefix(prefix: &HashValue) -> Self {
        let mut state = Sha3_256::new();
        state.update(prefix.as_ref());
        DefaultHasher { state }
    }

    /// Write bytes into the hasher.
    pub fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    /// Finish constructing the [`HashValue`].
    pub fn finish(self) -> HashValue {
        HashValue::from_digest(self.state)
    }
}

impl fmt::Debug for DefaultHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefaultHasher")
    }
}
