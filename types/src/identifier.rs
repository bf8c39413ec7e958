// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! An identifier is the name of an entity (module, struct, function) in Move.
//!
//! Identifiers are non-empty and made of ASCII letters, digits and underscores.

use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, str::FromStr};
use thiserror::Error;

/// An owned identifier.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(Box<str>);
// An identifier cannot be mutated so use Box<str> instead of String -- it is 1 word smaller.

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid identifier '{0}'")]
pub struct InvalidIdentifierError(pub String);

/// Returns `true` if `b` may appear in an identifier.
pub const fn is_valid_identifier_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
}

/// Describes what identifiers are allowed.
pub fn is_valid(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_valid_identifier_char)
}

impl Identifier {
    /// Creates a new `Identifier` instance.
    pub fn new(s: impl Into<Box<str>>) -> Result<Self, InvalidIdentifierError> {
        let s = s.into();
        if is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidIdentifierError(s.into()))
        }
    }

    /// For framework names known to be valid.
    pub(crate) fn from_static(s: &'static str) -> Self {
        debug_assert!(is_valid(s));
        Self(s.into())
    }

    /// Converts a vector of bytes to an `Identifier`.
    pub fn from_utf8(vec: Vec<u8>) -> Result<Self, InvalidIdentifierError> {
        let s = String::from_utf8(vec)
            .map_err(|err| InvalidIdentifierError(String::from_utf8_lossy(err.as_bytes()).into()))?;
        Self::new(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts this `Identifier` into a `String`.
    ///
    /// This is not implemented as a `From` trait to discourage automatic conversions -- these
    /// conversions should not typically happen.
    pub fn into_string(self) -> String {
        self.0.into()
    }

    /// Converts this `Identifier` into a UTF-8-encoded byte sequence.
    pub fn into_bytes(self) -> Vec<u8> {
        self.into_string().into_bytes()
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifierError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::new(data)
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = InvalidIdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(ident: Identifier) -> String {
        ident.into_string()
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl CanonicalSerialize for Identifier {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_str(&self.0);
    }
}

impl CanonicalDeserialize for Identifier {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let s = deserializer.decode_string();
        deserializer.check()?;
        Identifier::new(s).map_err(aptos_bcs::Error::custom)
    }
}

#[cfg(any(test, feature = "fuzzing"))]
impl proptest::arbitrary::Arbitrary for Identifier {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        "[a-zA-Z_][a-zA-Z0-9_]{0,15}"
            .prop_map(|s| Identifier(s.into_boxed_str()))
            .boxed()
    }
}
