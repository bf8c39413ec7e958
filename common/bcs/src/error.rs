// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while encoding or decoding BCS.
///
/// Both the [`Serializer`](crate::Serializer) and the [`Deserializer`](crate::Deserializer) keep
/// the first error they encounter; later operations become no-ops and the original error is the
/// one reported.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input")]
    Eof,
    #[error("expected boolean, found byte {0:#04x}")]
    InvalidBool(u8),
    #[error("invalid ULEB128 encoding: value does not fit in 64 bits")]
    InvalidUleb128,
    #[error("non-canonical ULEB128 encoding")]
    NonCanonicalUleb128,
    #[error("unknown variant index {index} for {type_name}")]
    UnknownVariant { type_name: &'static str, index: u64 },
    #[error("length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("exceeded max sequence length: {0}")]
    ExceededMaxLength(u64),
    #[error("{0} bytes of remaining input")]
    RemainingInput(usize),
    #[error("malformed utf8")]
    Utf8,
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn unknown_variant(type_name: &'static str, index: u64) -> Self {
        Error::UnknownVariant { type_name, index }
    }
}
