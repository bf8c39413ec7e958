// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! # Binary Canonical Serialization (BCS)
//!
//! BCS is the deterministic encoding used by Aptos for everything that is hashed, signed or sent
//! over the wire. Two parties encoding the same value always produce the same bytes, so a
//! verifier can rebuild the exact message a signer signed.
//!
//! BCS is not self-describing: the reader must know the layout of the value ahead of time.
//!
//! ## Encoding
//!
//! |Type                         |Encoding                                                   |
//! |---                          |---                                                        |
//! |`u8`..`u256`, `i8`..`i256`   |little endian, fixed width, two's complement when signed   |
//! |`bool`                       |`[00]` or `[01]`, any other byte is rejected               |
//! |ULEB128                      |7-bit groups, high bit set on every byte but the last      |
//! |bytes, strings               |ULEB128 length, then the raw bytes                         |
//! |fixed bytes                  |raw bytes, length agreed out of band                       |
//! |sequences                    |ULEB128 length, then each element                          |
//! |enums                        |ULEB128 variant index, then the variant's fields           |
//! |`Option<T>`                  |`[00]`, or `[01]` followed by `T`                          |
//!
//! ```rust
//! # use aptos_bcs::{to_bytes, Result};
//! # fn main() -> Result<()> {
//! assert_eq!(to_bytes(&4660u16)?, vec![0x34, 0x12]);
//! assert_eq!(to_bytes(&-1i8)?, vec![0xff]);
//! assert_eq!(to_bytes(&vec![1u16, 2])?, vec![2, 1, 0, 2, 0]);
//! assert_eq!(to_bytes(&None::<u8>)?, vec![0]);
//! # Ok(())}
//! ```
//!
//! ## Errors
//!
//! The [`Deserializer`] keeps the first error it hits and turns every later read into a no-op
//! returning a zero value. Composite readers surface the error as a `Result`; hand-written
//! decoders can read a run of primitives and call [`Deserializer::check`] once at the end.

mod de;
mod error;
mod ser;

#[cfg(test)]
mod unit_tests;

/// Variable length sequences in BCS are limited to max length of 2^31
pub const MAX_SEQUENCE_LENGTH: usize = 1 << 31;

pub use de::{from_bytes, CanonicalDeserialize, Deserializer};
pub use error::{Error, Result};
pub use ethnum::{I256, U256};
pub use ser::{to_bytes, CanonicalSerialize, Serializer};

/// Encodes `value` as ULEB128.
pub fn uleb128(value: u64) -> Vec<u8> {
    let mut serializer = Serializer::with_capacity(10);
    serializer.encode_uleb128(value);
    // Writing an integer cannot fail.
    serializer.into_bytes().unwrap_or_default()
}

/// Hex encoding of the BCS bytes of `value`, without `0x` prefix.
pub fn to_hex<T>(value: &T) -> Result<String>
where
    T: ?Sized + CanonicalSerialize,
{
    to_bytes(value).map(hex::encode)
}
