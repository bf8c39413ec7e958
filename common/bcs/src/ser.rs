// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    error::{Error, Result},
    MAX_SEQUENCE_LENGTH,
};
use ethnum::{I256, U256};

/// Interface that all types must implement to support BCS serialization.
pub trait CanonicalSerialize {
    fn serialize(&self, serializer: &mut Serializer);
}

/// Serialize the given value as a `Vec<u8>` of BCS.
///
/// # Examples
///
/// ```
/// use aptos_bcs::to_bytes;
///
/// assert_eq!(to_bytes(&1u64).unwrap(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(to_bytes(&"abcd".to_string()).unwrap(), b"\x04abcd".to_vec());
/// assert_eq!(to_bytes(&Some(8u8)).unwrap(), vec![1, 8]);
/// ```
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + CanonicalSerialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer);
    serializer.into_bytes()
}

/// Append-only BCS writer.
///
/// Encoders never return errors directly. An invalid value (a sequence that is too long, a
/// deprecated variant, ...) is recorded with [`Serializer::set_error`] and surfaces when the
/// buffer is taken with [`Serializer::into_bytes`]. Once an error is recorded all further writes
/// are dropped.
#[derive(Debug, Default)]
pub struct Serializer {
    output: Vec<u8>,
    error: Option<Error>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            error: None,
        }
    }

    /// Records `error` unless an earlier error is already present.
    pub fn set_error(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns the bytes written so far, or the first recorded error.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> &mut Self {
        if self.error.is_none() {
            self.output.extend_from_slice(bytes);
        }
        self
    }

    pub fn encode_bool(&mut self, v: bool) -> &mut Self {
        self.write(&[v as u8])
    }

    pub fn encode_u8(&mut self, v: u8) -> &mut Self {
        self.write(&[v])
    }

    pub fn encode_u16(&mut self, v: u16) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_u32(&mut self, v: u32) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_u64(&mut self, v: u64) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_u128(&mut self, v: u128) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_u256(&mut self, v: U256) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i8(&mut self, v: i8) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i16(&mut self, v: i16) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i32(&mut self, v: i32) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i64(&mut self, v: i64) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i128(&mut self, v: i128) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_i256(&mut self, v: I256) -> &mut Self {
        self.write(&v.to_le_bytes())
    }

    pub fn encode_uleb128(&mut self, mut value: u64) -> &mut Self {
        while value >= 0x80 {
            // Write 7 (lowest) bits of data and set the 8th bit to 1.
            let byte = (value & 0x7f) as u8;
            self.write(&[byte | 0x80]);
            value >>= 7;
        }
        // Write the remaining bits of data and set the highest bit to 0.
        self.write(&[value as u8])
    }

    pub fn encode_variant_index(&mut self, index: u32) -> &mut Self {
        self.encode_uleb128(u64::from(index))
    }

    /// Writes a sequence length prefix.
    pub fn encode_len(&mut self, len: usize) -> &mut Self {
        if len > MAX_SEQUENCE_LENGTH {
            self.set_error(Error::ExceededMaxLength(len as u64));
            return self;
        }
        self.encode_uleb128(len as u64)
    }

    /// Length-prefixed byte vector.
    pub fn encode_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.encode_len(bytes.len()).write(bytes)
    }

    pub fn encode_str(&mut self, s: &str) -> &mut Self {
        self.encode_bytes(s.as_bytes())
    }

    /// Raw bytes without length prefix; the reader must know the length.
    pub fn encode_fixed_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write(bytes)
    }

    pub fn encode_struct<T>(&mut self, value: &T) -> &mut Self
    where
        T: ?Sized + CanonicalSerialize,
    {
        if self.error.is_none() {
            value.serialize(self);
        }
        self
    }

    pub fn encode_vec<T: CanonicalSerialize>(&mut self, items: &[T]) -> &mut Self {
        self.encode_vec_with(items, |serializer, item| {
            serializer.encode_struct(item);
        })
    }

    /// Length-prefixed sequence whose elements are written by `f`.
    pub fn encode_vec_with<T, F>(&mut self, items: &[T], mut f: F) -> &mut Self
    where
        F: FnMut(&mut Self, &T),
    {
        self.encode_len(items.len());
        for item in items {
            if self.error.is_some() {
                break;
            }
            f(self, item);
        }
        self
    }

    pub fn encode_optional<T: CanonicalSerialize>(&mut self, value: &Option<T>) -> &mut Self {
        self.encode_optional_with(value, |serializer, item| {
            serializer.encode_struct(item);
        })
    }

    pub fn encode_optional_with<T, F>(&mut self, value: &Option<T>, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self, &T),
    {
        match value {
            None => self.encode_u8(0),
            Some(inner) => {
                self.encode_u8(1);
                f(self, inner);
                self
            }
        }
    }
}

macro_rules! impl_canonical_serialize {
    ($function:ident, $type:ty) => {
        impl CanonicalSerialize for $type {
            fn serialize(&self, serializer: &mut Serializer) {
                serializer.$function(*self);
            }
        }
    };
}

impl_canonical_serialize!(encode_bool, bool);
impl_canonical_serialize!(encode_u8, u8);
impl_canonical_serialize!(encode_u16, u16);
impl_canonical_serialize!(encode_u32, u32);
impl_canonical_serialize!(encode_u64, u64);
impl_canonical_serialize!(encode_u128, u128);
impl_canonical_serialize!(encode_u256, U256);
impl_canonical_serialize!(encode_i8, i8);
impl_canonical_serialize!(encode_i16, i16);
impl_canonical_serialize!(encode_i32, i32);
impl_canonical_serialize!(encode_i64, i64);
impl_canonical_serialize!(encode_i128, i128);
impl_canonical_serialize!(encode_i256, I256);

impl CanonicalSerialize for str {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_str(self);
    }
}

impl CanonicalSerialize for String {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_str(self);
    }
}

impl<T: CanonicalSerialize> CanonicalSerialize for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_vec(self);
    }
}

impl<T: CanonicalSerialize> CanonicalSerialize for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_optional(self);
    }
}

impl<T: CanonicalSerialize + ?Sized> CanonicalSerialize for Box<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_struct(self.as_ref());
    }
}

impl<T: CanonicalSerialize + ?Sized> CanonicalSerialize for &T {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_struct(*self);
    }
}

/// Fixed-size arrays are written without a length prefix.
impl<const N: usize> CanonicalSerialize for [u8; N] {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_fixed_bytes(self);
    }
}

impl<T0, T1> CanonicalSerialize for (T0, T1)
where
    T0: CanonicalSerialize,
    T1: CanonicalSerialize,
{
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_struct(&self.0).encode_struct(&self.1);
    }
}

impl<T0, T1, T2> CanonicalSerialize for (T0, T1, T2)
where
    T0: CanonicalSerialize,
    T1: CanonicalSerialize,
    T2: CanonicalSerialize,
{
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.0)
            .encode_struct(&self.1)
            .encode_struct(&self.2);
    }
}
