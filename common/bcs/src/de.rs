// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    error::{Error, Result},
    MAX_SEQUENCE_LENGTH,
};
use ethnum::{I256, U256};

/// Interface that all types must implement to support BCS deserialization.
pub trait CanonicalDeserialize: Sized {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self>;
}

/// Deserializes a `&[u8]` into a type, requiring that every byte is consumed.
///
/// # Examples
///
/// ```
/// use aptos_bcs::from_bytes;
///
/// let value: Vec<u16> = from_bytes(&[2, 1, 0, 2, 0]).unwrap();
/// assert_eq!(value, vec![1, 2]);
/// assert!(from_bytes::<bool>(&[2]).is_err());
/// ```
pub fn from_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = Deserializer::new(bytes);
    let value = deserializer.decode_struct::<T>()?;
    deserializer.finish().map(move |_| value)
}

/// BCS reader with a sticky error.
///
/// Primitive reads never fail: when the input is malformed they record the error and return a
/// zero value (`0`, `false`, an empty vector or string). Every read after the first error is a
/// no-op and the first error is preserved. Callers check the state at natural boundaries with
/// [`Deserializer::check`] or [`Deserializer::finish`]; composite reads (`decode_struct`,
/// `decode_vec`, `decode_optional`) check it for them and return `Result`.
#[derive(Debug)]
pub struct Deserializer<'de> {
    input: &'de [u8],
    error: Option<Error>,
}

impl<'de> Deserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self { input, error: None }
    }

    /// Records `error` unless an earlier error is already present.
    pub fn set_error(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Records `error` and returns the error that is now sticky, which is `error` itself unless
    /// an earlier one was already recorded.
    fn fail(&mut self, error: Error) -> Error {
        match &self.error {
            Some(first) => first.clone(),
            None => {
                self.error = Some(error.clone());
                error
            }
        }
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Should be called once a value has been fully read: reports the sticky error if any, and
    /// otherwise verifies that no input is left over.
    pub fn finish(self) -> Result<()> {
        self.check()?;
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(Error::RemainingInput(self.input.len()))
        }
    }

    fn take(&mut self, len: usize) -> Option<&'de [u8]> {
        if self.error.is_some() {
            return None;
        }
        if self.input.len() < len {
            self.set_error(Error::Eof);
            return None;
        }
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        Some(head)
    }

    pub fn decode_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(bytes) = self.take(N) {
            out.copy_from_slice(bytes);
        }
        out
    }

    pub fn decode_bool(&mut self) -> bool {
        match self.take(1) {
            Some([0]) => false,
            Some([1]) => true,
            Some([byte]) => {
                let byte = *byte;
                self.set_error(Error::InvalidBool(byte));
                false
            }
            _ => false,
        }
    }

    pub fn decode_u8(&mut self) -> u8 {
        self.take(1).map(|bytes| bytes[0]).unwrap_or_default()
    }

    pub fn decode_u16(&mut self) -> u16 {
        u16::from_le_bytes(self.decode_array())
    }

    pub fn decode_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.decode_array())
    }

    pub fn decode_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.decode_array())
    }

    pub fn decode_u128(&mut self) -> u128 {
        u128::from_le_bytes(self.decode_array())
    }

    pub fn decode_u256(&mut self) -> U256 {
        U256::from_le_bytes(self.decode_array())
    }

    pub fn decode_i8(&mut self) -> i8 {
        i8::from_le_bytes(self.decode_array())
    }

    pub fn decode_i16(&mut self) -> i16 {
        i16::from_le_bytes(self.decode_array())
    }

    pub fn decode_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.decode_array())
    }

    pub fn decode_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.decode_array())
    }

    pub fn decode_i128(&mut self) -> i128 {
        i128::from_le_bytes(self.decode_array())
    }

    pub fn decode_i256(&mut self) -> I256 {
        I256::from_le_bytes(self.decode_array())
    }

    pub fn decode_uleb128(&mut self) -> u64 {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = match self.take(1) {
                Some(bytes) => bytes[0],
                None => return 0,
            };
            let digit = u64::from(byte & 0x7f);
            if shift == 63 && digit > 1 {
                self.set_error(Error::InvalidUleb128);
                return 0;
            }
            value |= digit << shift;
            // If the highest bit of `byte` is 0, return the final value.
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    // Only canonical encodings are accepted, therefore the heaviest (and last)
                    // base-128 digit must be non-zero.
                    self.set_error(Error::NonCanonicalUleb128);
                    return 0;
                }
                return value;
            }
            shift += 7;
            if shift > 63 {
                self.set_error(Error::InvalidUleb128);
                return 0;
            }
        }
    }

    pub fn decode_variant_index(&mut self) -> u64 {
        self.decode_uleb128()
    }

    /// Reads a sequence length prefix.
    pub fn decode_len(&mut self) -> usize {
        let len = self.decode_uleb128();
        if len > MAX_SEQUENCE_LENGTH as u64 {
            self.set_error(Error::ExceededMaxLength(len));
            return 0;
        }
        len as usize
    }

    /// Length-prefixed byte vector.
    pub fn decode_bytes(&mut self) -> Vec<u8> {
        let len = self.decode_len();
        self.take(len).map(<[u8]>::to_vec).unwrap_or_default()
    }

    pub fn decode_string(&mut self) -> String {
        let bytes = self.decode_bytes();
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                self.set_error(Error::Utf8);
                String::new()
            }
        }
    }

    /// Raw bytes without length prefix.
    pub fn decode_fixed_bytes(&mut self, len: usize) -> Vec<u8> {
        self.take(len).map(<[u8]>::to_vec).unwrap_or_default()
    }

    pub fn decode_struct<T: CanonicalDeserialize>(&mut self) -> Result<T> {
        self.check()?;
        match T::deserialize(self) {
            Ok(value) => self.check().map(|_| value),
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn decode_vec<T: CanonicalDeserialize>(&mut self) -> Result<Vec<T>> {
        self.decode_vec_with(|deserializer| deserializer.decode_struct())
    }

    /// Length-prefixed sequence whose elements are read by `f`.
    pub fn decode_vec_with<T, F>(&mut self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let len = self.decode_len();
        self.check()?;
        // Every element occupies at least one byte; don't trust the prefix for allocation.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            match f(self) {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.set_error(err);
                    break;
                }
            }
        }
        self.check().map(|_| items)
    }

    pub fn decode_optional<T: CanonicalDeserialize>(&mut self) -> Result<Option<T>> {
        self.decode_optional_with(|deserializer| deserializer.decode_struct())
    }

    pub fn decode_optional_with<T, F>(&mut self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if !self.decode_bool() {
            return self.check().map(|_| None);
        }
        match f(self) {
            Ok(value) => self.check().map(|_| Some(value)),
            Err(err) => Err(self.fail(err)),
        }
    }
}

macro_rules! impl_canonical_deserialize {
    ($function:ident, $type:ty) => {
        impl CanonicalDeserialize for $type {
            fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
                let value = deserializer.$function();
                deserializer.check().map(|_| value)
            }
        }
    };
}

impl_canonical_deserialize!(decode_bool, bool);
impl_canonical_deserialize!(decode_u8, u8);
impl_canonical_deserialize!(decode_u16, u16);
impl_canonical_deserialize!(decode_u32, u32);
impl_canonical_deserialize!(decode_u64, u64);
impl_canonical_deserialize!(decode_u128, u128);
impl_canonical_deserialize!(decode_u256, U256);
impl_canonical_deserialize!(decode_i8, i8);
impl_canonical_deserialize!(decode_i16, i16);
impl_canonical_deserialize!(decode_i32, i32);
impl_canonical_deserialize!(decode_i64, i64);
impl_canonical_deserialize!(decode_i128, i128);
impl_canonical_deserialize!(decode_i256, I256);
impl_canonical_deserialize!(decode_string, String);

impl<T: CanonicalDeserialize> CanonicalDeserialize for Vec<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        deserializer.decode_vec()
    }
}

impl<T: CanonicalDeserialize> CanonicalDeserialize for Option<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        deserializer.decode_optional()
    }
}

impl<T: CanonicalDeserialize> CanonicalDeserialize for Box<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        deserializer.decode_struct().map(Box::new)
    }
}

impl<const N: usize> CanonicalDeserialize for [u8; N] {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        let value = deserializer.decode_array();
        deserializer.check().map(|_| value)
    }
}

impl<T0, T1> CanonicalDeserialize for (T0, T1)
where
    T0: CanonicalDeserialize,
    T1: CanonicalDeserialize,
{
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        Ok((deserializer.decode_struct()?, deserializer.decode_struct()?))
    }
}

impl<T0, T1, T2> CanonicalDeserialize for (T0, T1, T2)
where
    T0: CanonicalDeserialize,
    T1: CanonicalDeserialize,
    T2: CanonicalDeserialize,
{
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        Ok((
            deserializer.decode_struct()?,
            deserializer.decode_struct()?,
            deserializer.decode_struct()?,
        ))
    }
}
