// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{to_bytes, uleb128, CanonicalSerialize, Error, Serializer, I256, U256};

#[test]
fn test_fixed_width_integers() {
    assert_eq!(to_bytes(&1u64).unwrap(), hex::decode("0100000000000000").unwrap());
    assert_eq!(to_bytes(&0x1234u16).unwrap(), vec![0x34, 0x12]);
    assert_eq!(to_bytes(&0x1234_5678u32).unwrap(), vec![0x78, 0x56, 0x34, 0x12]);
    assert_eq!(to_bytes(&-4660i16).unwrap(), vec![0xcc, 0xed]);
    assert_eq!(to_bytes(&u128::MAX).unwrap(), vec![0xff; 16]);
    assert_eq!(to_bytes(&U256::ONE).unwrap()[0], 1);
    assert_eq!(to_bytes(&U256::MAX).unwrap(), vec![0xff; 32]);
    assert_eq!(to_bytes(&I256::MINUS_ONE).unwrap(), vec![0xff; 32]);
}

#[test]
fn test_uleb128() {
    assert_eq!(uleb128(0), vec![0x00]);
    assert_eq!(uleb128(127), vec![0x7f]);
    assert_eq!(uleb128(128), vec![0x80, 0x01]);
    assert_eq!(uleb128(16383), vec![0xff, 0x7f]);
    assert_eq!(uleb128(65535), vec![0xff, 0xff, 0x03]);
    assert_eq!(uleb128(u64::MAX).len(), 10);
}

#[test]
fn test_bytes_and_strings() {
    assert_eq!(to_bytes("abcd").unwrap(), hex::decode("0461626364").unwrap());

    let mut serializer = Serializer::new();
    serializer.encode_bytes(b"abcd");
    assert_eq!(serializer.into_bytes().unwrap(), vec![4, b'a', b'b', b'c', b'd']);

    let mut serializer = Serializer::new();
    serializer.encode_fixed_bytes(&[1, 2, 3]);
    assert_eq!(serializer.into_bytes().unwrap(), vec![1, 2, 3]);

    let long = vec![7u8; 200];
    let encoded = to_bytes(&long).unwrap();
    assert_eq!(&encoded[..2], &[0xc8, 0x01]);
    assert_eq!(encoded.len(), 202);
}

#[test]
fn test_options_and_sequences() {
    assert_eq!(to_bytes(&Some(8u8)).unwrap(), vec![1, 8]);
    assert_eq!(to_bytes(&None::<u64>).unwrap(), vec![0]);
    assert_eq!(to_bytes(&vec![true, false]).unwrap(), vec![2, 1, 0]);
    assert_eq!(
        to_bytes(&vec![Some(1u16), None]).unwrap(),
        vec![2, 1, 1, 0, 0]
    );
    assert_eq!(to_bytes(&(1u8, "a".to_string())).unwrap(), vec![1, 1, b'a']);
}

struct Tagged(u32, Vec<u8>);

impl CanonicalSerialize for Tagged {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_variant_index(self.0).encode_bytes(&self.1);
    }
}

#[test]
fn test_variant_and_vec_with() {
    let items = vec![Tagged(0, vec![1]), Tagged(200, vec![])];
    let mut serializer = Serializer::new();
    serializer.encode_vec(&items);
    assert_eq!(
        serializer.into_bytes().unwrap(),
        vec![2, 0, 1, 1, 0xc8, 0x01, 0]
    );

    let mut serializer = Serializer::new();
    serializer.encode_vec_with(&[3u64, 4], |serializer, v| {
        serializer.encode_u8(*v as u8);
    });
    assert_eq!(serializer.into_bytes().unwrap(), vec![2, 3, 4]);
}

#[test]
fn test_sticky_serializer_error() {
    let mut serializer = Serializer::new();
    serializer.encode_u8(1);
    serializer.set_error(Error::custom("first"));
    serializer.set_error(Error::custom("second"));
    serializer.encode_u64(5);
    assert_eq!(serializer.error(), Some(&Error::custom("first")));
    assert_eq!(serializer.into_bytes(), Err(Error::custom("first")));
}
