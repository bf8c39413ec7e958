// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{from_bytes, to_bytes, uleb128, Deserializer};
use proptest::prelude::*;

// The reference `bcs` crate is the oracle: both encoders must agree byte for byte.
proptest! {
    #[test]
    fn integers_match_reference(a in any::<u8>(), b in any::<u16>(), c in any::<u32>(),
                                d in any::<u64>(), e in any::<u128>(), f in any::<i64>()) {
        prop_assert_eq!(to_bytes(&a).unwrap(), bcs::to_bytes(&a).unwrap());
        prop_assert_eq!(to_bytes(&b).unwrap(), bcs::to_bytes(&b).unwrap());
        prop_assert_eq!(to_bytes(&c).unwrap(), bcs::to_bytes(&c).unwrap());
        prop_assert_eq!(to_bytes(&d).unwrap(), bcs::to_bytes(&d).unwrap());
        prop_assert_eq!(to_bytes(&e).unwrap(), bcs::to_bytes(&e).unwrap());
        prop_assert_eq!(to_bytes(&f).unwrap(), bcs::to_bytes(&f).unwrap());
    }

    #[test]
    fn uleb128_roundtrip(value in any::<u64>()) {
        let encoded = uleb128(value);
        let mut deserializer = Deserializer::new(&encoded);
        prop_assert_eq!(deserializer.decode_uleb128(), value);
        prop_assert!(deserializer.finish().is_ok());
    }

    #[test]
    fn uleb128_length_prefix_matches_reference(len in 0usize..70_000) {
        let bytes = vec![0u8; len];
        let ours = to_bytes(&bytes).unwrap();
        let reference = bcs::to_bytes(&bytes).unwrap();
        prop_assert_eq!(ours, reference);
    }

    #[test]
    fn composite_matches_reference(
        strings in proptest::collection::vec(".*", 0..8),
        options in proptest::collection::vec(proptest::option::of(any::<u32>()), 0..8),
    ) {
        let value = (strings.clone(), options.clone());
        let ours = to_bytes(&value).unwrap();
        prop_assert_eq!(&ours, &bcs::to_bytes(&value).unwrap());
        let decoded: (Vec<String>, Vec<Option<u32>>) = from_bytes(&ours).unwrap();
        prop_assert_eq!(decoded, (strings, options));
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = from_bytes::<Vec<Option<String>>>(&bytes);
        let _ = from_bytes::<(u64, Vec<u8>, bool)>(&bytes);
    }
}
