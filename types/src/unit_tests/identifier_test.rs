// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{identifier::Identifier, test_helpers::assert_canonical_encode_decode};
use proptest::prelude::*;

#[test]
fn test_invalid_identifiers() {
    assert!(Identifier::new("").is_err());
    assert!(Identifier::new("foo-bar").is_err());
    assert!(Identifier::new("foo::bar").is_err());
    assert!(Identifier::new("caf\u{e9}").is_err());
    assert!(Identifier::from_utf8(vec![0xff]).is_err());
}

#[test]
fn test_identifier_bcs() {
    let identifier = Identifier::new("coin").unwrap();
    assert_eq!(
        aptos_bcs::to_bytes(&identifier).unwrap(),
        vec![4, b'c', b'o', b'i', b'n']
    );
    // Decoding validates the identifier.
    assert!(aptos_bcs::from_bytes::<Identifier>(&[3, b'a', b'-', b'b']).is_err());
}

proptest! {
    #[test]
    fn identifier_string_roundtrip(identifier in any::<Identifier>()) {
        let s = identifier.clone().into_string();
        let id2 = Identifier::new(s).expect("identifier should parse correctly");
        prop_assert_eq!(identifier, id2);
    }

    #[test]
    fn serde_json_roundtrip(identifier in any::<Identifier>()) {
        let ser = serde_json::to_string(&identifier).expect("should serialize correctly");
        let id2: Identifier = serde_json::from_str(&ser).expect("should deserialize correctly");
        prop_assert_eq!(identifier, id2);
    }

    #[test]
    fn identifier_canonical_serialization(identifier in any::<Identifier>()) {
        assert_canonical_encode_decode(identifier);
    }
}
