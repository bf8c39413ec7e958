// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{ModuleId, StructTag, TypeTag, CORE_CODE_ADDRESS, MAX_TYPE_TAG_NESTING},
    test_helpers::assert_canonical_encode_decode,
};
use proptest::prelude::*;
use std::str::FromStr;

fn coin_store() -> StructTag {
    StructTag::new(
        CORE_CODE_ADDRESS,
        Identifier::new("coin").unwrap(),
        Identifier::new("CoinStore").unwrap(),
        vec![StructTag::aptos_coin().into()],
    )
}

#[test]
fn test_coin_store_string_roundtrip() {
    let s = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";
    let tag = StructTag::from_str(s).unwrap();
    assert_eq!(tag, coin_store());
    assert_eq!(tag.to_string(), s);
    assert_eq!(tag.to_canonical_string(), s);
}

#[test]
fn test_coin_store_bcs() {
    let bytes = aptos_bcs::to_bytes(&coin_store()).unwrap();
    assert_eq!(
        hex::encode(&bytes),
        "000000000000000000000000000000000000000000000000000000000000000104636f696e09436f696e53746f7265\
         010700000000000000000000000000000000000000000000000000000000000000010a6170746f735f636f696e09\
         4170746f73436f696e00"
    );
    assert_eq!(aptos_bcs::from_bytes::<StructTag>(&bytes).unwrap(), coin_store());
}

#[test]
fn test_type_tag_discriminants() {
    let cases = vec![
        (TypeTag::Bool, vec![0]),
        (TypeTag::U8, vec![1]),
        (TypeTag::U64, vec![2]),
        (TypeTag::U128, vec![3]),
        (TypeTag::Address, vec![4]),
        (TypeTag::Signer, vec![5]),
        (TypeTag::vector(TypeTag::U8), vec![6, 1]),
        (TypeTag::U16, vec![8]),
        (TypeTag::U32, vec![9]),
        (TypeTag::U256, vec![10]),
        (TypeTag::I8, vec![11]),
        (TypeTag::I256, vec![16]),
        (TypeTag::Generic(1), vec![0xfe, 0x01, 1, 0]),
        (TypeTag::reference(TypeTag::Signer), vec![0xff, 0x01, 5]),
    ];
    for (tag, expected) in cases {
        assert_eq!(aptos_bcs::to_bytes(&tag).unwrap(), expected, "{}", tag);
        assert_eq!(aptos_bcs::from_bytes::<TypeTag>(&expected).unwrap(), tag);
    }
    assert!(aptos_bcs::from_bytes::<TypeTag>(&[17]).is_err());
}

#[test]
fn test_type_tag_display() {
    assert_eq!(TypeTag::vector(TypeTag::U8).to_string(), "vector<u8>");
    assert_eq!(TypeTag::reference(TypeTag::Signer).to_string(), "&signer");
    assert_eq!(TypeTag::Generic(3).to_string(), "T3");
    assert_eq!(
        TypeTag::from(StructTag::option(TypeTag::Address)).to_string(),
        "0x1::option::Option<address>"
    );
}

#[test]
fn test_framework_structs() {
    assert!(StructTag::string().is_string());
    assert!(StructTag::option(TypeTag::U8).is_option());
    assert!(StructTag::object(TypeTag::Generic(0)).is_object());
    assert!(!StructTag::aptos_coin().is_string());
    let foreign = StructTag::new(
        AccountAddress::TWO,
        Identifier::new("string").unwrap(),
        Identifier::new("String").unwrap(),
        vec![],
    );
    assert!(!foreign.is_string());
}

#[test]
fn test_signer_predicate() {
    assert!(TypeTag::Signer.is_signer());
    assert!(TypeTag::reference(TypeTag::Signer).is_signer());
    assert!(!TypeTag::vector(TypeTag::Signer).is_signer());
    assert!(!TypeTag::Address.is_signer());
}

#[test]
fn test_type_tag_nesting_limit() {
    let mut tag = TypeTag::U8;
    for _ in 0..MAX_TYPE_TAG_NESTING {
        tag = TypeTag::vector(tag);
    }
    let bytes = aptos_bcs::to_bytes(&tag).unwrap();
    assert_eq!(aptos_bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);

    let too_deep = aptos_bcs::to_bytes(&TypeTag::vector(tag)).unwrap();
    assert!(aptos_bcs::from_bytes::<TypeTag>(&too_deep).is_err());
}

#[test]
fn test_module_id() {
    let module_id = ModuleId::from_str("0x1::coin").unwrap();
    assert_eq!(module_id, ModuleId::new(AccountAddress::ONE, Identifier::new("coin").unwrap()));
    assert_eq!(module_id.to_string(), "0x1::coin");
    assert!(ModuleId::from_str("0x1").is_err());
    assert!(ModuleId::from_str("coin::0x1").is_err());
    assert_canonical_encode_decode(module_id);
}

#[test]
fn test_type_tag_json() {
    let tag = TypeTag::vector(StructTag::string().into());
    let json = serde_json::to_string(&tag).unwrap();
    assert_eq!(json, "\"vector<0x1::string::String>\"");
    assert_eq!(serde_json::from_str::<TypeTag>(&json).unwrap(), tag);
}

proptest! {
    #[test]
    fn test_type_tag_canonical_roundtrip(tag in any::<TypeTag>()) {
        assert_canonical_encode_decode(tag);
    }

    #[test]
    fn test_type_tag_string_roundtrip(tag in any::<TypeTag>()) {
        prop_assert_eq!(TypeTag::from_str(&tag.to_string()).unwrap(), tag);
    }
}
