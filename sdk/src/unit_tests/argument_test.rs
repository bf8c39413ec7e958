// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    argument::{convert_arg, Arg, EntryFunctionAbi, MoveModule},
    config::ArgumentOptions,
    Error,
};
use aptos_bcs::{I256, U256};
use aptos_types::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{ModuleId, StructTag, TypeTag},
    transaction::EntryFunction,
};
use num_bigint::BigInt;
use proptest::prelude::*;
use serde_json::json;
use std::str::FromStr;

fn convert(type_tag: &str, arg: impl Into<Arg>) -> crate::Result<Vec<u8>> {
    convert_arg(
        &TypeTag::from_str(type_tag).unwrap(),
        &arg.into(),
        &[],
        &ArgumentOptions::default(),
    )
}

fn address_bytes(suffix: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[31] = suffix;
    bytes
}

#[test]
fn test_integers() {
    assert_eq!(convert("u64", 1u64).unwrap(), bcs::to_bytes(&1u64).unwrap());
    assert_eq!(convert("u64", "1000").unwrap(), bcs::to_bytes(&1000u64).unwrap());
    assert_eq!(convert("u64", 5.0).unwrap(), bcs::to_bytes(&5u64).unwrap());
    assert_eq!(convert("u16", 65535u32).unwrap(), bcs::to_bytes(&65535u16).unwrap());
    assert_eq!(
        convert("u128", u128::MAX.to_string()).unwrap(),
        bcs::to_bytes(&u128::MAX).unwrap()
    );
    assert_eq!(convert("i8", -128i64).unwrap(), bcs::to_bytes(&-128i8).unwrap());
    assert_eq!(convert("i64", "-5").unwrap(), bcs::to_bytes(&-5i64).unwrap());

    assert!(matches!(convert("u8", 256u64), Err(Error::Value(_))));
    assert!(matches!(convert("u64", -1i64), Err(Error::Value(_))));
    assert!(matches!(convert("i8", 128u64), Err(Error::Value(_))));
    assert!(matches!(convert("u64", 1.5), Err(Error::Value(_))));
    assert!(matches!(convert("u64", "0x10"), Err(Error::Value(_))));
    assert!(matches!(convert("u64", "1_000"), Err(Error::Value(_))));
    assert!(matches!(convert("i64", "-1_0"), Err(Error::Value(_))));
    assert!(matches!(convert("u64", true), Err(Error::Value(_))));
}

#[test]
fn test_wide_integers() {
    let max: BigInt = BigInt::from(2u8).pow(256) - 1;
    assert_eq!(convert("u256", max.to_string()).unwrap(), vec![0xff; 32]);
    assert_eq!(
        convert("u256", U256::from(1u64)).unwrap(),
        convert("u256", 1u64).unwrap()
    );
    assert!(matches!(
        convert("u256", (max + 1u32).to_string()),
        Err(Error::Value(_))
    ));
    assert!(matches!(convert("u256", -1i64), Err(Error::Value(_))));

    assert_eq!(convert("i256", -1i64).unwrap(), vec![0xff; 32]);
    let mut min = vec![0u8; 32];
    min[31] = 0x80;
    let i256_min = -BigInt::from(2u8).pow(255);
    assert_eq!(convert("i256", i256_min.clone()).unwrap(), min);
    assert_eq!(convert("i256", I256::MIN).unwrap(), min);
    assert!(matches!(
        convert("i256", i256_min - 1),
        Err(Error::Value(_))
    ));
}

#[test]
fn test_bool_and_address() {
    assert_eq!(convert("bool", true).unwrap(), vec![1]);
    assert_eq!(convert("bool", "false").unwrap(), vec![0]);
    assert!(matches!(convert("bool", 1u8), Err(Error::Value(_))));

    assert_eq!(
        convert("address", "0x1").unwrap(),
        bcs::to_bytes(&address_bytes(1)).unwrap()
    );
    assert_eq!(
        convert("address", AccountAddress::TWO).unwrap(),
        bcs::to_bytes(&address_bytes(2)).unwrap()
    );
    assert_eq!(convert("&signer", "3").unwrap(), address_bytes(3).to_vec());
    assert!(matches!(convert("address", "0xzz"), Err(Error::Value(_))));
}

#[test]
fn test_vectors() {
    assert_eq!(
        convert("vector<u8>", Arg::bytes(vec![1, 2, 3])).unwrap(),
        bcs::to_bytes(&vec![1u8, 2, 3]).unwrap()
    );
    // Strings given for bytes are taken as UTF-8, not hex.
    assert_eq!(
        convert("vector<u8>", "abcd").unwrap(),
        hex::decode("0461626364").unwrap()
    );
    assert_eq!(
        convert("vector<u8>", vec![1u8, 2]).unwrap(),
        bcs::to_bytes(&vec![1u8, 2]).unwrap()
    );
    assert_eq!(
        convert("vector<u64>", vec!["1", "2"]).unwrap(),
        bcs::to_bytes(&vec![1u64, 2]).unwrap()
    );
    assert_eq!(
        convert(
            "vector<vector<u8>>",
            Arg::Seq(vec![Arg::bytes(vec![0xab]), Arg::from("c")])
        )
        .unwrap(),
        bcs::to_bytes(&vec![vec![0xabu8], b"c".to_vec()]).unwrap()
    );
    assert_eq!(
        convert("vector<address>", Vec::<Arg>::new()).unwrap(),
        vec![0]
    );
    assert!(matches!(convert("vector<u64>", Arg::Null), Err(Error::Value(_))));
    assert!(matches!(
        convert("vector<u64>", vec![Arg::from(1u64), Arg::from(true)]),
        Err(Error::Value(_))
    ));
}

#[test]
fn test_framework_structs() {
    assert_eq!(
        convert("0x1::string::String", "hello").unwrap(),
        bcs::to_bytes("hello").unwrap()
    );
    assert!(matches!(
        convert("0x1::string::String", 5u8),
        Err(Error::Value(_))
    ));
    assert_eq!(
        convert("0x1::object::Object<0x1::fungible_asset::Metadata>", "0xa").unwrap(),
        address_bytes(10).to_vec()
    );

    let option = "0x1::option::Option<u64>";
    assert_eq!(convert(option, Arg::Null).unwrap(), vec![0]);
    assert_eq!(
        convert(option, 7u64).unwrap(),
        bcs::to_bytes(&Some(7u64)).unwrap()
    );
    assert_eq!(convert(option, Vec::<Arg>::new()).unwrap(), vec![0]);
    assert_eq!(
        convert(option, vec![9u64]).unwrap(),
        bcs::to_bytes(&Some(9u64)).unwrap()
    );
    assert_eq!(
        convert("0x1::option::Option<0x1::string::String>", Some("a")).unwrap(),
        bcs::to_bytes(&Some("a".to_string())).unwrap()
    );


    // A list given for an option of a vector is the vector itself.
    let vector_option = "0x1::option::Option<vector<u64>>";
    assert_eq!(convert(vector_option, Vec::<Arg>::new()).unwrap(), vec![1, 0]);
    assert_eq!(
        convert(vector_option, vec![9u64]).unwrap(),
        bcs::to_bytes(&Some(vec![9u64])).unwrap()
    );
    assert_eq!(
        convert(vector_option, vec![1u64, 2]).unwrap(),
        bcs::to_bytes(&Some(vec![1u64, 2])).unwrap()
    );
    assert_eq!(convert(vector_option, Arg::Null).unwrap(), vec![0]);
    assert_eq!(
        convert("0x1::option::Option<vector<u8>>", Arg::bytes(Vec::<u8>::new())).unwrap(),
        vec![1, 0]
    );
    assert!(matches!(
        convert(option, Arg::Option(Some(Box::new(Arg::from(true))))),
        Err(Error::Value(_))
    ));
    assert!(matches!(
        convert("u64", Arg::Option(None)),
        Err(Error::Value(_))
    ));

    assert!(matches!(
        convert("0x1::coin::Coin<0x1::aptos_coin::AptosCoin>", 1u64),
        Err(Error::Type(_))
    ));
}

#[test]
fn test_generics_and_references() {
    let options = ArgumentOptions::default();
    let generics = vec![TypeTag::U64, TypeTag::Struct(Box::new(StructTag::string()))];
    assert_eq!(
        convert_arg(&TypeTag::Generic(0), &Arg::from(3u64), &generics, &options).unwrap(),
        bcs::to_bytes(&3u64).unwrap()
    );
    assert_eq!(
        convert_arg(
            &TypeTag::from_str("vector<T1>").unwrap(),
            &Arg::from(vec!["x"]),
            &generics,
            &options
        )
        .unwrap(),
        bcs::to_bytes(&vec!["x".to_string()]).unwrap()
    );
    assert!(matches!(
        convert_arg(&TypeTag::Generic(2), &Arg::from(3u64), &generics, &options),
        Err(Error::Type(_))
    ));
    assert_eq!(convert("&u8", 4u8).unwrap(), vec![4]);
}

#[test]
fn test_compatibility_mode_option() {
    let option = TypeTag::from_str("0x1::option::Option<u64>").unwrap();
    let serialized = Arg::from("0x0500000000000000");
    let compatible = ArgumentOptions {
        compatibility_mode: true,
    };

    assert_eq!(
        convert_arg(&option, &serialized, &[], &compatible).unwrap(),
        bcs::to_bytes(&Some(5u64)).unwrap()
    );
    assert!(matches!(
        convert_arg(&option, &serialized, &[], &ArgumentOptions::default()),
        Err(Error::Value(_))
    ));
    // Bytes that do not decode as exactly one value fall back to the plain conversion.
    assert!(convert_arg(&option, &Arg::from("0x05"), &[], &compatible).is_err());
    assert_eq!(
        convert_arg(&option, &Arg::from("12"), &[], &compatible).unwrap(),
        bcs::to_bytes(&Some(12u64)).unwrap()
    );

    let bytes_option = TypeTag::from_str("0x1::option::Option<vector<u8>>").unwrap();
    assert_eq!(
        convert_arg(&bytes_option, &Arg::from("0x02abcd"), &[], &compatible).unwrap(),
        bcs::to_bytes(&Some(vec![0xabu8, 0xcd])).unwrap()
    );
}

#[test]
fn test_json_arguments() {
    let option = TypeTag::from_str("0x1::option::Option<u64>").unwrap();
    let options = ArgumentOptions::default();

    let arg = Arg::try_from(json!({ "vec": ["5"] })).unwrap();
    assert_eq!(
        convert_arg(&option, &arg, &[], &options).unwrap(),
        bcs::to_bytes(&Some(5u64)).unwrap()
    );
    let arg = Arg::try_from(json!({ "vec": [] })).unwrap();
    assert_eq!(arg, Arg::Option(None));
    assert_eq!(convert_arg(&option, &arg, &[], &options).unwrap(), vec![0]);

    let vector_option = TypeTag::from_str("0x1::option::Option<vector<u8>>").unwrap();
    let arg = Arg::try_from(json!({ "vec": [[1, 2]] })).unwrap();
    assert_eq!(
        convert_arg(&vector_option, &arg, &[], &options).unwrap(),
        bcs::to_bytes(&Some(vec![1u8, 2])).unwrap()
    );
    let arg = Arg::try_from(json!({ "vec": [] })).unwrap();
    assert_eq!(convert_arg(&vector_option, &arg, &[], &options).unwrap(), vec![0]);
    assert!(matches!(
        Arg::try_from(json!({ "vec": ["1", "2"] })),
        Err(Error::Value(_))
    ));

    let arg = Arg::try_from(json!([1, 2, 3])).unwrap();
    assert_eq!(
        convert_arg(&TypeTag::from_str("vector<u32>").unwrap(), &arg, &[], &options).unwrap(),
        bcs::to_bytes(&vec![1u32, 2, 3]).unwrap()
    );
    assert_eq!(Arg::try_from(json!(-3)).unwrap(), Arg::from(-3i64));
    assert_eq!(Arg::try_from(json!(null)).unwrap(), Arg::Null);
    assert!(matches!(
        Arg::try_from(json!({ "value": 1 })),
        Err(Error::Value(_))
    ));
}

const COIN_ABI: &str = r#"{
    "address": "0x1",
    "name": "coin",
    "friends": ["0x1::aptos_account"],
    "exposed_functions": [
        {
            "name": "transfer",
            "visibility": "public",
            "is_entry": true,
            "is_view": false,
            "generic_type_params": [{ "constraints": [] }],
            "params": ["&signer", "address", "u64"],
            "return": []
        },
        {
            "name": "balance",
            "visibility": "public",
            "is_entry": false,
            "is_view": true,
            "generic_type_params": [{ "constraints": [] }],
            "params": ["address"],
            "return": ["u64"]
        }
    ],
    "structs": []
}"#;

#[test]
fn test_entry_function_from_module_abi() {
    let module = MoveModule::from_json(COIN_ABI).unwrap();
    let abi = module.entry_function_abi("transfer").unwrap();
    assert_eq!(abi.arg_types(), &[TypeTag::Address, TypeTag::U64]);

    let coin = TypeTag::Struct(Box::new(StructTag::aptos_coin()));
    let options = ArgumentOptions::default();
    let function = abi
        .build(
            vec![coin.clone()],
            &[Arg::from("0x2"), Arg::from("1000")],
            &options,
        )
        .unwrap();
    let module_id = ModuleId::new(AccountAddress::ONE, Identifier::new("coin").unwrap());
    assert_eq!(
        function,
        EntryFunction::new(
            module_id.clone(),
            Identifier::new("transfer").unwrap(),
            vec![coin.clone()],
            vec![
                address_bytes(2).to_vec(),
                bcs::to_bytes(&1000u64).unwrap()
            ],
        )
    );

    assert!(matches!(
        abi.build(vec![], &[Arg::from("0x2"), Arg::from(1u64)], &options),
        Err(Error::Type(_))
    ));
    assert!(matches!(
        abi.build(vec![coin.clone()], &[Arg::from("0x2")], &options),
        Err(Error::Value(_))
    ));
    assert!(matches!(
        module.entry_function_abi("balance"),
        Err(Error::Type(_))
    ));
    assert!(matches!(
        module.entry_function_abi("missing"),
        Err(Error::Type(_))
    ));

    let resolved = EntryFunctionAbi::new(
        module_id,
        Identifier::new("transfer").unwrap(),
        1,
        vec![TypeTag::Signer, TypeTag::Address, TypeTag::U64],
    );
    assert_eq!(
        resolved
            .build(vec![coin], &[Arg::from("0x2"), Arg::from("1000")], &options)
            .unwrap(),
        function
    );
}

#[test]
fn test_view_function_from_module_abi() {
    let module = MoveModule::from_json(COIN_ABI).unwrap();
    assert!(matches!(
        module.view_function_abi("transfer"),
        Err(Error::Type(_))
    ));

    let coin = TypeTag::Struct(Box::new(StructTag::aptos_coin()));
    let view = module
        .view_function_abi("balance")
        .unwrap()
        .build(
            vec![coin.clone()],
            &[Arg::from("0x1")],
            &ArgumentOptions::default(),
        )
        .unwrap();
    assert_eq!(view.args, vec![address_bytes(1).to_vec()]);

    let mut expected = aptos_bcs::to_bytes(&module.module_id()).unwrap();
    expected.extend(aptos_bcs::to_bytes(&Identifier::new("balance").unwrap()).unwrap());
    expected.push(1);
    expected.extend(aptos_bcs::to_bytes(&coin).unwrap());
    expected.push(1);
    expected.push(32);
    expected.extend(address_bytes(1));
    assert_eq!(aptos_bcs::to_bytes(&view).unwrap(), expected);
}

proptest! {
    #[test]
    fn test_u64_matches_bcs(value in any::<u64>()) {
        let expected = bcs::to_bytes(&value).unwrap();
        prop_assert_eq!(convert("u64", value).unwrap(), expected.clone());
        prop_assert_eq!(convert("u64", value.to_string()).unwrap(), expected);
    }

    #[test]
    fn test_i128_matches_bcs(value in any::<i128>()) {
        prop_assert_eq!(
            convert("i128", value.to_string()).unwrap(),
            bcs::to_bytes(&value).unwrap()
        );
    }

    #[test]
    fn test_vector_matches_bcs(values in proptest::collection::vec(any::<u16>(), 0..40)) {
        prop_assert_eq!(
            convert("vector<u16>", values.clone()).unwrap(),
            bcs::to_bytes(&values).unwrap()
        );
    }

    #[test]
    fn test_option_vector_matches_bcs(
        value in proptest::option::of(proptest::collection::vec(any::<u32>(), 0..10))
    ) {
        prop_assert_eq!(
            convert("0x1::option::Option<vector<u32>>", value.clone()).unwrap(),
            bcs::to_bytes(&value).unwrap()
        );
    }

    #[test]
    fn test_option_string_matches_bcs(value in proptest::option::of("[a-z]{0,12}")) {
        prop_assert_eq!(
            convert("0x1::option::Option<0x1::string::String>", value.clone()).unwrap(),
            bcs::to_bytes(&value).unwrap()
        );
    }
}
