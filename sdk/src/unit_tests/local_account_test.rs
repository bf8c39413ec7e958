// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    transaction_builder::{TransactionFactory, UnsignedTransaction},
    types::{AccountKey, LocalAccount, MultiKeySigner, SingleKeyPrivateKey},
    Error,
};
use aptos_crypto::{
    ed25519::Ed25519PrivateKey, multi_ed25519::MultiEd25519PrivateKey,
    secp256k1::Secp256k1PrivateKey, test_utils::TEST_SEED, Aip80PrivateKey, Uniform,
};
use aptos_types::{
    account_address::AccountAddress,
    chain_id::ChainId,
    identifier::Identifier,
    language_storage::ModuleId,
    transaction::{
        authenticator::{AccountAuthenticator, Scheme, TransactionAuthenticator},
        multi_key::MultiKey,
        EntryFunction, RawTransaction, RawTransactionWithData, SignedTransaction,
        TransactionSigner,
    },
};
use rand::{rngs::StdRng, SeedableRng};

const ED25519_KEY: &str =
    "ed25519-priv-0xc5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5";
const SECP256K1_KEY: &str =
    "secp256k1-priv-0xd107155adf816a0a94c6db3c9489c13ad8a1eda9ecb1d5a3d8e2e4c5a7ee6f0b";

fn transfer(amount: u64) -> EntryFunction {
    EntryFunction::new(
        ModuleId::new(AccountAddress::ONE, Identifier::new("aptos_account").unwrap()),
        Identifier::new("transfer").unwrap(),
        vec![],
        vec![
            aptos_bcs::to_bytes(&AccountAddress::TWO).unwrap(),
            aptos_bcs::to_bytes(&amount).unwrap(),
        ],
    )
}

fn raw_transaction(account: &LocalAccount) -> RawTransaction {
    RawTransaction::new_entry_function(
        account.address(),
        account.sequence_number(),
        transfer(10),
        100_000,
        100,
        u64::MAX,
        ChainId::test(),
    )
}

fn multi_key_account(rng: &mut StdRng) -> LocalAccount {
    let first = Ed25519PrivateKey::generate(rng);
    let second = Secp256k1PrivateKey::generate(rng);
    let third = Ed25519PrivateKey::generate(rng);
    let keys = [
        SingleKeyPrivateKey::Ed25519(first),
        SingleKeyPrivateKey::Secp256k1(second),
        SingleKeyPrivateKey::Ed25519(third),
    ];
    let multi_key = MultiKey::new(keys.iter().map(|key| key.public_key()).collect(), 2).unwrap();
    let [_, second, third] = keys;
    let signer = MultiKeySigner::new(multi_key, vec![(2, third), (1, second)]).unwrap();
    LocalAccount::from_key(signer, 0)
}

#[test]
fn test_aip80_accounts() {
    let ed25519 = LocalAccount::from_private_key(ED25519_KEY, 0).unwrap();
    assert!(matches!(ed25519.key(), AccountKey::Ed25519(_)));
    assert_eq!(
        ed25519.authentication_key().to_string(),
        "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
    );
    assert_eq!(
        ed25519.address(),
        AccountAddress::from_str_relaxed(
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
        )
        .unwrap()
    );

    // Plain hex is read as Ed25519.
    let plain = LocalAccount::from_private_key(&ED25519_KEY["ed25519-priv-".len()..], 3).unwrap();
    assert_eq!(plain.address(), ed25519.address());
    assert_eq!(plain.sequence_number(), 3);

    let secp256k1 = LocalAccount::from_private_key(SECP256K1_KEY, 0).unwrap();
    assert!(matches!(
        secp256k1.key(),
        AccountKey::SingleKey(SingleKeyPrivateKey::Secp256k1(_))
    ));
    assert_eq!(
        secp256k1.authentication_key().to_string(),
        "0x935af3b29d773e2e45dab82d1c5357db9df3b095ed886ea33ab1fc90b735c1d6"
    );

    let single_key = LocalAccount::from_key(
        SingleKeyPrivateKey::Ed25519(Ed25519PrivateKey::from_aip80_string(ED25519_KEY).unwrap()),
        0,
    );
    assert_eq!(
        single_key.authentication_key().to_string(),
        "0x9a2db4ee3cc73e9e0ada07f9a172b907ae746b9bf239cdd8072ecf17f1046572"
    );

    assert!(matches!(
        LocalAccount::from_private_key(
            "p256-priv-0xc5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5",
            0
        ),
        Err(Error::Crypto(_))
    ));
    assert!(matches!(
        LocalAccount::from_private_key("ed25519-priv-0x1234", 0),
        Err(Error::Crypto(_))
    ));
}

#[test]
fn test_sign_with_every_key_kind() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let multi_ed25519 = MultiEd25519PrivateKey::new(
        vec![
            Ed25519PrivateKey::generate(&mut rng),
            Ed25519PrivateKey::generate(&mut rng),
            Ed25519PrivateKey::generate(&mut rng),
        ],
        2,
    )
    .unwrap();
    let accounts = vec![
        (LocalAccount::generate(&mut rng), Scheme::Ed25519),
        (
            LocalAccount::from_key(Secp256k1PrivateKey::generate(&mut rng), 0),
            Scheme::SingleKey,
        ),
        (
            LocalAccount::from_key(
                SingleKeyPrivateKey::Ed25519(Ed25519PrivateKey::generate(&mut rng)),
                0,
            ),
            Scheme::SingleKey,
        ),
        (
            LocalAccount::from_key(multi_ed25519, 0),
            Scheme::MultiEd25519,
        ),
        (multi_key_account(&mut rng), Scheme::MultiKey),
    ];

    for (account, scheme) in accounts {
        let txn = account.sign_transaction(raw_transaction(&account)).unwrap();
        assert!(txn.verify_signature(), "{:?} did not verify", scheme);
        assert_eq!(txn.sender(), account.address());
        assert_eq!(
            txn.authenticator().sender().scheme(),
            scheme,
            "unexpected authenticator"
        );
        assert_eq!(
            txn.authenticator().sender().authentication_key(),
            Some(account.authentication_key())
        );
        assert_eq!(
            account.authentication_key().account_address(),
            account.address()
        );
    }
}

#[test]
fn test_multi_key_signature_bitmap() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let account = multi_key_account(&mut rng);
    let authenticator = account
        .key()
        .sign_message(b"multi key message")
        .unwrap();
    match &authenticator {
        AccountAuthenticator::MultiKey { authenticator } => {
            // Keys 1 and 2 of 3 signed; signatures are ordered by key index.
            assert_eq!(authenticator.signatures().bitmap(), vec![0b0110_0000]);
            assert_eq!(authenticator.signatures().signer_indices(), vec![1, 2]);
        }
        other => panic!("unexpected authenticator {:?}", other),
    }
    assert!(authenticator.verify(b"multi key message"));
    assert!(!authenticator.verify(b"another message"));
}

#[test]
fn test_multi_key_signer_rejects_bad_keys() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let first = Ed25519PrivateKey::generate(&mut rng);
    let second = Secp256k1PrivateKey::generate(&mut rng);
    let public_keys = vec![
        SingleKeyPrivateKey::Ed25519(Ed25519PrivateKey::try_from(&first.to_bytes()[..]).unwrap())
            .public_key(),
        SingleKeyPrivateKey::Secp256k1(
            Secp256k1PrivateKey::try_from(&second.to_bytes()[..]).unwrap(),
        )
        .public_key(),
    ];
    let multi_key = MultiKey::new(public_keys, 2).unwrap();

    // Below the threshold.
    assert!(matches!(
        MultiKeySigner::new(
            multi_key.clone(),
            vec![(0, SingleKeyPrivateKey::Ed25519(first))]
        ),
        Err(Error::Crypto(_))
    ));

    // Key at the wrong index.
    assert!(matches!(
        MultiKeySigner::new(
            multi_key.clone(),
            vec![
                (1, SingleKeyPrivateKey::Ed25519(Ed25519PrivateKey::generate(&mut rng))),
                (0, SingleKeyPrivateKey::Secp256k1(second)),
            ]
        ),
        Err(Error::Crypto(_))
    ));

    // Duplicate index.
    let key = Ed25519PrivateKey::generate(&mut rng);
    assert!(matches!(
        MultiKeySigner::new(
            multi_key,
            vec![
                (
                    0,
                    SingleKeyPrivateKey::Ed25519(
                        Ed25519PrivateKey::try_from(&key.to_bytes()[..]).unwrap(),
                    ),
                ),
                (0, SingleKeyPrivateKey::Ed25519(key)),
            ]
        ),
        Err(Error::Crypto(_))
    ));
}

#[test]
fn test_sign_with_transaction_builder() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let mut account = LocalAccount::generate(&mut rng);
    let factory = TransactionFactory::new(ChainId::test());

    for expected in 0..3 {
        let txn = account
            .sign_with_transaction_builder(factory.entry_function(transfer(1)).unwrap())
            .unwrap();
        assert_eq!(txn.sequence_number(), expected);
        assert_eq!(txn.chain_id(), ChainId::test());
        assert!(txn.verify_signature());
    }
    assert_eq!(account.sequence_number(), 3);

    *account.sequence_number_mut() = 42;
    let txn = account
        .sign_with_transaction_builder(
            factory
                .entry_function(transfer(1))
                .unwrap()
                .max_gas_amount(5_000),
        )
        .unwrap();
    assert_eq!(txn.sequence_number(), 42);
    assert_eq!(txn.max_gas_amount(), 5_000);
    assert_eq!(account.sequence_number(), 43);
}

#[test]
fn test_multi_agent_with_transaction_builder() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let mut sender = LocalAccount::generate(&mut rng);
    let secondary = LocalAccount::from_key(Secp256k1PrivateKey::generate(&mut rng), 0);
    let factory = TransactionFactory::new(ChainId::test());

    let txn = sender
        .sign_multi_agent_with_transaction_builder(
            vec![&secondary],
            factory.entry_function(transfer(1)).unwrap(),
        )
        .unwrap();
    assert!(txn.verify_signature());
    assert_eq!(sender.sequence_number(), 1);
    match txn.authenticator() {
        TransactionAuthenticator::MultiAgent {
            secondary_signer_addresses,
            ..
        } => assert_eq!(secondary_signer_addresses, vec![secondary.address()]),
        other => panic!("unexpected authenticator {:?}", other),
    }
}

#[test]
fn test_fee_payer_with_transaction_builder() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let mut sender = LocalAccount::generate(&mut rng);
    let fee_payer = LocalAccount::generate(&mut rng);
    let factory = TransactionFactory::new(ChainId::test());

    let txn = sender
        .sign_fee_payer_with_transaction_builder(
            vec![],
            &fee_payer,
            factory.entry_function(transfer(1)).unwrap(),
        )
        .unwrap();
    assert!(txn.verify_signature());
    assert_eq!(
        txn.authenticator().fee_payer_address(),
        Some(fee_payer.address())
    );
    assert_eq!(fee_payer.sequence_number(), 0);
    assert_eq!(sender.sequence_number(), 1);
}

#[test]
fn test_fee_payer_signed_separately() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let sender = LocalAccount::generate(&mut rng);
    let fee_payer = LocalAccount::from_key(Secp256k1PrivateKey::generate(&mut rng), 0);
    let raw_txn = raw_transaction(&sender);

    // The sender signs before a fee payer is chosen.
    let unsigned = UnsignedTransaction::WithData(RawTransactionWithData::new_fee_payer(
        raw_txn.clone(),
        vec![],
        AccountAddress::ZERO,
    ));
    assert_eq!(unsigned.fee_payer_address(), Some(AccountAddress::ZERO));
    let sender_authenticator = sender.sign_unsigned_transaction(&unsigned).unwrap();

    let with_fee_payer = UnsignedTransaction::WithData(RawTransactionWithData::new_fee_payer(
        raw_txn.clone(),
        vec![],
        fee_payer.address(),
    ));
    let fee_payer_authenticator = with_fee_payer.sign(fee_payer.key()).unwrap();

    let txn = SignedTransaction::new_fee_payer(
        raw_txn,
        sender_authenticator,
        vec![],
        vec![],
        fee_payer.address(),
        fee_payer_authenticator,
    );
    assert!(txn.verify_signature());
}

#[test]
fn test_simulate_transaction() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let accounts = vec![
        LocalAccount::generate(&mut rng),
        LocalAccount::from_key(Secp256k1PrivateKey::generate(&mut rng), 0),
        multi_key_account(&mut rng),
    ];
    for account in accounts {
        let raw_txn = raw_transaction(&account);
        let simulated = account.simulate_transaction(raw_txn.clone());
        assert!(!simulated.verify_signature());
        assert_eq!(simulated.raw_transaction_ref(), &raw_txn);
        assert_eq!(
            simulated.authenticator().sender().authentication_key(),
            Some(account.authentication_key())
        );
    }
}

#[test]
fn test_rotate_key() {
    let mut rng = StdRng::from_seed(TEST_SEED);
    let mut account = LocalAccount::generate(&mut rng);
    let address = account.address();
    let old_key = account.authentication_key();

    let previous = account.rotate_key(Ed25519PrivateKey::generate(&mut rng));
    assert_eq!(previous.authentication_key(), old_key);
    assert_eq!(account.address(), address);
    assert_ne!(account.authentication_key(), old_key);

    let txn = account.sign_transaction(raw_transaction(&account)).unwrap();
    assert!(txn.verify_signature());
}
