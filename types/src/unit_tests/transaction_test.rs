// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    account_address::AccountAddress,
    chain_id::ChainId,
    identifier::Identifier,
    language_storage::{ModuleId, TypeTag},
    transaction::{
        authenticator::{AccountAuthenticator, TransactionAuthenticator},
        EntryFunction, Multisig, MultisigTransactionPayload, RawTransaction,
        RawTransactionWithData, Script, SignedTransaction, TransactionArgument,
        TransactionPayload, TransactionSigner,
    },
};
use aptos_crypto::{
    ed25519::{Ed25519PrivateKey, Ed25519Signature},
    multi_ed25519::MultiEd25519PrivateKey,
    secp256k1::Secp256k1PrivateKey,
    test_utils::TEST_SEED,
    HashValue, Uniform,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

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

fn raw_transaction(sender: AccountAddress) -> RawTransaction {
    RawTransaction::new_entry_function(
        sender,
        7,
        transfer(1_000),
        100_000,
        100,
        1_700_000_000,
        ChainId::testnet(),
    )
}

fn keys() -> (Ed25519PrivateKey, Secp256k1PrivateKey, Ed25519PrivateKey) {
    let mut rng = StdRng::from_seed(TEST_SEED);
    (
        Ed25519PrivateKey::generate(&mut rng),
        Secp256k1PrivateKey::generate(&mut rng),
        Ed25519PrivateKey::generate(&mut rng),
    )
}

#[derive(Serialize)]
struct ModuleIdMirror([u8; 32], String);

#[derive(Serialize)]
struct EntryFunctionMirror {
    module: ModuleIdMirror,
    function: String,
    ty_args: Vec<u8>,
    args: Vec<Vec<u8>>,
}

#[derive(Serialize)]
enum PayloadMirror {
    _Script(()),
    _ModuleBundle(()),
    EntryFunction(EntryFunctionMirror),
}

#[derive(Serialize)]
struct RawTransactionMirror {
    sender: [u8; 32],
    sequence_number: u64,
    payload: PayloadMirror,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: u64,
    chain_id: u8,
}

#[test]
fn test_raw_transaction_layout() {
    let sender = AccountAddress::from_hex_literal("0xabc").unwrap();
    let mirror = RawTransactionMirror {
        sender: sender.into_bytes(),
        sequence_number: 7,
        payload: PayloadMirror::EntryFunction(EntryFunctionMirror {
            module: ModuleIdMirror(AccountAddress::ONE.into_bytes(), "aptos_account".into()),
            function: "transfer".into(),
            ty_args: vec![],
            args: vec![AccountAddress::TWO.to_vec(), 1_000u64.to_le_bytes().to_vec()],
        }),
        max_gas_amount: 100_000,
        gas_unit_price: 100,
        expiration_timestamp_secs: 1_700_000_000,
        chain_id: 2,
    };
    let raw_txn = raw_transaction(sender);
    let bytes = aptos_bcs::to_bytes(&raw_txn).unwrap();
    assert_eq!(bytes, bcs::to_bytes(&mirror).unwrap());
    assert_eq!(aptos_bcs::from_bytes::<RawTransaction>(&bytes).unwrap(), raw_txn);
}

#[test]
fn test_signing_message_prefix() {
    let raw_txn = raw_transaction(AccountAddress::ONE);
    let message = raw_txn.signing_message().unwrap();
    assert_eq!(
        hex::encode(&message[..32]),
        "b5e97db07fa0bd0e5598aa3643a9bc6f6693bddc1a9fec9e674a461eaa00b193"
    );
    assert_eq!(message[32..], aptos_bcs::to_bytes(&raw_txn).unwrap()[..]);

    let with_data = RawTransactionWithData::new_multi_agent(raw_txn, vec![AccountAddress::TWO]);
    let message = with_data.signing_message().unwrap();
    assert_eq!(
        hex::encode(&message[..32]),
        "5efa3c4f02f83a0f4b2d69fc95c607cc02825cc4e7be536ef0992df050d9e67c"
    );
    assert_eq!(message[32], 0);
}

#[test]
fn test_script_argument_encoding() {
    assert_eq!(
        aptos_bcs::to_bytes(&TransactionArgument::Bool(true)).unwrap(),
        vec![0x05, 0x01]
    );
    assert_eq!(
        aptos_bcs::to_bytes(&TransactionArgument::U16(1)).unwrap(),
        vec![0x06, 0x01, 0x00]
    );
    assert_eq!(
        aptos_bcs::to_bytes(&TransactionArgument::U8Vector(vec![0xab])).unwrap(),
        vec![0x04, 0x01, 0xab]
    );
    let script = Script::new(
        vec![0xa1, 0x1c],
        vec![TypeTag::U8],
        vec![TransactionArgument::U64(3)],
    );
    let payload = TransactionPayload::Script(script);
    let bytes = aptos_bcs::to_bytes(&payload).unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x02, 0xa1, 0x1c, 0x01, 0x01, 0x01, 0x01, 3, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(aptos_bcs::from_bytes::<TransactionPayload>(&bytes).unwrap(), payload);
}

#[test]
fn test_module_bundle_rejected() {
    assert!(aptos_bcs::to_bytes(&TransactionPayload::ModuleBundle).is_err());
    assert!(aptos_bcs::from_bytes::<TransactionPayload>(&[1, 0]).is_err());
    assert!(aptos_bcs::from_bytes::<TransactionPayload>(&[4]).is_err());
}

#[test]
fn test_multisig_payload() {
    let payload = TransactionPayload::Multisig(Multisig {
        multisig_address: AccountAddress::THREE,
        transaction_payload: Some(MultisigTransactionPayload::EntryFunction(transfer(5))),
    });
    let bytes = aptos_bcs::to_bytes(&payload).unwrap();
    assert_eq!(bytes[0], 3);
    assert_eq!(bytes[33], 1);
    assert_eq!(bytes[34], 0);
    assert_eq!(aptos_bcs::from_bytes::<TransactionPayload>(&bytes).unwrap(), payload);

    let without_payload = TransactionPayload::Multisig(Multisig {
        multisig_address: AccountAddress::THREE,
        transaction_payload: None,
    });
    assert_eq!(aptos_bcs::to_bytes(&without_payload).unwrap().len(), 34);
}

#[test]
fn test_invalid_signature() {
    let (ed25519, _, _) = keys();
    let raw_txn = raw_transaction(ed25519.authentication_key().account_address());
    let txn = SignedTransaction::new_ed25519(
        raw_txn,
        (&ed25519).into(),
        Ed25519Signature::try_from(&[1u8; 64][..]).unwrap(),
    );
    assert!(!txn.verify_signature());
    txn.check_signature()
        .expect_err("signature checking should fail");
}

#[test]
fn test_single_signer_transactions() {
    let (ed25519, secp256k1, _) = keys();
    let mut rng = StdRng::from_seed(TEST_SEED);
    let multi_ed25519 = MultiEd25519PrivateKey::generate(&mut rng);
    let signers: Vec<(&dyn TransactionSigner, u8)> =
        vec![(&ed25519, 0), (&multi_ed25519, 1), (&secp256k1, 4)];

    for (signer, variant) in signers {
        let raw_txn = raw_transaction(signer.authentication_key().account_address());
        let signed_txn = raw_txn.clone().sign(signer).unwrap().into_inner();
        assert!(signed_txn.verify_signature());

        let bytes = aptos_bcs::to_bytes(&signed_txn).unwrap();
        let raw_len = aptos_bcs::to_bytes(&raw_txn).unwrap().len();
        assert_eq!(bytes[raw_len], variant);
        let decoded: SignedTransaction = aptos_bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, signed_txn);

        // The signature covers every field.
        let other = raw_transaction(AccountAddress::FOUR);
        let forged = SignedTransaction::new_with_authenticator(other, signed_txn.authenticator());
        assert!(!forged.verify_signature());
    }
}

#[test]
fn test_multi_agent_transaction() {
    let (sender, secondary, _) = keys();
    let secondary_address = secondary.authentication_key().account_address();
    let raw_txn = raw_transaction(sender.authentication_key().account_address());
    let with_data =
        RawTransactionWithData::new_multi_agent(raw_txn.clone(), vec![secondary_address]);

    let sender_auth = with_data.sign(&sender).unwrap();
    let secondary_auth = with_data.sign(&secondary).unwrap();
    let txn = SignedTransaction::new_multi_agent(
        raw_txn.clone(),
        sender_auth.clone(),
        vec![secondary_address],
        vec![secondary_auth.clone()],
    );
    assert!(txn.verify_signature());
    assert_eq!(txn.authenticator().number_of_signatures(), 2);
    assert_eq!(aptos_bcs::to_bytes(txn.authenticator_ref()).unwrap()[0], 2);

    // Secondary signers are part of the signed message.
    let wrong_address = SignedTransaction::new_multi_agent(
        raw_txn.clone(),
        sender_auth.clone(),
        vec![AccountAddress::TWO],
        vec![secondary_auth.clone()],
    );
    assert!(!wrong_address.verify_signature());

    let missing_signer = SignedTransaction::new_multi_agent(
        raw_txn,
        sender_auth,
        vec![secondary_address],
        vec![],
    );
    assert!(!missing_signer.verify_signature());
}

#[test]
fn test_fee_payer_transaction() {
    let (sender, _, fee_payer) = keys();
    let fee_payer_address = fee_payer.authentication_key().account_address();
    let raw_txn = raw_transaction(sender.authentication_key().account_address());

    // The sender signs before the fee payer is known.
    let sender_auth = RawTransactionWithData::new_fee_payer(
        raw_txn.clone(),
        vec![],
        AccountAddress::ZERO,
    )
    .sign(&sender)
    .unwrap();
    let fee_payer_auth =
        RawTransactionWithData::new_fee_payer(raw_txn.clone(), vec![], fee_payer_address)
            .sign(&fee_payer)
            .unwrap();

    let txn = SignedTransaction::new_fee_payer(
        raw_txn.clone(),
        sender_auth.clone(),
        vec![],
        vec![],
        fee_payer_address,
        fee_payer_auth,
    );
    assert!(txn.verify_signature());
    assert_eq!(txn.authenticator().fee_payer_address(), Some(fee_payer_address));
    assert_eq!(aptos_bcs::to_bytes(txn.authenticator_ref()).unwrap()[0], 3);

    // The fee payer must commit to its own address.
    let fee_payer_blind = RawTransactionWithData::new_fee_payer(
        raw_txn.clone(),
        vec![],
        AccountAddress::ZERO,
    )
    .sign(&fee_payer)
    .unwrap();
    let txn = SignedTransaction::new_fee_payer(
        raw_txn,
        sender_auth,
        vec![],
        vec![],
        fee_payer_address,
        fee_payer_blind,
    );
    assert!(!txn.verify_signature());
}

#[test]
fn test_simulation() {
    let (ed25519, secp256k1, _) = keys();
    let raw_txn = raw_transaction(ed25519.authentication_key().account_address());
    let signed = raw_txn.clone().sign(&ed25519).unwrap().into_inner();
    let simulated = signed.simulation();
    assert!(!simulated.verify_signature());
    assert_eq!(
        simulated.authenticator(),
        TransactionAuthenticator::ed25519((&ed25519).into(), Ed25519Signature::dummy_signature())
    );
    assert_eq!(
        aptos_bcs::to_bytes(&simulated).unwrap().len(),
        aptos_bcs::to_bytes(&signed).unwrap().len()
    );

    let txn = SignedTransaction::new_fee_payer(
        raw_txn,
        ed25519.simulation_authenticator(),
        vec![AccountAddress::TWO],
        vec![secp256k1.simulation_authenticator()],
        AccountAddress::ZERO,
        AccountAuthenticator::NoAccountAuthenticator,
    );
    let simulated = txn.simulation();
    assert_eq!(simulated, txn.simulation().simulation());
    assert_eq!(
        simulated.authenticator().fee_payer_signer(),
        Some(AccountAuthenticator::NoAccountAuthenticator)
    );
    assert_eq!(simulated.authenticator().all_signers().len(), 3);
    assert!(!simulated.verify_signature());
}

#[test]
fn test_committed_hash() {
    let (ed25519, _, _) = keys();
    let signed = raw_transaction(AccountAddress::ONE)
        .sign(&ed25519)
        .unwrap()
        .into_inner();
    let mut preimage =
        hex::decode("fa210a9417ef3e7fa45bfa1d17a8dbd4d883711910a550d265fee189e9266dd4").unwrap();
    preimage.push(0);
    preimage.extend(aptos_bcs::to_bytes(&signed).unwrap());
    assert_eq!(
        signed.committed_hash().unwrap(),
        HashValue::sha3_256_of(&preimage)
    );
}

#[test]
fn test_new_picks_transaction_authenticator() {
    let (ed25519, secp256k1, _) = keys();
    let raw_txn = raw_transaction(AccountAddress::ONE);
    let message = raw_txn.signing_message().unwrap();

    let txn = SignedTransaction::new(raw_txn.clone(), ed25519.sign_message(&message).unwrap());
    assert!(matches!(
        txn.authenticator(),
        TransactionAuthenticator::Ed25519 { .. }
    ));
    let txn = SignedTransaction::new(raw_txn, secp256k1.sign_message(&message).unwrap());
    assert!(matches!(
        txn.authenticator(),
        TransactionAuthenticator::SingleSender { .. }
    ));
    assert!(txn.verify_signature());
}

proptest! {
    #[test]
    fn test_sig(seed in any::<[u8; 32]>(), sequence_number in any::<u64>(), amount in any::<u64>()) {
        let key = Ed25519PrivateKey::try_from(&seed[..]).unwrap();
        let raw_txn = RawTransaction::new_entry_function(
            key.authentication_key().account_address(),
            sequence_number,
            transfer(amount),
            100_000,
            100,
            u64::MAX,
            ChainId::test(),
        );
        let txn = raw_txn.sign(&key).unwrap();
        let signed_txn = txn.into_inner();
        prop_assert!(signed_txn.check_signature().is_ok());
    }
}
