// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    argument::ViewFunction,
    config::{TransactionConfig, TransactionOption},
    transaction_builder::{
        build_transaction, TransactionBuilder, TransactionFactory, UnsignedTransaction,
    },
    transport::{self, AccountInfo, TransactionResult, Transport, TransportError},
    types::LocalAccount,
    Error,
};
use aptos_crypto::{test_utils::TEST_SEED, HashValue};
use aptos_types::{
    account_address::AccountAddress,
    chain_id::ChainId,
    identifier::Identifier,
    language_storage::{ModuleId, StructTag, TypeTag},
    transaction::{
        authenticator::AuthenticationKey, EntryFunction, SignedTransaction, TransactionPayload,
    },
};
use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

struct MockTransport {
    chain_id: ChainId,
    sequence_number: u64,
    fetches: AtomicUsize,
    submitted: Mutex<Vec<Vec<u8>>>,
    views: Mutex<Vec<(Vec<u8>, Option<u64>)>>,
}

impl MockTransport {
    fn new() -> Self {
        Self {
            chain_id: ChainId::testnet(),
            sequence_number: 11,
            fetches: AtomicUsize::new(0),
            submitted: Mutex::new(vec![]),
            views: Mutex::new(vec![]),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_chain_id(&self) -> Result<ChainId, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain_id)
    }

    async fn get_account(&self, address: AccountAddress) -> Result<AccountInfo, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if address == AccountAddress::ZERO {
            return Err(TransportError::NotFound(address.to_string()));
        }
        Ok(AccountInfo {
            sequence_number: self.sequence_number,
            authentication_key: AuthenticationKey::new(address.into_bytes()),
        })
    }

    async fn submit_signed_transaction(&self, bytes: Vec<u8>) -> Result<HashValue, TransportError> {
        let hash = HashValue::sha3_256_of(&bytes);
        self.submitted
            .lock()
            .map_err(|e| TransportError::Network(e.to_string()))?
            .push(bytes);
        Ok(hash)
    }

    async fn wait_for_transaction(
        &self,
        hash: HashValue,
    ) -> Result<TransactionResult, TransportError> {
        Ok(TransactionResult {
            hash,
            version: 1,
            success: true,
            vm_status: "Executed successfully".to_string(),
        })
    }

    async fn view(
        &self,
        body: Vec<u8>,
        ledger_version: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, TransportError> {
        self.views
            .lock()
            .map_err(|e| TransportError::Network(e.to_string()))?
            .push((body, ledger_version));
        Ok(vec![serde_json::Value::String("100".to_string())])
    }
}

fn payload() -> TransactionPayload {
    TransactionPayload::EntryFunction(EntryFunction::new(
        ModuleId::new(AccountAddress::ONE, Identifier::new("aptos_account").unwrap()),
        Identifier::new("transfer").unwrap(),
        vec![],
        vec![
            aptos_bcs::to_bytes(&AccountAddress::TWO).unwrap(),
            aptos_bcs::to_bytes(&5u64).unwrap(),
        ],
    ))
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[test]
fn test_builder_requires_sender_and_sequence_number() {
    let builder = TransactionBuilder::new(payload(), 100, ChainId::test());
    assert!(matches!(builder.build(), Err(Error::Config(_))));

    let builder =
        TransactionBuilder::new(payload(), 100, ChainId::test()).sender(AccountAddress::TWO);
    assert!(matches!(builder.build(), Err(Error::Config(_))));

    let txn = TransactionBuilder::new(payload(), 100, ChainId::test())
        .sender(AccountAddress::TWO)
        .sequence_number(4)
        .gas_unit_price(150)
        .build()
        .unwrap();
    assert_eq!(txn.sender(), AccountAddress::TWO);
    assert_eq!(txn.sequence_number(), 4);
    assert_eq!(txn.max_gas_amount(), 100_000);
    assert_eq!(txn.gas_unit_price(), 150);
    assert_eq!(txn.expiration_timestamp_secs(), 100);
}

#[test]
fn test_factory_expiration() {
    let before = now();
    let txn = TransactionFactory::new(ChainId::test())
        .with_transaction_expiration_time(60)
        .payload(payload())
        .unwrap()
        .sender(AccountAddress::TWO)
        .sequence_number(0)
        .build()
        .unwrap();
    assert!(txn.expiration_timestamp_secs() >= before + 60);
    assert!(txn.expiration_timestamp_secs() <= now() + 60);

    assert!(matches!(
        TransactionFactory::new(ChainId::test())
            .with_transaction_expiration_time(u64::MAX)
            .payload(payload()),
        Err(Error::Config(_))
    ));
}

#[tokio::test]
async fn test_build_fetches_missing_fields() {
    let transport = MockTransport::new();
    let before = now();
    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &TransactionConfig::default(),
        &[],
    )
    .await
    .unwrap();

    assert_eq!(transport.fetches(), 2);
    let raw_txn = match &txn {
        UnsignedTransaction::Raw(raw_txn) => raw_txn,
        other => panic!("unexpected transaction {:?}", other),
    };
    assert_eq!(raw_txn.sequence_number(), 11);
    assert_eq!(raw_txn.chain_id(), ChainId::testnet());
    assert_eq!(raw_txn.max_gas_amount(), 100_000);
    assert_eq!(raw_txn.gas_unit_price(), 100);
    assert!(raw_txn.expiration_timestamp_secs() >= before + 300);
    assert!(raw_txn.expiration_timestamp_secs() <= now() + 300);
    assert!(txn.secondary_signer_addresses().is_empty());
    assert_eq!(txn.fee_payer_address(), None);
}

#[tokio::test]
async fn test_build_with_options() {
    let transport = MockTransport::new();
    let config = TransactionConfig::default().with_chain_id(ChainId::test());
    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &config,
        &[
            TransactionOption::SequenceNumber(3),
            TransactionOption::MaxGasAmount(2_000),
            TransactionOption::GasUnitPrice(101),
            TransactionOption::MaxGasAmount(3_000),
        ],
    )
    .await
    .unwrap();

    assert_eq!(transport.fetches(), 0);
    let raw_txn = txn.into_raw_transaction();
    assert_eq!(raw_txn.sequence_number(), 3);
    assert_eq!(raw_txn.chain_id(), ChainId::test());
    assert_eq!(raw_txn.max_gas_amount(), 3_000);
    assert_eq!(raw_txn.gas_unit_price(), 101);

    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &TransactionConfig::default(),
        &[TransactionOption::ChainId(ChainId::mainnet())],
    )
    .await
    .unwrap();
    assert_eq!(transport.fetches(), 1);
    assert_eq!(txn.raw_txn().chain_id(), ChainId::mainnet());
}

#[tokio::test]
async fn test_build_multi_agent_and_fee_payer() {
    let transport = MockTransport::new();
    let config = TransactionConfig::default();
    let secondary = vec![AccountAddress::from_str_relaxed("0xabc").unwrap()];

    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &config,
        &[TransactionOption::AdditionalSigners(secondary.clone())],
    )
    .await
    .unwrap();
    assert!(matches!(txn, UnsignedTransaction::WithData(_)));
    assert_eq!(txn.secondary_signer_addresses(), &secondary[..]);
    assert_eq!(txn.fee_payer_address(), None);

    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &config,
        &[TransactionOption::FeePayer(AccountAddress::ZERO)],
    )
    .await
    .unwrap();
    assert!(txn.secondary_signer_addresses().is_empty());
    assert_eq!(txn.fee_payer_address(), Some(AccountAddress::ZERO));

    let txn = build_transaction(
        &transport,
        AccountAddress::TWO,
        payload(),
        &config,
        &[
            TransactionOption::AdditionalSigners(secondary.clone()),
            TransactionOption::FeePayer(AccountAddress::THREE),
        ],
    )
    .await
    .unwrap();
    assert_eq!(txn.secondary_signer_addresses(), &secondary[..]);
    assert_eq!(txn.fee_payer_address(), Some(AccountAddress::THREE));
    assert_ne!(
        txn.signing_message().unwrap(),
        txn.raw_txn().signing_message().unwrap()
    );
}

#[tokio::test]
async fn test_build_propagates_transport_errors() {
    let transport = MockTransport::new();
    let result = build_transaction(
        &transport,
        AccountAddress::ZERO,
        payload(),
        &TransactionConfig::default(),
        &[],
    )
    .await;
    assert!(matches!(
        result,
        Err(Error::Transport(TransportError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_build_sign_and_submit() {
    let transport = MockTransport::new();
    let mut rng = StdRng::from_seed(TEST_SEED);
    let account = LocalAccount::generate(&mut rng);

    let unsigned = build_transaction(
        &transport,
        account.address(),
        payload(),
        &TransactionConfig::default(),
        &[],
    )
    .await
    .unwrap();
    let authenticator = account.sign_unsigned_transaction(&unsigned).unwrap();
    let txn = SignedTransaction::new(unsigned.into_raw_transaction(), authenticator);
    assert!(txn.verify_signature());

    let result = transport::submit_and_wait(&transport, &txn).await.unwrap();
    assert!(result.success);

    let submitted = transport.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(result.hash, HashValue::sha3_256_of(&submitted[0]));
    let decoded: SignedTransaction = aptos_bcs::from_bytes(&submitted[0]).unwrap();
    assert_eq!(decoded, txn);
}

#[tokio::test]
async fn test_view() {
    let transport = MockTransport::new();
    let function = ViewFunction {
        module: ModuleId::new(AccountAddress::ONE, Identifier::new("coin").unwrap()),
        function: Identifier::new("balance").unwrap(),
        ty_args: vec![TypeTag::Struct(Box::new(StructTag::aptos_coin()))],
        args: vec![aptos_bcs::to_bytes(&AccountAddress::TWO).unwrap()],
    };

    let values = transport::view(&transport, &function, Some(7)).await.unwrap();
    assert_eq!(values, vec![serde_json::json!("100")]);

    let views = transport.views.lock().unwrap();
    assert_eq!(
        views.as_slice(),
        &[(aptos_bcs::to_bytes(&function).unwrap(), Some(7))]
    );
}
