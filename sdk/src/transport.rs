// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! The boundary between the client core and a node. Concrete transports (REST, GraphQL, test
//! doubles) implement [`Transport`]; the helpers here only encode requests and forward them.

use crate::{argument::ViewFunction, Result};
use aptos_crypto::HashValue;
use aptos_types::{
    account_address::AccountAddress, chain_id::ChainId,
    transaction::{authenticator::AuthenticationKey, SignedTransaction},
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, trace};

/// Content type of a BCS encoded `SignedTransaction` submission body.
pub const SIGNED_TRANSACTION_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";
/// Content type of a BCS encoded view function request body.
pub const VIEW_FUNCTION_CONTENT_TYPE: &str = "application/x.aptos.view_function+bcs";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("request timed out")]
    Timeout,
    #[error("not found: {0}")]
    NotFound(String),
}

/// On-chain state of an account needed to sign for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub sequence_number: u64,
    pub authentication_key: AuthenticationKey,
}

/// Outcome of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResult {
    pub hash: HashValue,
    pub version: u64,
    pub success: bool,
    pub vm_status: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_chain_id(&self) -> Result<ChainId, TransportError>;

    async fn get_account(&self, address: AccountAddress) -> Result<AccountInfo, TransportError>;

    async fn get_sequence_number(&self, address: AccountAddress) -> Result<u64, TransportError> {
        Ok(self.get_account(address).await?.sequence_number)
    }

    /// Submits a BCS encoded signed transaction, returning its hash.
    async fn submit_signed_transaction(&self, bytes: Vec<u8>) -> Result<HashValue, TransportError>;

    /// Long-polls until the transaction is committed or the transport gives up.
    async fn wait_for_transaction(
        &self,
        hash: HashValue,
    ) -> Result<TransactionResult, TransportError>;

    /// Executes a BCS encoded view request, at `ledger_version` if given.
    async fn view(
        &self,
        body: Vec<u8>,
        ledger_version: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, TransportError>;
}

pub async fn submit_transaction<T: Transport + ?Sized>(
    transport: &T,
    txn: &SignedTransaction,
) -> Result<HashValue> {
    let bytes = aptos_bcs::to_bytes(txn)?;
    debug!(
        sender = %txn.sender(),
        sequence_number = txn.sequence_number(),
        len = bytes.len(),
        "submitting transaction"
    );
    let hash = transport.submit_signed_transaction(bytes).await?;
    trace!(hash = %hash, "transaction accepted");
    Ok(hash)
}

pub async fn submit_and_wait<T: Transport + ?Sized>(
    transport: &T,
    txn: &SignedTransaction,
) -> Result<TransactionResult> {
    let hash = submit_transaction(transport, txn).await?;
    Ok(transport.wait_for_transaction(hash).await?)
}

pub async fn view<T: Transport + ?Sized>(
    transport: &T,
    function: &ViewFunction,
    ledger_version: Option<u64>,
) -> Result<Vec<serde_json::Value>> {
    let body = aptos_bcs::to_bytes(function)?;
    debug!(
        module = %function.module,
        function = %function.function,
        ledger_version = ?ledger_version,
        "calling view function"
    );
    Ok(transport.view(body, ledger_version).await?)
}
