// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! The client side of Aptos: local accounts and their signers, the transaction builder, the
//! typed argument marshaller and the boundary to a node transport.

pub mod argument;
pub mod config;
pub mod error;
pub mod transaction_builder;
pub mod transport;
pub mod types;

pub use error::{Error, Result};

pub mod bcs {
    pub use aptos_bcs::*;
}

pub mod crypto {
    pub use aptos_crypto::*;
}

#[cfg(test)]
mod unit_tests;
