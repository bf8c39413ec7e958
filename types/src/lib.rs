// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Core Aptos data types: account addresses, Move type tags, authenticators and transactions,
//! together with their canonical BCS encodings.

pub mod account_address;
pub mod chain_id;
pub mod identifier;
pub mod language_storage;
pub mod parser;
#[cfg(any(test, feature = "fuzzing"))]
pub mod test_helpers;
pub mod transaction;

#[cfg(test)]
mod unit_tests;
