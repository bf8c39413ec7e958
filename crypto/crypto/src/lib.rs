// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! A library supplying the cryptographic primitives used by Aptos accounts: SHA3-256 hashing,
//! Ed25519, ECDSA over secp256k1 and K-of-N MultiEd25519.

pub mod aip80;
pub mod ed25519;
pub mod error;
pub mod hash;
pub mod multi_ed25519;
pub mod secp256k1;
pub mod traits;

#[cfg(test)]
mod unit_tests;

pub mod test_utils;

pub use self::traits::*;
pub use aip80::Aip80PrivateKey;
pub use error::CryptoMaterialError;
pub use hash::HashValue;

// Reexport once_cell for lazily computed hash prefixes in downstream crates
#[doc(hidden)]
pub use once_cell as _once_cell;
