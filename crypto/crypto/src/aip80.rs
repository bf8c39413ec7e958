// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Private key text encoding following AIP-80.
//!
//! A private key is written as `<scheme>-priv-0x<hex>`, e.g. `ed25519-priv-0x1234...`. Parsing
//! also accepts plain hex with or without `0x`. A string tagged with another scheme is rejected
//! rather than silently reinterpreted.

use crate::{
    ed25519::Ed25519PrivateKey, error::CryptoMaterialError, secp256k1::Secp256k1PrivateKey,
    traits::ValidCryptoMaterial,
};

const PRIV_MARKER: &str = "-priv-";

/// Private keys with an AIP-80 string form.
pub trait Aip80PrivateKey: ValidCryptoMaterial {
    /// Scheme prefix including the trailing `-priv-`, e.g. `ed25519-priv-`.
    const AIP80_PREFIX: &'static str;

    /// `<prefix>0x<hex>`
    fn to_aip80_string(&self) -> String {
        format!("{}0x{}", Self::AIP80_PREFIX, hex::encode(self.to_bytes()))
    }

    /// Parses the AIP-80 form, `0x`-prefixed hex or bare hex.
    fn from_aip80_string(value: &str) -> Result<Self, CryptoMaterialError> {
        let value = value.trim();
        let hex_part = if let Some(rest) = value.strip_prefix(Self::AIP80_PREFIX) {
            rest
        } else if let Some(position) = value.find(PRIV_MARKER) {
            return Err(CryptoMaterialError::UnsupportedScheme(
                value[..position].to_string(),
            ));
        } else {
            value
        };
        let hex_part = hex_part.strip_prefix("0x").unwrap_or(hex_part);
        let bytes = hex::decode(hex_part).map_err(|_| CryptoMaterialError::DeserializationError)?;
        Self::try_from(bytes.as_slice())
    }
}

impl Aip80PrivateKey for Ed25519PrivateKey {
    const AIP80_PREFIX: &'static str = "ed25519-priv-";
}

impl Aip80PrivateKey for Secp256k1PrivateKey {
    const AIP80_PREFIX: &'static str = "secp256k1-priv-";
}
