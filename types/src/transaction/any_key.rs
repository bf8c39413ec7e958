// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scheme-tagged keys and signatures used by single-key and multi-key accounts.

use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use aptos_crypto::{
    ed25519::{Ed25519PublicKey, Ed25519Signature},
    secp256k1::{Secp256k1PublicKey, Secp256k1Signature},
    Signature,
};
use std::fmt;

/// The public part of a keyless (OpenID based) account.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct KeylessPublicKey {
    /// The `iss` claim of the identity provider.
    pub iss_val: String,
    /// The identity commitment.
    pub idc: Vec<u8>,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum AnyPublicKey {
    Ed25519 { public_key: Ed25519PublicKey },
    Secp256k1Ecdsa { public_key: Secp256k1PublicKey },
    Keyless { public_key: KeylessPublicKey },
}

/// Keyless signatures are carried as their already-encoded bytes, written length prefixed. They
/// are produced and checked by the identity provider flow, never by local keys.
#[derive(Clone, Hash, Eq, PartialEq)]
pub enum AnySignature {
    Ed25519 { signature: Ed25519Signature },
    Secp256k1Ecdsa { signature: Secp256k1Signature },
    Keyless { signature: Vec<u8> },
}

impl AnyPublicKey {
    pub fn ed25519(public_key: Ed25519PublicKey) -> Self {
        Self::Ed25519 { public_key }
    }

    pub fn secp256k1_ecdsa(public_key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1Ecdsa { public_key }
    }

    pub fn keyless(public_key: KeylessPublicKey) -> Self {
        Self::Keyless { public_key }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.serialize(&mut serializer);
        // Every field of a public key is representable.
        serializer.into_bytes().unwrap_or_default()
    }
}

impl AnySignature {
    pub fn ed25519(signature: Ed25519Signature) -> Self {
        Self::Ed25519 { signature }
    }

    pub fn secp256k1_ecdsa(signature: Secp256k1Signature) -> Self {
        Self::Secp256k1Ecdsa { signature }
    }

    /// Verifies `message` under `public_key`. A signature of a different scheme than the key
    /// never verifies.
    pub fn verify(&self, message: &[u8], public_key: &AnyPublicKey) -> bool {
        match (self, public_key) {
            (Self::Ed25519 { signature }, AnyPublicKey::Ed25519 { public_key }) => signature
                .verify_arbitrary_msg(message, public_key)
                .is_ok(),
            (Self::Secp256k1Ecdsa { signature }, AnyPublicKey::Secp256k1Ecdsa { public_key }) => {
                signature.verify_arbitrary_msg(message, public_key).is_ok()
            }
            _ => false,
        }
    }

    /// A zero signature of the scheme of `public_key`, for transaction simulation.
    pub fn simulation_for(public_key: &AnyPublicKey) -> Self {
        match public_key {
            AnyPublicKey::Ed25519 { .. } => Self::ed25519(Ed25519Signature::dummy_signature()),
            AnyPublicKey::Secp256k1Ecdsa { .. } => {
                Self::secp256k1_ecdsa(Secp256k1Signature::dummy_signature())
            }
            AnyPublicKey::Keyless { .. } => Self::Keyless { signature: vec![] },
        }
    }
}

impl fmt::Debug for AnySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 { signature } => write!(f, "Ed25519({:?})", signature),
            Self::Secp256k1Ecdsa { signature } => write!(f, "Secp256k1Ecdsa({:?})", signature),
            Self::Keyless { signature } => write!(f, "Keyless({})", hex::encode(signature)),
        }
    }
}

impl CanonicalSerialize for KeylessPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_str(&self.iss_val).encode_bytes(&self.idc);
    }
}

impl CanonicalDeserialize for KeylessPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let iss_val = deserializer.decode_string();
        let idc = deserializer.decode_bytes();
        deserializer.check().map(|_| KeylessPublicKey { iss_val, idc })
    }
}

impl CanonicalSerialize for AnyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519 { public_key } => {
                serializer.encode_variant_index(0).encode_struct(public_key);
            }
            Self::Secp256k1Ecdsa { public_key } => {
                serializer.encode_variant_index(1).encode_struct(public_key);
            }
            Self::Keyless { public_key } => {
                serializer.encode_variant_index(3).encode_struct(public_key);
            }
        }
    }
}

impl CanonicalDeserialize for AnyPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        match deserializer.decode_variant_index() {
            0 => Ok(Self::ed25519(deserializer.decode_struct()?)),
            1 => Ok(Self::secp256k1_ecdsa(deserializer.decode_struct()?)),
            3 => Ok(Self::keyless(deserializer.decode_struct()?)),
            index => {
                deserializer.check()?;
                Err(aptos_bcs::Error::unknown_variant("AnyPublicKey", index))
            }
        }
    }
}

impl CanonicalSerialize for AnySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519 { signature } => {
                serializer.encode_variant_index(0).encode_struct(signature);
            }
            Self::Secp256k1Ecdsa { signature } => {
                serializer.encode_variant_index(1).encode_struct(signature);
            }
            Self::Keyless { signature } => {
                serializer.encode_variant_index(3).encode_bytes(signature);
            }
        }
    }
}

impl CanonicalDeserialize for AnySignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        match deserializer.decode_variant_index() {
            0 => Ok(Self::ed25519(deserializer.decode_struct()?)),
            1 => Ok(Self::secp256k1_ecdsa(deserializer.decode_struct()?)),
            3 => {
                let signature = deserializer.decode_bytes();
                deserializer.check().map(|_| Self::Keyless { signature })
            }
            index => {
                deserializer.check()?;
                Err(aptos_bcs::Error::unknown_variant("AnySignature", index))
            }
        }
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(public_key: Ed25519PublicKey) -> Self {
        Self::ed25519(public_key)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(public_key: Secp256k1PublicKey) -> Self {
        Self::secp256k1_ecdsa(public_key)
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(signature: Ed25519Signature) -> Self {
        Self::ed25519(signature)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(signature: Secp256k1Signature) -> Self {
        Self::secp256k1_ecdsa(signature)
    }
}
