// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! ECDSA over secp256k1 as used by Aptos single-key accounts.
//!
//! The message is hashed with SHA3-256 before signing; signatures are the 64-byte compact form
//! `r || s` and must have a low `s` (`s <= n / 2`). Public keys are 65-byte SEC1 uncompressed
//! points (`0x04 || X || Y`).

use crate::{
    error::CryptoMaterialError,
    hash::HashValue,
    traits::{self, Length, Uniform, ValidCryptoMaterial},
};
use anyhow::{anyhow, Result};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use std::fmt;

/// The length of the Secp256k1PrivateKey
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;
/// The length of an uncompressed Secp256k1PublicKey
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 65;
/// The length of a compact Secp256k1Signature
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// A secp256k1 ECDSA private key
pub struct Secp256k1PrivateKey(k256::ecdsa::SigningKey);

#[cfg(any(test, feature = "cloneable-private-keys"))]
impl Clone for Secp256k1PrivateKey {
    fn clone(&self) -> Self {
        Secp256k1PrivateKey(self.0.clone())
    }
}

/// A secp256k1 ECDSA public key
#[derive(Clone)]
pub struct Secp256k1PublicKey(k256::ecdsa::VerifyingKey);

/// A secp256k1 ECDSA signature in compact `r || s` form. Values obtained from signing or from
/// [`TryFrom`] are always in low-S form.
#[derive(Clone)]
pub struct Secp256k1Signature([u8; SECP256K1_SIGNATURE_LENGTH]);

impl Secp256k1PrivateKey {
    /// The length of the Secp256k1PrivateKey
    pub const LENGTH: usize = SECP256K1_PRIVATE_KEY_LENGTH;

    /// Serialize a Secp256k1PrivateKey.
    pub fn to_bytes(&self) -> [u8; SECP256K1_PRIVATE_KEY_LENGTH] {
        let mut bytes = [0u8; SECP256K1_PRIVATE_KEY_LENGTH];
        bytes.copy_from_slice(&self.0.to_bytes());
        bytes
    }

    /// Signs `SHA3-256(message)`. The resulting signature is normalized to low-S.
    pub fn sign(
        &self,
        message: &[u8],
    ) -> std::result::Result<Secp256k1Signature, CryptoMaterialError> {
        let digest = HashValue::sha3_256_of(message);
        let signature: k256::ecdsa::Signature = self
            .0
            .sign_prehash(&digest[..])
            .map_err(|_| CryptoMaterialError::SerializationError)?;
        Ok(Secp256k1Signature::from_k256(
            &signature.normalize_s().unwrap_or(signature),
        ))
    }
}

impl Secp256k1PublicKey {
    /// The length of the Secp256k1PublicKey
    pub const LENGTH: usize = SECP256K1_PUBLIC_KEY_LENGTH;

    /// Serialize a Secp256k1PublicKey in uncompressed SEC1 form.
    pub fn to_bytes(&self) -> [u8; SECP256K1_PUBLIC_KEY_LENGTH] {
        let point = self.0.to_encoded_point(false);
        let mut bytes = [0u8; SECP256K1_PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(point.as_bytes());
        bytes
    }
}

impl Secp256k1Signature {
    /// The length of the Secp256k1Signature
    pub const LENGTH: usize = SECP256K1_SIGNATURE_LENGTH;

    /// Serialize a Secp256k1Signature as `r || s`.
    pub fn to_bytes(&self) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        self.0
    }

    /// An all-zero signature for transaction simulation. It is not a valid ECDSA signature and
    /// never verifies.
    pub fn dummy_signature() -> Self {
        Secp256k1Signature([0u8; SECP256K1_SIGNATURE_LENGTH])
    }

    fn from_k256(signature: &k256::ecdsa::Signature) -> Self {
        let mut bytes = [0u8; SECP256K1_SIGNATURE_LENGTH];
        bytes.copy_from_slice(&signature.to_bytes());
        Secp256k1Signature(bytes)
    }

    /// Parses `r || s`, requiring both scalars in range and `s` in the lower half of the order.
    fn parse_compact(
        bytes: &[u8],
    ) -> std::result::Result<k256::ecdsa::Signature, CryptoMaterialError> {
        let signature = k256::ecdsa::Signature::from_slice(bytes)
            .map_err(|_| CryptoMaterialError::DeserializationError)?;
        if signature.normalize_s().is_some() {
            return Err(CryptoMaterialError::CanonicalRepresentationError);
        }
        Ok(signature)
    }
}

///////////////////////
// PrivateKey Traits //
///////////////////////

impl traits::PrivateKey for Secp256k1PrivateKey {
    type PublicKeyMaterial = Secp256k1PublicKey;
}

impl traits::SigningKey for Secp256k1PrivateKey {
    type VerifyingKeyMaterial = Secp256k1PublicKey;
    type SignatureMaterial = Secp256k1Signature;

    fn sign_arbitrary_message(
        &self,
        message: &[u8],
    ) -> std::result::Result<Secp256k1Signature, CryptoMaterialError> {
        self.sign(message)
    }
}

impl Uniform for Secp256k1PrivateKey {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: ::rand::RngCore + ::rand::CryptoRng,
    {
        Secp256k1PrivateKey(k256::ecdsa::SigningKey::random(rng))
    }
}

impl PartialEq for Secp256k1PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Secp256k1PrivateKey {}

impl TryFrom<&[u8]> for Secp256k1PrivateKey {
    type Error = CryptoMaterialError;

    /// Zero and values at or above the group order are rejected.
    fn try_from(bytes: &[u8]) -> std::result::Result<Secp256k1PrivateKey, CryptoMaterialError> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(Secp256k1PrivateKey)
            .map_err(|_| CryptoMaterialError::ValidationError)
    }
}

impl Length for Secp256k1PrivateKey {
    fn length(&self) -> usize {
        Self::LENGTH
    }
}

impl ValidCryptoMaterial for Secp256k1PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<elided secret for Secp256k1PrivateKey>")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

impl From<&Secp256k1PrivateKey> for Secp256k1PublicKey {
    fn from(private_key: &Secp256k1PrivateKey) -> Self {
        Secp256k1PublicKey(*private_key.0.verifying_key())
    }
}

impl traits::PublicKey for Secp256k1PublicKey {
    type PrivateKeyMaterial = Secp256k1PrivateKey;
}

impl traits::VerifyingKey for Secp256k1PublicKey {
    type SigningKeyMaterial = Secp256k1PrivateKey;
    type SignatureMaterial = Secp256k1Signature;
}

impl std::hash::Hash for Secp256k1PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl PartialEq for Secp256k1PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes()[..] == other.to_bytes()[..]
    }
}

impl Eq for Secp256k1PublicKey {}

impl TryFrom<&[u8]> for Secp256k1PublicKey {
    type Error = CryptoMaterialError;

    /// Only the 65-byte uncompressed encoding is accepted; the point must lie on the curve.
    fn try_from(bytes: &[u8]) -> std::result::Result<Secp256k1PublicKey, CryptoMaterialError> {
        if bytes.len() != SECP256K1_PUBLIC_KEY_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        if bytes[0] != 0x04 {
            return Err(CryptoMaterialError::DeserializationError);
        }
        k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
            .map(Secp256k1PublicKey)
            .map_err(|_| CryptoMaterialError::PointNotOnCurveError)
    }
}

impl Length for Secp256k1PublicKey {
    fn length(&self) -> usize {
        SECP256K1_PUBLIC_KEY_LENGTH
    }
}

impl ValidCryptoMaterial for Secp256k1PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self)
    }
}

//////////////////////
// Signature Traits //
//////////////////////

impl traits::Signature for Secp256k1Signature {
    type VerifyingKeyMaterial = Secp256k1PublicKey;
    type SigningKeyMaterial = Secp256k1PrivateKey;

    /// High-S signatures are rejected even though ECDSA would accept them.
    fn verify_arbitrary_msg(&self, message: &[u8], public_key: &Secp256k1PublicKey) -> Result<()> {
        let signature =
            Secp256k1Signature::parse_compact(&self.0).map_err(|e| anyhow!("{}", e))?;
        let digest = HashValue::sha3_256_of(message);
        public_key
            .0
            .verify_prehash(&digest[..], &signature)
            .map_err(|e| anyhow!("{}", e))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl TryFrom<&[u8]> for Secp256k1Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> std::result::Result<Secp256k1Signature, CryptoMaterialError> {
        if bytes.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        Secp256k1Signature::parse_compact(bytes)
            .map(|signature| Secp256k1Signature::from_k256(&signature))
    }
}

impl Length for Secp256k1Signature {
    fn length(&self) -> usize {
        SECP256K1_SIGNATURE_LENGTH
    }
}

impl ValidCryptoMaterial for Secp256k1Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl std::hash::Hash for Secp256k1Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl PartialEq for Secp256k1Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes()[..] == other.to_bytes()[..]
    }
}

impl Eq for Secp256k1Signature {}

impl fmt::Display for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature({})", self)
    }
}

/////////
// BCS //
/////////

impl CanonicalSerialize for Secp256k1PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_bytes(&self.to_bytes());
    }
}

impl CanonicalDeserialize for Secp256k1PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let bytes = deserializer.decode_bytes();
        deserializer.check()?;
        Secp256k1PublicKey::try_from(bytes.as_slice()).map_err(aptos_bcs::Error::custom)
    }
}

impl CanonicalSerialize for Secp256k1Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_bytes(&self.to_bytes());
    }
}

impl CanonicalDeserialize for Secp256k1Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let bytes = deserializer.decode_bytes();
        deserializer.check()?;
        Secp256k1Signature::try_from(bytes.as_slice()).map_err(aptos_bcs::Error::custom)
    }
}
