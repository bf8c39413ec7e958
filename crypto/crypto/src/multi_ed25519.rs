// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! This module provides an API for the accountable threshold multi-sig PureEdDSA signature scheme
//! over the ed25519 twisted Edwards curve as defined in [RFC8032](https://tools.ietf.org/html/rfc8032).
//!
//! Signature verification also checks and rejects non-canonical signatures.
//!
//! A `K`-of-`N` public key is written as `pk_0 || ... || pk_{N-1} || K`; a signature as
//! `sig_0 || ... || sig_{M-1} || bitmap`, where the 4-byte bitmap has bit `i` set (most significant
//! bit of the first byte is bit 0) iff key `i` produced one of the signatures. Signatures appear
//! in ascending key order.

use crate::{
    ed25519::{
        Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
        ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
    },
    error::CryptoMaterialError,
    traits::*,
};
use anyhow::{anyhow, Result};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use bit_vec::BitVec;
use once_cell::sync::Lazy;
use rand::Rng;
use std::fmt;

/// Maximum number of keys in a MultiEd25519 key.
pub const MAX_NUM_OF_KEYS: usize = 32;
/// Size of the signature bitmap in bytes.
pub const BITMAP_NUM_OF_BYTES: usize = MAX_NUM_OF_KEYS / 8;
static BITVEC_FIRST_KEY_SET: Lazy<BitVec> =
    Lazy::new(|| BitVec::from_bytes(&[0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000]));

/// Vector of private keys in the multi-key Ed25519 structure along with the threshold.
#[derive(Eq, PartialEq)]
pub struct MultiEd25519PrivateKey {
    private_keys: Vec<Ed25519PrivateKey>,
    threshold: u8,
}

/// Vector of public keys in the multi-key Ed25519 structure along with the threshold.
#[derive(Clone, Eq, PartialEq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

/// Vector of the multi-key signatures along with their index required to map signatures with
/// their corresponding public keys.
#[derive(Clone, Eq, PartialEq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: BitVec,
}

impl MultiEd25519PrivateKey {
    /// Construct a new MultiEd25519PrivateKey.
    pub fn new(
        private_keys: Vec<Ed25519PrivateKey>,
        threshold: u8,
    ) -> std::result::Result<Self, CryptoMaterialError> {
        check_keys_and_threshold(private_keys.len(), threshold)?;
        Ok(MultiEd25519PrivateKey {
            private_keys,
            threshold,
        })
    }

    /// Getter private_keys
    pub fn private_keys(&self) -> &[Ed25519PrivateKey] {
        &self.private_keys
    }

    /// Getter threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Serialize a MultiEd25519PrivateKey.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.private_keys, self.threshold)
    }
}

impl MultiEd25519PublicKey {
    /// Construct a new MultiEd25519PublicKey.
    /// --- Rules ---
    /// a) threshold cannot be zero.
    /// b) public_keys.len() should be equal to or larger than threshold.
    /// c) support up to MAX_NUM_OF_KEYS public keys.
    pub fn new(
        public_keys: Vec<Ed25519PublicKey>,
        threshold: u8,
    ) -> std::result::Result<Self, CryptoMaterialError> {
        check_keys_and_threshold(public_keys.len(), threshold)?;
        Ok(MultiEd25519PublicKey {
            public_keys,
            threshold,
        })
    }

    /// Getter public_keys
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// Getter threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Serialize a MultiEd25519PublicKey.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(&self.public_keys, self.threshold)
    }
}

///////////////////////
// PrivateKey Traits //
///////////////////////

impl PrivateKey for MultiEd25519PrivateKey {
    type PublicKeyMaterial = MultiEd25519PublicKey;
}

impl SigningKey for MultiEd25519PrivateKey {
    type VerifyingKeyMaterial = MultiEd25519PublicKey;
    type SignatureMaterial = MultiEd25519Signature;

    // Sign a message with the minimum amount of keys to meet threshold (starting from left-most keys).
    fn sign_arbitrary_message(
        &self,
        message: &[u8],
    ) -> std::result::Result<MultiEd25519Signature, CryptoMaterialError> {
        let mut bitmap = BitVec::from_elem(MAX_NUM_OF_KEYS, false);
        let signatures = self
            .private_keys
            .iter()
            .take(self.threshold as usize)
            .enumerate()
            .map(|(i, item)| {
                bitmap.set(i, true);
                item.sign(message)
            })
            .collect();
        Ok(MultiEd25519Signature { signatures, bitmap })
    }
}

// Generating a random K out-of N key for testing.
impl Uniform for MultiEd25519PrivateKey {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: ::rand::RngCore + ::rand::CryptoRng,
    {
        let num_of_keys = rng.gen_range(1..=MAX_NUM_OF_KEYS);
        let private_keys = (0..num_of_keys)
            .map(|_| Ed25519PrivateKey::generate(rng))
            .collect();
        let threshold = rng.gen_range(1..=num_of_keys) as u8;
        MultiEd25519PrivateKey {
            private_keys,
            threshold,
        }
    }
}

impl TryFrom<&[u8]> for MultiEd25519PrivateKey {
    type Error = CryptoMaterialError;

    /// Deserialize a MultiEd25519PrivateKey. This method will also check for key and threshold
    /// validity.
    fn try_from(bytes: &[u8]) -> std::result::Result<MultiEd25519PrivateKey, CryptoMaterialError> {
        let threshold = check_and_get_threshold(bytes, ED25519_PRIVATE_KEY_LENGTH)?;

        let private_keys: std::result::Result<Vec<Ed25519PrivateKey>, _> = bytes
            .chunks_exact(ED25519_PRIVATE_KEY_LENGTH)
            .map(Ed25519PrivateKey::try_from)
            .collect();

        private_keys.map(|private_keys| MultiEd25519PrivateKey {
            private_keys,
            threshold,
        })
    }
}

impl Length for MultiEd25519PrivateKey {
    fn length(&self) -> usize {
        self.private_keys.len() * ED25519_PRIVATE_KEY_LENGTH + 1
    }
}

impl ValidCryptoMaterial for MultiEd25519PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl fmt::Debug for MultiEd25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<elided secret for MultiEd25519PrivateKey>")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

/// Convenient method to create a MultiEd25519PublicKey from a single Ed25519PublicKey.
impl From<&Ed25519PublicKey> for MultiEd25519PublicKey {
    fn from(ed_public_key: &Ed25519PublicKey) -> Self {
        MultiEd25519PublicKey {
            public_keys: vec![ed_public_key.clone()],
            threshold: 1u8,
        }
    }
}

/// Implementing From<&PrivateKey<...>> allows to derive a public key in a more elegant fashion.
impl From<&MultiEd25519PrivateKey> for MultiEd25519PublicKey {
    fn from(private_key: &MultiEd25519PrivateKey) -> Self {
        let public_keys = private_key
            .private_keys
            .iter()
            .map(PrivateKey::public_key)
            .collect();
        MultiEd25519PublicKey {
            public_keys,
            threshold: private_key.threshold,
        }
    }
}

/// We deduce PublicKey from this.
impl PublicKey for MultiEd25519PublicKey {
    type PrivateKeyMaterial = MultiEd25519PrivateKey;
}

#[allow(clippy::derive_hash_xor_eq)]
impl std::hash::Hash for MultiEd25519PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let encoded_pubkey = self.to_bytes();
        state.write(&encoded_pubkey);
    }
}

impl TryFrom<&[u8]> for MultiEd25519PublicKey {
    type Error = CryptoMaterialError;

    /// Deserialize a MultiEd25519PublicKey. This method will also check for key and threshold
    /// validity, and will only deserialize keys that are safe against small subgroup attacks.
    fn try_from(bytes: &[u8]) -> std::result::Result<MultiEd25519PublicKey, CryptoMaterialError> {
        let threshold = check_and_get_threshold(bytes, ED25519_PUBLIC_KEY_LENGTH)?;
        let public_keys: std::result::Result<Vec<Ed25519PublicKey>, _> = bytes
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::try_from)
            .collect();
        public_keys.map(|public_keys| MultiEd25519PublicKey {
            public_keys,
            threshold,
        })
    }
}

/// We deduce VerifyingKey from pointing to the signature material
/// we get the ability to do `pubkey.verify_signature(msg, signature)`
impl VerifyingKey for MultiEd25519PublicKey {
    type SigningKeyMaterial = MultiEd25519PrivateKey;
    type SignatureMaterial = MultiEd25519Signature;
}

impl fmt::Display for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519PublicKey({})", self)
    }
}

impl Length for MultiEd25519PublicKey {
    fn length(&self) -> usize {
        self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1
    }
}

impl ValidCryptoMaterial for MultiEd25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl MultiEd25519Signature {
    /// Builds a signature from `(signature, key index)` pairs. Signatures are sorted by index;
    /// duplicate and out of range indices are rejected.
    pub fn new(
        signatures: Vec<(Ed25519Signature, u8)>,
    ) -> std::result::Result<Self, CryptoMaterialError> {
        let num_of_sigs = signatures.len();
        if num_of_sigs == 0 || num_of_sigs > MAX_NUM_OF_KEYS {
            return Err(CryptoMaterialError::ValidationError);
        }

        let mut sorted_signatures = signatures;
        sorted_signatures.sort_by(|a, b| a.1.cmp(&b.1));

        let mut sigvec = Vec::with_capacity(num_of_sigs);
        let mut bitmap = BitVec::from_elem(MAX_NUM_OF_KEYS, false);

        for (signature, index) in sorted_signatures {
            let index = index as usize;
            if index >= MAX_NUM_OF_KEYS {
                return Err(CryptoMaterialError::BitVecError(
                    "Signature index is out of range".to_string(),
                ));
            }
            if bitmap[index] {
                return Err(CryptoMaterialError::BitVecError(
                    "Duplicate signature index".to_string(),
                ));
            }
            sigvec.push(signature);
            bitmap.set(index, true);
        }
        Ok(MultiEd25519Signature {
            signatures: sigvec,
            bitmap,
        })
    }

    /// A simulation placeholder: `threshold` all-zero signatures attributed to the first
    /// `threshold` keys of `public_key`.
    pub fn dummy(public_key: &MultiEd25519PublicKey) -> Self {
        let mut bitmap = BitVec::from_elem(MAX_NUM_OF_KEYS, false);
        let signatures = (0..public_key.threshold as usize)
            .map(|i| {
                bitmap.set(i, true);
                Ed25519Signature::dummy_signature()
            })
            .collect();
        MultiEd25519Signature { signatures, bitmap }
    }

    /// Getter signatures
    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    /// The 4-byte bitmap, most significant bit first.
    pub fn bitmap(&self) -> [u8; BITMAP_NUM_OF_BYTES] {
        let mut bytes = [0u8; BITMAP_NUM_OF_BYTES];
        bytes.copy_from_slice(&self.bitmap.to_bytes());
        bytes
    }

    /// Indices of the keys that signed, in ascending order.
    pub fn signer_indices(&self) -> Vec<usize> {
        self.bitmap
            .iter()
            .enumerate()
            .filter_map(|(i, bit)| if bit { Some(i) } else { None })
            .collect()
    }

    /// Serialize a MultiEd25519Signature in the form of sig0||sig1||..sigN||bitmap.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .signatures
            .iter()
            .flat_map(|sig| sig.to_bytes().to_vec())
            .collect();
        bytes.extend(self.bitmap.to_bytes());
        bytes
    }
}

//////////////////////
// Signature Traits //
//////////////////////

impl TryFrom<&[u8]> for MultiEd25519Signature {
    type Error = CryptoMaterialError;

    /// Deserialize a MultiEd25519Signature. This method will also check for malleable signatures
    /// and bitmap validity.
    fn try_from(bytes: &[u8]) -> std::result::Result<MultiEd25519Signature, CryptoMaterialError> {
        let length = bytes.len();
        let bitmap_num_of_bytes = length % ED25519_SIGNATURE_LENGTH;
        let num_of_sigs = length / ED25519_SIGNATURE_LENGTH;

        if num_of_sigs == 0
            || num_of_sigs > MAX_NUM_OF_KEYS
            || bitmap_num_of_bytes != BITMAP_NUM_OF_BYTES
        {
            return Err(CryptoMaterialError::WrongLengthError);
        }

        let bitmap = BitVec::from_bytes(&bytes[length - BITMAP_NUM_OF_BYTES..]);
        if count_set_bits(&bitmap) != num_of_sigs {
            return Err(CryptoMaterialError::BitVecError(
                "Number of signatures does not match the bitmap".to_string(),
            ));
        }

        let signatures: std::result::Result<Vec<Ed25519Signature>, _> = bytes
            .chunks_exact(ED25519_SIGNATURE_LENGTH)
            .map(Ed25519Signature::try_from)
            .collect();
        signatures.map(|signatures| MultiEd25519Signature { signatures, bitmap })
    }
}

impl Length for MultiEd25519Signature {
    fn length(&self) -> usize {
        self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_NUM_OF_BYTES
    }
}

#[allow(clippy::derive_hash_xor_eq)]
impl std::hash::Hash for MultiEd25519Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let encoded_signature = self.to_bytes();
        state.write(&encoded_signature);
    }
}

impl fmt::Display for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.to_bytes()[..]))
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519Signature({})", self)
    }
}

impl ValidCryptoMaterial for MultiEd25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl Signature for MultiEd25519Signature {
    type VerifyingKeyMaterial = MultiEd25519PublicKey;
    type SigningKeyMaterial = MultiEd25519PrivateKey;

    /// Checks that `self` is valid for an arbitrary &[u8] `message` using `public_key`.
    ///
    /// The bitmap must select exactly as many keys as there are signatures, every selected index
    /// must exist in `public_key`, at least `threshold` keys must be selected, and every signature
    /// must verify against the key at its index. Extra signatures beyond the threshold are not
    /// ignored: one that fails makes the whole signature fail.
    fn verify_arbitrary_msg(
        &self,
        message: &[u8],
        public_key: &MultiEd25519PublicKey,
    ) -> Result<()> {
        let indices = self.signer_indices();
        if indices.len() != self.signatures.len() {
            return Err(anyhow!(
                "{}",
                CryptoMaterialError::BitVecError(
                    "Number of signatures does not match the bitmap".to_string()
                )
            ));
        }
        if indices
            .last()
            .map_or(false, |last| *last >= public_key.public_keys.len())
        {
            return Err(anyhow!(
                "{}",
                CryptoMaterialError::BitVecError("Signature index is out of range".to_string())
            ));
        }
        if indices.len() < public_key.threshold as usize {
            return Err(anyhow!(
                "{}",
                CryptoMaterialError::BitVecError(
                    "Not enough signatures to meet the threshold".to_string()
                )
            ));
        }
        // Bitmap iteration yields indices in ascending order, matching the signature order.
        for (sig, index) in self.signatures.iter().zip(indices) {
            sig.verify_arbitrary_msg(message, &public_key.public_keys[index])?;
        }
        Ok(())
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl From<&Ed25519Signature> for MultiEd25519Signature {
    fn from(ed_signature: &Ed25519Signature) -> Self {
        MultiEd25519Signature {
            signatures: vec![ed_signature.clone()],
            bitmap: BITVEC_FIRST_KEY_SET.clone(),
        }
    }
}

/////////
// BCS //
/////////

// Both the key and the signature are written as a single length-prefixed byte vector.

impl CanonicalSerialize for MultiEd25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_bytes(&self.to_bytes());
    }
}

impl CanonicalDeserialize for MultiEd25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let bytes = deserializer.decode_bytes();
        deserializer.check()?;
        MultiEd25519PublicKey::try_from(bytes.as_slice()).map_err(aptos_bcs::Error::custom)
    }
}

impl CanonicalSerialize for MultiEd25519Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_bytes(&self.to_bytes());
    }
}

impl CanonicalDeserialize for MultiEd25519Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let bytes = deserializer.decode_bytes();
        deserializer.check()?;
        MultiEd25519Signature::try_from(bytes.as_slice()).map_err(aptos_bcs::Error::custom)
    }
}

//////////////////////
// Helper functions //
//////////////////////

// Helper function required to MultiEd25519 keys to_bytes to add the threshold.
fn to_bytes<T: ValidCryptoMaterial>(keys: &[T], threshold: u8) -> Vec<u8> {
    let mut bytes: Vec<u8> = keys.iter().flat_map(ValidCryptoMaterial::to_bytes).collect();
    bytes.push(threshold);
    bytes
}

// Helper method to count bitmap's set bits in MultiEd25519 signatures.
fn count_set_bits(bitmap: &BitVec) -> usize {
    bitmap.iter().filter(|bit| *bit).count()
}

fn check_keys_and_threshold(
    num_of_keys: usize,
    threshold: u8,
) -> std::result::Result<(), CryptoMaterialError> {
    if threshold == 0 || num_of_keys < threshold as usize {
        Err(CryptoMaterialError::ValidationError)
    } else if num_of_keys > MAX_NUM_OF_KEYS {
        Err(CryptoMaterialError::WrongLengthError)
    } else {
        Ok(())
    }
}

// Helper method to get threshold from a serialized MultiEd25519 key payload.
fn check_and_get_threshold(
    bytes: &[u8],
    key_size: usize,
) -> std::result::Result<u8, CryptoMaterialError> {
    let payload_length = bytes.len();
    if bytes.is_empty() {
        return Err(CryptoMaterialError::WrongLengthError);
    }
    let threshold_num_of_bytes = payload_length % key_size;
    let num_of_keys = payload_length / key_size;
    let threshold_byte = bytes[bytes.len() - 1];

    if num_of_keys == 0 || num_of_keys > MAX_NUM_OF_KEYS || threshold_num_of_bytes != 1 {
        Err(CryptoMaterialError::WrongLengthError)
    } else if threshold_byte == 0 || threshold_byte as usize > num_of_keys {
        Err(CryptoMaterialError::ValidationError)
    } else {
        Ok(threshold_byte)
    }
}
