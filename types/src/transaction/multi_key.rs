// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! K-of-N accounts whose keys may mix signature schemes.
//!
//! The signature bitmap is a byte vector read most significant bit first: bit `i` marks key `i`
//! as a signer. It is kept as short as possible, so two signers out of three keys give `[0xc0]`.

use crate::transaction::{
    any_key::{AnyPublicKey, AnySignature},
    authenticator::MAX_NUM_OF_SIGS,
};
use anyhow::{ensure, Result};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use bit_vec::BitVec;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct MultiKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKey {
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> Result<Self> {
        ensure!(
            signatures_required > 0,
            "At least one signature must be required"
        );
        ensure!(
            public_keys.len() <= MAX_NUM_OF_SIGS,
            "Number of keys {} exceeds the maximum of {}",
            public_keys.len(),
            MAX_NUM_OF_SIGS
        );
        ensure!(
            signatures_required as usize <= public_keys.len(),
            "Threshold {} exceeds the number of keys {}",
            signatures_required,
            public_keys.len()
        );
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    pub fn len(&self) -> usize {
        self.public_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.public_keys.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.serialize(&mut serializer);
        serializer.into_bytes().unwrap_or_default()
    }
}

impl CanonicalSerialize for MultiKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_vec(&self.public_keys)
            .encode_u8(self.signatures_required);
    }
}

impl CanonicalDeserialize for MultiKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let public_keys = deserializer.decode_vec()?;
        let signatures_required = deserializer.decode_u8();
        deserializer.check()?;
        MultiKey::new(public_keys, signatures_required).map_err(aptos_bcs::Error::custom)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: BitVec,
}

impl MultiKeySignature {
    /// Builds a signature from `(key index, signature)` pairs, sorting them by index.
    pub fn new(mut signatures: Vec<(u8, AnySignature)>) -> Result<Self> {
        ensure!(!signatures.is_empty(), "No signatures provided");
        ensure!(
            signatures.len() <= MAX_NUM_OF_SIGS,
            "Number of signatures {} exceeds the maximum of {}",
            signatures.len(),
            MAX_NUM_OF_SIGS
        );
        signatures.sort_by_key(|(index, _)| *index);
        let highest = signatures
            .last()
            .map(|(index, _)| *index as usize)
            .unwrap_or_default();
        ensure!(
            highest < MAX_NUM_OF_SIGS,
            "Signature index {} is out of range",
            highest
        );

        let mut bitmap = BitVec::from_elem((highest / 8 + 1) * 8, false);
        let mut sorted = Vec::with_capacity(signatures.len());
        for (index, signature) in signatures {
            let index = index as usize;
            ensure!(
                !bitmap.get(index).unwrap_or(false),
                "Duplicate signature index {}",
                index
            );
            bitmap.set(index, true);
            sorted.push(signature);
        }
        Ok(Self {
            signatures: sorted,
            bitmap,
        })
    }

    /// Zero signatures for the first `signatures_required` keys, for transaction simulation.
    pub fn dummy(multi_key: &MultiKey) -> Self {
        let required = multi_key.signatures_required as usize;
        let mut bitmap = BitVec::from_elem(((required.max(1) - 1) / 8 + 1) * 8, false);
        let signatures = multi_key.public_keys[..required]
            .iter()
            .enumerate()
            .map(|(i, public_key)| {
                bitmap.set(i, true);
                AnySignature::simulation_for(public_key)
            })
            .collect();
        Self { signatures, bitmap }
    }

    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    pub fn bitmap(&self) -> Vec<u8> {
        self.bitmap.to_bytes()
    }

    /// Indices of the keys that signed, in ascending order.
    pub fn signer_indices(&self) -> Vec<usize> {
        self.bitmap
            .iter()
            .enumerate()
            .filter_map(|(i, bit)| if bit { Some(i) } else { None })
            .collect()
    }

    /// Checks the bitmap against `multi_key` and verifies every signature. At least
    /// `signatures_required` keys must have signed, and a single invalid signature fails the
    /// whole check even when the valid ones alone meet the threshold.
    pub fn verify(&self, message: &[u8], multi_key: &MultiKey) -> bool {
        let indices = self.signer_indices();
        if indices.len() != self.signatures.len()
            || indices.len() < multi_key.signatures_required as usize
        {
            return false;
        }
        indices
            .iter()
            .zip(self.signatures.iter())
            .all(|(index, signature)| match multi_key.public_keys.get(*index) {
                Some(public_key) => signature.verify(message, public_key),
                None => false,
            })
    }
}

impl CanonicalSerialize for MultiKeySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_vec(&self.signatures)
            .encode_bytes(&self.bitmap.to_bytes());
    }
}

impl CanonicalDeserialize for MultiKeySignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let signatures: Vec<AnySignature> = deserializer.decode_vec()?;
        let bitmap_bytes = deserializer.decode_bytes();
        deserializer.check()?;
        if bitmap_bytes.len() * 8 > MAX_NUM_OF_SIGS {
            return Err(aptos_bcs::Error::custom("MultiKey bitmap is too long"));
        }
        let bitmap = BitVec::from_bytes(&bitmap_bytes);
        let set_bits = bitmap.iter().filter(|bit| *bit).count();
        if set_bits != signatures.len() {
            return Err(aptos_bcs::Error::custom(format!(
                "MultiKey bitmap has {} signers but {} signatures",
                set_bits,
                signatures.len()
            )));
        }
        Ok(Self { signatures, bitmap })
    }
}
