// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while decoding or validating key and signature material.

use thiserror::Error;

/// An error type for key and signature validation issues, see [`ValidCryptoMaterial`][crate::ValidCryptoMaterial].
///
/// This enum reflects there are two interesting causes of validation
/// failure for the ingestion of key or signature material: deserialization errors
/// (often, due to mangled material or curve equation failure for ECC) and
/// validation errors (material recognizable but unacceptable for use,
/// e.g. unsafe).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CryptoMaterialError {
    /// Struct to be signed does not serialize correctly.
    #[error("serialization error")]
    SerializationError,
    /// Key or signature material does not deserialize correctly.
    #[error("deserialization error")]
    DeserializationError,
    /// Key or signature material deserializes, but is otherwise not valid.
    #[error("validation error")]
    ValidationError,
    /// Key, threshold or signature material does not have the expected size.
    #[error("wrong length")]
    WrongLengthError,
    /// Part of the signature or key is not canonical resulting to malleability issues.
    #[error("non-canonical representation")]
    CanonicalRepresentationError,
    /// A curve point (i.e., a public key) lies on a small group.
    #[error("point of small order")]
    SmallSubgroupError,
    /// A curve point (i.e., a public key) does not satisfy the curve equation.
    #[error("invalid curve point")]
    PointNotOnCurveError,
    /// BitVec errors in accountable multi-sig schemes.
    #[error("bitvec error: {0}")]
    BitVecError(String),
    /// Key material is tagged for a different or unsupported scheme.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
}
