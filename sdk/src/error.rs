// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::transport::TransportError;
use aptos_crypto::CryptoMaterialError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A Move type that cannot be used where it appears, or a wrong number of type arguments.
    #[error("type error: {0}")]
    Type(String),
    /// A value that does not fit its declared Move type.
    #[error("value error: {0}")]
    Value(String),
    #[error("bcs error: {0}")]
    Bcs(#[from] aptos_bcs::Error),
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn type_error<T: std::fmt::Display>(msg: T) -> Self {
        Error::Type(msg.to_string())
    }

    pub fn value<T: std::fmt::Display>(msg: T) -> Self {
        Error::Value(msg.to_string())
    }

    pub fn crypto<T: std::fmt::Display>(msg: T) -> Self {
        Error::Crypto(msg.to_string())
    }

    pub fn config<T: std::fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Network(_)) | Error::Transport(TransportError::Timeout)
        )
    }
}

impl From<CryptoMaterialError> for Error {
    fn from(e: CryptoMaterialError) -> Self {
        Error::crypto(e)
    }
}

// Signing and authenticator construction report failures through `anyhow`.
impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<aptos_bcs::Error>() {
            Ok(e) => Error::Bcs(e),
            Err(e) => Error::crypto(e),
        }
    }
}
