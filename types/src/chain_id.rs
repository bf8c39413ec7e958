// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Chains with a well-known id.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NamedChain {
    MAINNET = 1,
    TESTNET = 2,
    DEVNET = 3,
    TESTING = 4,
}

impl NamedChain {
    pub fn id(self) -> u8 {
        self as u8
    }

    fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => NamedChain::MAINNET,
            2 => NamedChain::TESTNET,
            3 => NamedChain::DEVNET,
            4 => NamedChain::TESTING,
            _ => return None,
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            NamedChain::MAINNET => "mainnet",
            NamedChain::TESTNET => "testnet",
            NamedChain::DEVNET => "devnet",
            NamedChain::TESTING => "testing",
        }
    }
}

/// The id of the chain a transaction is valid on; replaying it on another chain fails.
#[derive(Clone, Copy, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ChainId(u8);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid chain id '{0}'")]
pub struct ChainIdParseError(String);

impl ChainId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn mainnet() -> Self {
        Self::new(NamedChain::MAINNET.id())
    }

    pub fn testnet() -> Self {
        Self::new(NamedChain::TESTNET.id())
    }

    /// The id of a local test network.
    pub fn test() -> Self {
        Self::new(NamedChain::TESTING.id())
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match NamedChain::from_id(self.0) {
            Some(chain) => write!(f, "{}", chain.as_str()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Accepts a number or one of the well-known chain names.
impl FromStr for ChainId {
    type Err = ChainIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let named = [
            NamedChain::MAINNET,
            NamedChain::TESTNET,
            NamedChain::DEVNET,
            NamedChain::TESTING,
        ]
        .into_iter()
        .find(|chain| chain.as_str().eq_ignore_ascii_case(s));
        match named {
            Some(chain) => Ok(ChainId::new(chain.id())),
            None => s
                .parse::<u8>()
                .ok()
                .filter(|id| *id > 0)
                .map(ChainId::new)
                .ok_or_else(|| ChainIdParseError(s.to_string())),
        }
    }
}

impl CanonicalSerialize for ChainId {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_u8(self.0);
    }
}

impl CanonicalDeserialize for ChainId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let id = deserializer.decode_u8();
        deserializer.check().map(|_| ChainId(id))
    }
}
