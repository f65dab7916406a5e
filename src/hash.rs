//! 32-byte blockhash

use crate::error::{Result, SolkitError};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HASH_BYTES: usize = 32;

/// A recent blockhash, copied verbatim into every message
#[repr(transparent)]
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    pub const fn new_from_array(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_BYTES]> for Hash {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<solana_sdk::hash::Hash> for Hash {
    fn from(hash: solana_sdk::hash::Hash) -> Self {
        Self(hash.to_bytes())
    }
}

impl From<Hash> for solana_sdk::hash::Hash {
    fn from(hash: Hash) -> Self {
        solana_sdk::hash::Hash::new_from_array(hash.0)
    }
}

impl FromStr for Hash {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolkitError::InvalidHash(e.to_string()))?;
        let arr: [u8; HASH_BYTES] = bytes.try_into().map_err(|v: Vec<u8>| {
            SolkitError::InvalidHash(format!("expected {} bytes, got {}", HASH_BYTES, v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
