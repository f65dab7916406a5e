//! 32-byte account addresses

use crate::error::{Result, SolkitError};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

pub const PUBKEY_BYTES: usize = 32;
/// Longest base58 string a 32-byte key can produce
pub const MAX_BASE58_LEN: usize = 44;
pub const MAX_SEED_LEN: usize = 32;
const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// An account address: the raw 32 bytes of an ed25519 public key, or a
/// program-derived address. Compared and hashed by content.
#[repr(transparent)]
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct PublicKey([u8; PUBKEY_BYTES]);

impl PublicKey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|_| {
            SolkitError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                PUBKEY_BYTES,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// A fresh key on every call, strictly increasing in byte order
    pub fn new_unique() -> Self {
        static I: AtomicU64 = AtomicU64::new(1);

        let mut bytes = [0u8; PUBKEY_BYTES];
        let i = I.fetch_add(1, Ordering::Relaxed);
        bytes[0..8].copy_from_slice(&i.to_be_bytes());
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// sha256(base || seed || owner)
    pub fn create_with_seed(base: &PublicKey, seed: &str, owner: &PublicKey) -> Result<Self> {
        if seed.len() > MAX_SEED_LEN {
            return Err(SolkitError::MaxSeedLengthExceeded);
        }
        if owner.0.ends_with(PDA_MARKER) {
            return Err(SolkitError::IllegalOwner);
        }

        let mut hasher = Sha256::new();
        hasher.update(base.0);
        hasher.update(seed.as_bytes());
        hasher.update(owner.0);
        Ok(Self(hasher.finalize().into()))
    }

    /// Off-curve address and bump seed for `seeds` under `program_id`
    pub fn find_program_address(seeds: &[&[u8]], program_id: &PublicKey) -> (Self, u8) {
        let (address, bump) =
            solana_sdk::pubkey::Pubkey::find_program_address(seeds, &(*program_id).into());
        (address.into(), bump)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for PublicKey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<solana_sdk::pubkey::Pubkey> for PublicKey {
    fn from(pubkey: solana_sdk::pubkey::Pubkey) -> Self {
        Self(pubkey.to_bytes())
    }
}

impl From<PublicKey> for solana_sdk::pubkey::Pubkey {
    fn from(pubkey: PublicKey) -> Self {
        solana_sdk::pubkey::Pubkey::new_from_array(pubkey.0)
    }
}

impl FromStr for PublicKey {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_BASE58_LEN {
            return Err(SolkitError::InvalidPublicKey(format!(
                "base58 string longer than {} characters",
                MAX_BASE58_LEN
            )));
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolkitError::InvalidPublicKey(e.to_string()))?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
