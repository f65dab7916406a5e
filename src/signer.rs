//! Signatures, private keys and key pairs
//!
//! The ed25519 primitive itself comes from `solana-sdk`; this module only
//! wraps its inputs and outputs in the crate's fixed-size types.

use crate::error::{Result, SolkitError};
use crate::pubkey::{PublicKey, PUBKEY_BYTES};
use bytemuck::{Pod, Zeroable};
use solana_sdk::signer::Signer;
use std::fmt;
use std::str::FromStr;

pub const SIGNATURE_BYTES: usize = 64;
pub const PRIVATE_KEY_BYTES: usize = 64;

/// A 64-byte ed25519 signature over a serialized message
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }

    /// Check this signature against `message` for `public_key`
    pub fn verify(&self, public_key: &PublicKey, message: &[u8]) -> bool {
        solana_sdk::signature::Signature::from(self.0).verify(public_key.as_ref(), message)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_BYTES])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<solana_sdk::signature::Signature> for Signature {
    fn from(signature: solana_sdk::signature::Signature) -> Self {
        let mut bytes = [0u8; SIGNATURE_BYTES];
        bytes.copy_from_slice(signature.as_ref());
        Self(bytes)
    }
}

impl From<Signature> for solana_sdk::signature::Signature {
    fn from(signature: Signature) -> Self {
        solana_sdk::signature::Signature::from(signature.0)
    }
}

impl FromStr for Signature {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolkitError::InvalidSignature(e.to_string()))?;
        let arr: [u8; SIGNATURE_BYTES] = bytes.try_into().map_err(|v: Vec<u8>| {
            SolkitError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_BYTES,
                v.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A 64-byte ed25519 secret: the 32-byte seed followed by its public key.
/// Never written into a transaction.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; PRIVATE_KEY_BYTES]);

impl PrivateKey {
    /// Accepts only 64 bytes whose second half is the public key of the first
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PRIVATE_KEY_BYTES] = bytes.try_into().map_err(|_| {
            SolkitError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES,
                bytes.len()
            ))
        })?;

        let derived = keypair_from_seed(&arr[..32])?.pubkey();
        if derived.as_ref() != &arr[32..] {
            return Err(SolkitError::InvalidPrivateKey(
                "public half does not match the seed".to_string(),
            ));
        }
        Ok(Self(arr))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Result<Self> {
        let keypair = keypair_from_seed(seed)?;
        Ok(Self(keypair.to_bytes()))
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolkitError::InvalidPrivateKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES] {
        self.0
    }

    /// The public key paired with this secret
    pub fn public_key(&self) -> PublicKey {
        let mut bytes = [0u8; PUBKEY_BYTES];
        bytes.copy_from_slice(&self.0[32..]);
        PublicKey::new_from_array(bytes)
    }

    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let keypair = solana_sdk::signature::Keypair::from_bytes(&self.0)
            .map_err(|e| SolkitError::InvalidPrivateKey(e.to_string()))?;
        Ok(keypair.sign_message(message).into())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.public_key())
    }
}

fn keypair_from_seed(seed: &[u8]) -> Result<solana_sdk::signature::Keypair> {
    solana_sdk::signer::keypair::keypair_from_seed(seed)
        .map_err(|e| SolkitError::InvalidPrivateKey(e.to_string()))
}

/// A private key together with its public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keypair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl Keypair {
    /// A random key pair from the operating system's entropy source
    pub fn new() -> Self {
        let keypair = solana_sdk::signature::Keypair::new();
        let private_key = PrivateKey(keypair.to_bytes());
        Self {
            public_key: private_key.public_key(),
            private_key,
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Result<Self> {
        Ok(Self::from(PrivateKey::from_seed(seed)?))
    }

    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        self.private_key.sign(message)
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PrivateKey> for Keypair {
    fn from(private_key: PrivateKey) -> Self {
        Self {
            public_key: private_key.public_key(),
            private_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[7u8; 32]).unwrap();
        let signature = keypair.sign(b"hello").unwrap();
        assert!(signature.verify(&keypair.public_key, b"hello"));
        assert!(!signature.verify(&keypair.public_key, b"hell0"));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let keypair = Keypair::from_seed(&[1u8; 32]).unwrap();
        assert_eq!(keypair.sign(b"msg").unwrap(), keypair.sign(b"msg").unwrap());
    }

    #[test]
    fn test_private_key_base58_round_trip() {
        let keypair = Keypair::new();
        let encoded = keypair.private_key.to_base58();
        let decoded = PrivateKey::from_base58(&encoded).unwrap();
        assert_eq!(decoded, keypair.private_key);
        assert_eq!(decoded.public_key(), keypair.public_key);
    }

    #[test]
    fn test_private_key_rejects_mismatched_halves() {
        let mut bytes = PrivateKey::from_seed(&[3u8; 32]).unwrap().to_bytes();
        bytes[63] ^= 0xff;
        assert!(matches!(
            PrivateKey::from_bytes(&bytes),
            Err(SolkitError::InvalidPrivateKey(_))
        ));
        assert!(PrivateKey::from_bytes(&bytes[..32]).is_err());
    }

    #[test]
    fn test_public_key_matches_sdk_derivation() {
        let seed = [9u8; 32];
        let ours = Keypair::from_seed(&seed).unwrap();
        let sdk = solana_sdk::signer::keypair::keypair_from_seed(&seed).unwrap();
        assert_eq!(ours.public_key, PublicKey::from(sdk.pubkey()));
    }

    #[test]
    fn test_signature_base58_round_trip() {
        let signature = Keypair::new().sign(b"payload").unwrap();
        let parsed: Signature = signature.to_string().parse().unwrap();
        assert_eq!(parsed, signature);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let keypair = Keypair::from_seed(&[2u8; 32]).unwrap();
        let debug = format!("{:?}", keypair.private_key);
        assert!(!debug.contains(&keypair.private_key.to_base58()));
    }
}
