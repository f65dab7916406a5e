//! Error types for Solkit

use crate::pubkey::PublicKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolkitError {
    #[error("Malformed compact-u16: {0}")]
    MalformedVarint(String),

    #[error("Transaction has no instructions")]
    EmptyTransaction,

    #[error("Account {0} is not in the resolved account list")]
    UnresolvedAccount(PublicKey),

    #[error("Signature count mismatch: expected {expected}, got {actual}")]
    SignatureCountMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("Transaction already signed")]
    TransactionAlreadySigned,

    #[error("Buffer too small: needed {needed} bytes, got {available}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
    },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Length {0} does not fit in a compact-u16")]
    LengthOverflow(usize),

    #[error("Too many accounts: {0}")]
    TooManyAccounts(usize),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Length of the seed is too long for address generation")]
    MaxSeedLengthExceeded,

    #[error("Provided owner is not allowed")]
    IllegalOwner,

    #[error("Keypair {0} is not a required signer of this transaction")]
    KeypairPubkeyMismatch(PublicKey),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Unexpected network: {0}")]
    UnexpectedNetwork(String),

    #[error("Unexpected commitment level: {0}")]
    UnexpectedCommitment(String),

    #[error("RPC response error {code}: {message}")]
    RpcResponseError {
        code: i64,
        message: String,
    },

    #[error("RPC request error: {0}")]
    RpcRequestError(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl From<bs58::decode::Error> for SolkitError {
    fn from(err: bs58::decode::Error) -> Self {
        SolkitError::DecodingError(err.to_string())
    }
}

impl From<base64::DecodeError> for SolkitError {
    fn from(err: base64::DecodeError) -> Self {
        SolkitError::DecodingError(err.to_string())
    }
}

impl From<bincode::Error> for SolkitError {
    fn from(err: bincode::Error) -> Self {
        SolkitError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SolkitError>;
