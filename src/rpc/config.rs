//! Client configuration, commitment levels and per-request options

use crate::encoding::TransactionEncoding;
use crate::error::{Result, SolkitError};
use crate::rpc::response::AccountEncoding;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A public cluster, or a validator on this machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    MainnetBeta,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Localnet => "http://localhost:8899",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::MainnetBeta => "mainnet-beta",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet-beta" | "mainnet" | "m" => Ok(Network::MainnetBeta),
            "testnet" | "t" => Ok(Network::Testnet),
            "devnet" | "d" => Ok(Network::Devnet),
            "localnet" | "localhost" | "l" => Ok(Network::Localnet),
            _ => Err(SolkitError::UnexpectedNetwork(s.to_string())),
        }
    }
}

/// How settled the state a query observes must be
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitmentLevel {
    Processed,
    #[default]
    Confirmed,
    Finalized,
    /// Deprecated alias of `Processed`
    Recent,
    /// Deprecated alias of `Confirmed`
    Single,
    /// Deprecated alias of `Confirmed`
    SingleGossip,
    /// Deprecated alias of `Finalized`
    Root,
    /// Deprecated alias of `Finalized`
    Max,
}

impl CommitmentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitmentLevel::Processed => "processed",
            CommitmentLevel::Confirmed => "confirmed",
            CommitmentLevel::Finalized => "finalized",
            CommitmentLevel::Recent => "recent",
            CommitmentLevel::Single => "single",
            CommitmentLevel::SingleGossip => "singleGossip",
            CommitmentLevel::Root => "root",
            CommitmentLevel::Max => "max",
        }
    }

    /// The current name for a deprecated level
    pub fn canonical(&self) -> Self {
        match self {
            CommitmentLevel::Recent => CommitmentLevel::Processed,
            CommitmentLevel::Single | CommitmentLevel::SingleGossip => CommitmentLevel::Confirmed,
            CommitmentLevel::Root | CommitmentLevel::Max => CommitmentLevel::Finalized,
            other => *other,
        }
    }
}

impl fmt::Display for CommitmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitmentLevel {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(CommitmentLevel::Processed),
            "confirmed" => Ok(CommitmentLevel::Confirmed),
            "finalized" => Ok(CommitmentLevel::Finalized),
            "recent" => Ok(CommitmentLevel::Recent),
            "single" => Ok(CommitmentLevel::Single),
            "singleGossip" => Ok(CommitmentLevel::SingleGossip),
            "root" => Ok(CommitmentLevel::Root),
            "max" => Ok(CommitmentLevel::Max),
            other => Err(SolkitError::UnexpectedCommitment(other.to_string())),
        }
    }
}

/// The `{"commitment": ...}` object sent with most queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentConfig {
    pub commitment: CommitmentLevel,
}

impl CommitmentConfig {
    pub const fn processed() -> Self {
        Self {
            commitment: CommitmentLevel::Processed,
        }
    }

    pub const fn confirmed() -> Self {
        Self {
            commitment: CommitmentLevel::Confirmed,
        }
    }

    pub const fn finalized() -> Self {
        Self {
            commitment: CommitmentLevel::Finalized,
        }
    }
}

impl From<CommitmentLevel> for CommitmentConfig {
    fn from(commitment: CommitmentLevel) -> Self {
        Self { commitment }
    }
}

/// Settings for an [`RpcClient`](crate::rpc::RpcClient), fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcClientConfig {
    /// Informational; requests always go to `endpoint`
    pub network: Network,
    pub endpoint: String,
    /// Used by every request that does not name its own commitment
    pub commitment: CommitmentConfig,
    pub timeout: Duration,
}

impl RpcClientConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            endpoint: network.rpc_url().to_string(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            network: Network::MainnetBeta,
            endpoint: Network::MainnetBeta.rpc_url().to_string(),
            commitment: CommitmentConfig::confirmed(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Byte range of account data to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcAccountInfoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<AccountEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<DataSlice>,
    #[serde(flatten)]
    pub commitment: Option<CommitmentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcSendTransactionConfig {
    #[serde(default)]
    pub skip_preflight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<CommitmentLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<TransactionEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
}
