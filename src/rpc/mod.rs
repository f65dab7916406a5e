//! JSON-RPC access to a cluster node
//!
//! [`RpcClient`] turns typed calls into JSON-RPC requests and hands them to
//! an [`RpcSender`]: [`HttpSender`] in production, [`MockSender`] in tests.

pub mod client;
pub mod config;
pub mod http_sender;
pub mod mock_sender;
pub mod request;
pub mod response;
pub mod sender;

pub use client::RpcClient;
pub use config::{
    CommitmentConfig, CommitmentLevel, Network, RpcAccountInfoConfig, RpcClientConfig,
    RpcSendTransactionConfig,
};
pub use http_sender::HttpSender;
pub use mock_sender::MockSender;
pub use request::RpcRequest;
pub use response::{AccountData, AccountEncoding, AccountInfo, Response};
pub use sender::RpcSender;
