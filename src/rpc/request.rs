//! JSON-RPC methods and the request envelope

use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcRequest {
    GetAccountInfo,
    GetBalance,
    GetLatestBlockhash,
    GetMinimumBalanceForRentExemption,
    GetRecentBlockhash,
    GetSlot,
    GetVersion,
    RequestAirdrop,
    SendTransaction,
}

impl RpcRequest {
    pub fn method(&self) -> &'static str {
        match self {
            RpcRequest::GetAccountInfo => "getAccountInfo",
            RpcRequest::GetBalance => "getBalance",
            RpcRequest::GetLatestBlockhash => "getLatestBlockhash",
            RpcRequest::GetMinimumBalanceForRentExemption => "getMinimumBalanceForRentExemption",
            RpcRequest::GetRecentBlockhash => "getRecentBlockhash",
            RpcRequest::GetSlot => "getSlot",
            RpcRequest::GetVersion => "getVersion",
            RpcRequest::RequestAirdrop => "requestAirdrop",
            RpcRequest::SendTransaction => "sendTransaction",
        }
    }

    /// The JSON-RPC 2.0 envelope for this method
    pub fn build_request_json(&self, id: u64, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": self.method(),
            "params": params,
        })
    }
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}
