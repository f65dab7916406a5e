//! A transport for RPC calls

use crate::error::Result;
use crate::rpc::request::RpcRequest;

/// Carries one request to a node and returns the `result` member of its
/// reply. Error objects in the reply surface as
/// [`SolkitError::RpcResponseError`](crate::error::SolkitError::RpcResponseError).
pub trait RpcSender {
    fn send(&self, request: RpcRequest, params: serde_json::Value) -> Result<serde_json::Value>;

    fn url(&self) -> String;
}

impl<T: RpcSender + ?Sized> RpcSender for std::sync::Arc<T> {
    fn send(&self, request: RpcRequest, params: serde_json::Value) -> Result<serde_json::Value> {
        (**self).send(request, params)
    }

    fn url(&self) -> String {
        (**self).url()
    }
}
