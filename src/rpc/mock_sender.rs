//! An [`RpcSender`] for unit testing [`RpcClient`](crate::rpc::RpcClient)
//!
//! Every request gets a plausible canned reply unless a mock for it was
//! registered. A sender whose url is `"fails"` answers everything with
//! `null`. Requests are recorded so tests can inspect the params sent.

use crate::encoding::TransactionEncoding;
use crate::error::{Result, SolkitError};
use crate::rpc::request::RpcRequest;
use crate::rpc::sender::RpcSender;
use crate::transaction::CompiledTransaction;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub const PUBKEY: &str = "7RoSF9fUmdphVCpabEoefH81WwrW7orsWonXWqTXkKV8";
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";
pub const SIGNATURE: &str =
    "43yNSFC6fYTuPgTNFFhF4axw7AfWxB2BPdurme8yrsWEYwm8299xh8n6TAHjGymiSub1XtyxTNyd9GBfY2hxoBw8";

pub type Mocks = HashMap<RpcRequest, Value>;

pub struct MockSender {
    mocks: RwLock<Mocks>,
    requests: RwLock<Vec<(RpcRequest, Value)>>,
    url: String,
}

impl MockSender {
    pub fn new(url: impl Into<String>) -> Self {
        Self::new_with_mocks(url, Mocks::default())
    }

    pub fn new_with_mocks(url: impl Into<String>, mocks: Mocks) -> Self {
        Self {
            mocks: RwLock::new(mocks),
            requests: RwLock::new(Vec::new()),
            url: url.into(),
        }
    }

    /// Reply to the next `request` with `value` instead of the default
    pub fn set_mock(&self, request: RpcRequest, value: Value) {
        self.mocks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request, value);
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<(RpcRequest, Value)> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_params(&self, request: RpcRequest) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|(sent, _)| *sent == request)
            .map(|(_, params)| params)
    }
}

fn context(value: Value) -> Value {
    json!({ "context": { "slot": 1 }, "value": value })
}

/// The first signature of the transaction in `sendTransaction` params
fn submitted_signature(params: &Value) -> Result<Value> {
    let text = params[0].as_str().ok_or_else(|| {
        SolkitError::RpcRequestError("sendTransaction needs a transaction string".to_string())
    })?;
    let encoding = match params[1]["encoding"].as_str() {
        Some(name) => name.parse()?,
        None => TransactionEncoding::Base58,
    };
    let transaction = CompiledTransaction::decode(text, encoding)?;
    let signature = transaction.signatures.first().copied().unwrap_or_default();
    Ok(Value::String(signature.to_string()))
}

impl RpcSender for MockSender {
    fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((request, params.clone()));

        if let Some(value) = self
            .mocks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&request)
        {
            return Ok(value);
        }
        if self.url == "fails" {
            return Ok(Value::Null);
        }

        let value = match request {
            RpcRequest::GetAccountInfo => context(Value::Null),
            RpcRequest::GetBalance => context(json!(50)),
            RpcRequest::GetLatestBlockhash => context(json!({
                "blockhash": BLOCKHASH,
                "lastValidBlockHeight": 1234,
            })),
            RpcRequest::GetMinimumBalanceForRentExemption => json!(20),
            RpcRequest::GetRecentBlockhash => context(json!({
                "blockhash": BLOCKHASH,
                "feeCalculator": { "lamportsPerSignature": 5000 },
            })),
            RpcRequest::GetSlot => json!(0),
            RpcRequest::GetVersion => json!({ "solana-core": "1.18.0", "feature-set": 0 }),
            RpcRequest::RequestAirdrop => Value::String(SIGNATURE.to_string()),
            RpcRequest::SendTransaction => submitted_signature(&params)?,
        };
        Ok(value)
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
