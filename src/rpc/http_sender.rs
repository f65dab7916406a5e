//! The standard [`RpcSender`] over HTTP

use crate::error::{Result, SolkitError};
use crate::rpc::request::RpcRequest;
use crate::rpc::sender::RpcSender;
use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::sleep;
use std::time::Duration;

const TOO_MANY_REQUESTS_RETRIES: usize = 5;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_RETRY_AFTER_SECS: u64 = 120;

pub struct HttpSender {
    client: reqwest::blocking::Client,
    url: String,
    request_id: AtomicU64,
}

impl HttpSender {
    /// An HTTP sender with a 30 second timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::new_with_timeout(url, crate::rpc::config::DEFAULT_TIMEOUT)
    }

    pub fn new_with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(0),
        })
    }
}

#[derive(Deserialize, Debug)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// How long to back off after a 429, from its `Retry-After` header
fn retry_delay(retry_after: Option<&str>) -> Duration {
    retry_after
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs < MAX_RETRY_AFTER_SECS)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_DELAY)
}

/// Extract `result` from a JSON-RPC reply, or its error object as an error
fn parse_reply(request: RpcRequest, mut json: Value) -> Result<Value> {
    if json["error"].is_object() {
        return match serde_json::from_value::<RpcErrorObject>(json["error"].clone()) {
            Ok(RpcErrorObject { code, message }) => {
                warn!("{} failed: {} ({})", request, message, code);
                Err(SolkitError::RpcResponseError { code, message })
            }
            Err(err) => Err(SolkitError::RpcRequestError(format!(
                "failed to deserialize RPC error response: {} [{}]",
                json["error"], err
            ))),
        };
    }
    Ok(json["result"].take())
}

impl RpcSender for HttpSender {
    fn send(&self, request: RpcRequest, params: Value) -> Result<Value> {
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request_json = request.build_request_json(request_id, params).to_string();
        debug!("{} #{} -> {}", request, request_id, self.url);

        let mut too_many_requests_retries = TOO_MANY_REQUESTS_RETRIES;
        loop {
            let response = self
                .client
                .post(&self.url)
                .header(CONTENT_TYPE, "application/json")
                .body(request_json.clone())
                .send()?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS && too_many_requests_retries > 0
            {
                let delay = retry_delay(
                    response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|value| value.to_str().ok()),
                );
                too_many_requests_retries -= 1;
                debug!(
                    "too many requests: {} retries left, pausing for {:?}",
                    too_many_requests_retries, delay
                );
                sleep(delay);
                continue;
            }

            let json: Value = response.error_for_status()?.json()?;
            debug!("{} #{} <- reply", request, request_id);
            return parse_reply(request, json);
        }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
