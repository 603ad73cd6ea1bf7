//! Slim JSON-RPC client for the Solana HTTP API
//!
//! The client speaks raw JSON-RPC over reqwest and parses results into
//! `solana-transaction-status` / `solana-account-decoder` types. Higher
//! level methods live in `methods.rs`.

pub mod methods;
pub mod types;

pub use types::{RpcError, RpcResult};

use std::time::Duration;

/// Default timeout for RPC requests
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: &str) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent("poolwatch/0.1")
            .build()
            .map_err(|e| RpcError::ConnectionFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a raw JSON-RPC call and return the `result` value.
    ///
    /// A JSON-RPC `error` object in the response body is surfaced as
    /// `RpcError::RequestFailed`; transport problems as `ConnectionFailed`.
    pub async fn execute_raw(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> RpcResult<serde_json::Value> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::RequestFailed(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(error) = payload.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(RpcError::RequestFailed(format!(
                "{} (code {})",
                message, code
            )));
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::InvalidResponse("missing result field".to_string()))
    }
}
