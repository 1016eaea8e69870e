//! Ethereum JSON-RPC クライアント

use crate::error::{MintError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    jsonrpc: String,
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
    id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
            id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "JSON-RPC呼び出し");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_response(id, response)
    }
}

fn decode_response<T: DeserializeOwned>(expected_id: u64, response: RpcResponse) -> Result<T> {
    if response.jsonrpc != "2.0" {
        return Err(MintError::RpcProtocol(format!(
            "jsonrpcバージョンが不正です: {}",
            response.jsonrpc
        )));
    }
    if response.id != expected_id {
        return Err(MintError::RpcProtocol(format!(
            "idが一致しません（期待値 {}、応答 {}）",
            expected_id, response.id
        )));
    }
    if let Some(error) = response.error {
        return Err(MintError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let result = response.result.unwrap_or(Value::Null);
    Ok(serde_json::from_value(result)?)
}
