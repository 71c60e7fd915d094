//! The transport seam and the JSON-RPC 2.0 envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::retry::RetryPolicy;

/// Something that can execute `call(api, method, params)` against a node.
///
/// [`HttpTransport`](crate::rpc::HttpTransport) is the default; tests inject
/// in-memory implementations.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Execute one call and return the `result` member of the response.
    async fn call(
        &self,
        api: &str,
        method: &str,
        params: Vec<Value>,
        retry: RetryPolicy,
    ) -> RpcResult<Value>;
}

/// Outgoing request: `{"jsonrpc":"2.0","id":N,"method":"call","params":[api, method, args]}`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: (&'a str, &'a str, &'a [Value]),
}

impl<'a> RpcRequest<'a> {
    pub fn call(id: u64, api: &'a str, method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "call",
            params: (api, method, params),
        }
    }
}

/// Error object inside a JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    /// Prefer the node's detailed assertion text in `data.message` when present.
    pub fn get_message(&self) -> String {
        self.data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .or_else(|| Some(self.message.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Incoming response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Split the envelope into the call's result or a node error.
    pub fn into_result(self) -> RpcResult<Value> {
        if let Some(error) = self.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.get_message(),
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}
