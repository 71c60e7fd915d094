//! JSON-RPC over HTTP transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use bitshares_market::rpc::{HttpTransport, RetryConfig};
//!
//! let transport = HttpTransport::builder("https://api.bitshares.ws")
//!     .timeout_secs(10)
//!     .with_retry(RetryConfig::new(5))
//!     .build()?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::retry::{RetryConfig, RetryPolicy};
use crate::rpc::transport::{RpcRequest, RpcResponse, RpcTransport};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    retry_config: RetryConfig,
}

impl HttpTransportBuilder {
    /// Create a new builder for the given node URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
            retry_config: RetryConfig::idempotent(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Retry configuration applied to [`RetryPolicy::Idempotent`] calls.
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the transport.
    pub fn build(self) -> RpcResult<HttpTransport> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.default_headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str()).map_err(|e| {
                RpcError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = reqwest::header::HeaderValue::from_str(&value).map_err(|e| {
                RpcError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(headers)
            .build()?;

        Ok(HttpTransport {
            client,
            url: self.url,
            retry_config: self.retry_config,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }
}

/// JSON-RPC 2.0 transport over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
    retry_config: RetryConfig,
    next_id: Arc<AtomicU64>,
}

impl HttpTransport {
    /// Create a transport with default settings (30s timeout, idempotent retries).
    pub fn new(url: impl Into<String>) -> RpcResult<Self> {
        HttpTransportBuilder::new(url).build()
    }

    /// Create a new builder for custom configuration.
    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(url)
    }

    /// The node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn do_request(&self, api: &str, method: &str, params: &[Value]) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::call(id, api, method, params);

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();

        if status.is_success() {
            let envelope = response.json::<RpcResponse>().await.map_err(|e| {
                RpcError::Deserialize(format!("Failed to deserialize response: {}", e))
            })?;
            return envelope.into_result();
        }

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                format!("HTTP {} (body unreadable: {})", status, e)
            }
        };

        // Some nodes report JSON-RPC errors with a 500 status.
        if let Ok(envelope) = serde_json::from_str::<RpcResponse>(&body) {
            if envelope.error.is_some() {
                return envelope.into_result();
            }
        }

        Err(Self::map_status_error(status, body))
    }

    /// Map HTTP status code to RpcError.
    fn map_status_error(status: StatusCode, body: String) -> RpcError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => RpcError::RateLimited,
            _ if status.is_server_error() => RpcError::ServerError {
                status: status.as_u16(),
                body,
            },
            _ => RpcError::UnexpectedStatus(status.as_u16(), body),
        }
    }

    fn should_retry(config: &RetryConfig, error: &RpcError) -> bool {
        match error {
            RpcError::ServerError { status, .. } | RpcError::UnexpectedStatus(status, _) => {
                config.retryable_statuses.contains(status)
            }
            RpcError::RateLimited => config.retryable_statuses.contains(&429),
            RpcError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(
        &self,
        api: &str,
        method: &str,
        params: Vec<Value>,
        retry: RetryPolicy,
    ) -> RpcResult<Value> {
        let config = match retry {
            RetryPolicy::None => return self.do_request(api, method, &params).await,
            RetryPolicy::Idempotent => self.retry_config.clone(),
            RetryPolicy::Custom(c) => c,
        };

        let mut attempt = 0;
        loop {
            match self.do_request(api, method, &params).await {
                Ok(value) => return Ok(value),
                Err(e) if !Self::should_retry(&config, &e) => return Err(e),
                Err(e) if attempt >= config.max_retries => {
                    if attempt == 0 {
                        return Err(e);
                    }
                    return Err(RpcError::MaxRetriesExceeded {
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = config.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_retries = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        api,
                        method,
                        error = %e,
                        "Retrying RPC call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local HTTP server answering the n-th connection with `responses[n]`
    /// (the last one repeats). Returns its URL and a connection counter.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[index.min(responses.len() - 1)];

                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                        let len = headers
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        if buf.len() >= pos + 4 + len {
                            break;
                        }
                    }
                }

                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (url, hits)
    }

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig::new(max_retries)
            .with_initial_delay(Duration::from_millis(1))
            .without_jitter()
    }

    const OK_BODY: &str = r#"{"jsonrpc":"2.0","id":1,"result":{"head_block_number":7}}"#;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new("https://node.example.com/").unwrap();
        assert_eq!(transport.url(), "https://node.example.com");
    }

    #[test]
    fn test_transport_builder() {
        let transport = HttpTransport::builder("https://node.example.com")
            .timeout_secs(5)
            .header("X-Client", "bitshares-market")
            .with_retry(RetryConfig::new(1))
            .build()
            .unwrap();
        assert_eq!(transport.retry_config.max_retries, 1);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let result = HttpTransport::builder("https://node.example.com")
            .header("bad header", "x")
            .build();
        assert!(matches!(result, Err(RpcError::InvalidParameter(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            HttpTransport::map_status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            RpcError::RateLimited
        ));
        assert!(matches!(
            HttpTransport::map_status_error(StatusCode::BAD_GATEWAY, String::new()),
            RpcError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            HttpTransport::map_status_error(StatusCode::NOT_FOUND, String::new()),
            RpcError::UnexpectedStatus(404, _)
        ));
    }

    #[test]
    fn test_node_errors_never_retried() {
        let config = RetryConfig::idempotent();
        let node = RpcError::Node {
            code: 1,
            message: "missing".to_string(),
        };
        assert!(!HttpTransport::should_retry(&config, &node));
        let busy = RpcError::ServerError {
            status: 503,
            body: String::new(),
        };
        assert!(HttpTransport::should_retry(&config, &busy));
        let internal = RpcError::ServerError {
            status: 500,
            body: String::new(),
        };
        assert!(!HttpTransport::should_retry(&config, &internal));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let (url, hits) = serve(vec![(503, "busy"), (200, OK_BODY)]).await;
        let transport = HttpTransport::builder(url)
            .with_retry(fast_retry(3))
            .build()
            .unwrap();

        let value = transport
            .call("database", "get_dynamic_global_properties", vec![], RetryPolicy::Idempotent)
            .await
            .unwrap();
        assert_eq!(value["head_block_number"], 7);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_reported() {
        let (url, hits) = serve(vec![(503, "busy")]).await;
        let transport = HttpTransport::new(url).unwrap();

        let err = transport
            .call(
                "database",
                "get_ticker",
                vec![],
                RetryPolicy::Custom(fast_retry(2)),
            )
            .await
            .unwrap_err();
        match err {
            RpcError::MaxRetriesExceeded {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"), "{}", last_error);
            }
            other => panic!("expected MaxRetriesExceeded, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_policy_makes_one_attempt() {
        let (url, hits) = serve(vec![(503, "busy"), (200, OK_BODY)]).await;
        let transport = HttpTransport::builder(url)
            .with_retry(fast_retry(3))
            .build()
            .unwrap();

        let err = transport
            .call(
                "network_broadcast",
                "broadcast_transaction",
                vec![],
                RetryPolicy::None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::ServerError { status: 503, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_node_error_returned_without_retry() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":1,"message":"Assert Exception"}}"#;
        let (url, hits) = serve(vec![(500, body)]).await;
        let transport = HttpTransport::builder(url)
            .with_retry(fast_retry(3))
            .build()
            .unwrap();

        let err = transport
            .call("database", "get_objects", vec![], RetryPolicy::Idempotent)
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Node { code: 1, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
