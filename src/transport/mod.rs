//! HTTP transport layer.
//!
//! One [`HttpTransport`] is shared by every service. The default
//! implementation wraps a pooled `reqwest::Client`; tests swap in
//! [`crate::mocks::MockTransport`].

use crate::config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DEFAULT_READ_TIMEOUT,
};
use crate::error::{AwsError, NetworkError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// Header carrying a unique id per logical call.
pub const INVOCATION_ID_HEADER: &str = "amz-sdk-invocation-id";

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
}

/// An outgoing request, already signed.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Header map; names are compared case-insensitively.
    pub headers: HashMap<String, String>,
    /// Body, if any.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// A request with no headers and no body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Merge `headers` into the request.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Header value by name, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        header(&self.headers, name)
    }

    /// Body as UTF-8 text; empty when absent or binary.
    pub fn body_str(&self) -> &str {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or_default()
    }
}

/// A response as received, before any protocol decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Header map; names are compared case-insensitively.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by name, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        header(&self.headers, name)
    }

    /// Request id: `x-amz-request-id` from S3, `x-amzn-RequestId` from the
    /// JSON and query services.
    pub fn request_id(&self) -> Option<&str> {
        ["x-amz-request-id", "x-amzn-requestid"]
            .into_iter()
            .find_map(|name| self.get_header(name))
    }

    /// `ETag` header, quotes included.
    pub fn etag(&self) -> Option<&str> {
        self.get_header("etag")
    }

    /// `Retry-After` in whole seconds. HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds = self.get_header("retry-after")?.trim().parse().ok()?;
        Some(Duration::from_secs(seconds))
    }
}

/// Sends one request and returns the raw response.
///
/// Non-2xx statuses are returned as responses, not errors; only failures to
/// get a response at all are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AwsError>;
}

/// [`HttpTransport`] over a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl ReqwestTransport {
    /// A transport with default timeouts and pool settings.
    pub fn new() -> Result<Self, AwsError> {
        Self::builder().build()
    }

    /// Start configuring a transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    fn network_error(&self, e: reqwest::Error) -> AwsError {
        let error = if e.is_timeout() {
            NetworkError::Timeout {
                duration: self.read_timeout,
            }
        } else {
            NetworkError::ConnectionFailed {
                message: e.to_string(),
            }
        };
        AwsError::Network(error)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AwsError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let method: reqwest::Method = method.parse().map_err(|_| {
            AwsError::Network(NetworkError::ConnectionFailed {
                message: format!("Invalid HTTP method: {}", method),
            })
        })?;

        let mut builder = headers
            .iter()
            .fold(self.client.request(method, url), |b, (name, value)| {
                b.header(name.as_str(), value.as_str())
            });
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.network_error(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| self.network_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ReqwestTransport`]. Defaults match [`crate::config`].
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    verify_ssl: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Same as [`Default::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Time allowed to establish a connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Time allowed for a whole request, response body included.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// How long an idle connection is kept; `None` keeps it indefinitely.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Disable only for local emulators with self-signed certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// `User-Agent` sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client and its connection pool.
    pub fn build(self) -> Result<ReqwestTransport, AwsError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| {
                AwsError::Network(NetworkError::TlsError {
                    message: e.to_string(),
                })
            })?;

        Ok(ReqwestTransport {
            client,
            read_timeout: self.read_timeout,
        })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_MAX_CONNECTIONS as usize,
            pool_idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            verify_ssl: true,
            user_agent: concat!("aws-expense-integration/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
