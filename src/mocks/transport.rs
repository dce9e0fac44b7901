//! Scripted HTTP transport.

use crate::error::{AwsError, NetworkError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse(HttpResponse);

impl MockResponse {
    /// Any status with a body.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self(HttpResponse {
            status,
            headers: HashMap::new(),
            body: body.into(),
        })
    }

    /// `200` with an empty body.
    pub fn ok() -> Self {
        Self::ok_with_body(Bytes::new())
    }

    /// `200` with `body`.
    pub fn ok_with_body(body: impl Into<Bytes>) -> Self {
        Self::error(200, body)
    }

    /// `200` with a JSON document, as Cognito and Textract send it.
    pub fn json(value: serde_json::Value) -> Self {
        Self::ok_with_body(value.to_string())
            .with_header("content-type", "application/x-amz-json-1.1")
    }

    /// Add a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<MockResponse>,
    seen: Vec<HttpRequest>,
    failure: Option<NetworkError>,
}

/// Transport that records every request and answers from a script.
///
/// Queued responses go out first, in order, then the default response.
/// With neither, `send` fails as if the connection had been refused.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<Script>,
    fallback: Option<MockResponse>,
}

impl MockTransport {
    /// Empty script, no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with `responses` in order.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let transport = Self::new();
        transport.script.lock().queued.extend(responses);
        transport
    }

    /// Answer with `response` once the queue runs dry.
    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Append to the queue.
    pub fn queue_response(&self, response: MockResponse) {
        self.script.lock().queued.push_back(response);
    }

    /// Fail the next send with `error` before consulting the queue.
    pub fn fail_next(&self, error: NetworkError) {
        self.script.lock().failure = Some(error);
    }

    /// Requests in the order they were sent.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().seen.clone()
    }

    /// Number of sends so far.
    pub fn request_count(&self) -> usize {
        self.script.lock().seen.len()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.script.lock().seen.last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AwsError> {
        let mut script = self.script.lock();
        script.seen.push(request);

        if let Some(error) = script.failure.take() {
            return Err(AwsError::Network(error));
        }

        script
            .queued
            .pop_front()
            .or_else(|| self.fallback.clone())
            .map(|MockResponse(response)| response)
            .ok_or_else(|| {
                AwsError::Network(NetworkError::ConnectionFailed {
                    message: "mock transport has no response left".to_string(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn get(path: &str) -> HttpRequest {
        HttpRequest::new("GET", format!("https://mock.local/{}", path))
    }

    #[tokio::test]
    async fn test_queue_then_default() {
        let transport = MockTransport::with_responses(vec![
            MockResponse::ok_with_body("first"),
            MockResponse::error(404, "missing"),
        ])
        .with_default(MockResponse::ok_with_body("default"));

        let first = transport.send(get("1")).await.unwrap();
        let second = transport.send(get("2")).await.unwrap();
        let third = transport.send(get("3")).await.unwrap();

        assert_eq!(first.body, Bytes::from("first"));
        assert_eq!(second.status, 404);
        assert_eq!(third.body, Bytes::from("default"));
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.requests()[1].url, "https://mock.local/2");
    }

    #[tokio::test]
    async fn test_empty_script_refuses() {
        let transport = MockTransport::new();
        assert!(matches!(
            transport.send(get("")).await,
            Err(AwsError::Network(NetworkError::ConnectionFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let transport = MockTransport::new().with_default(MockResponse::ok());
        transport.fail_next(NetworkError::Timeout {
            duration: Duration::from_secs(1),
        });

        assert!(transport.send(get("")).await.is_err());
        assert!(transport.send(get("")).await.is_ok());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_json_response_headers() {
        let transport = MockTransport::new();
        transport.queue_response(MockResponse::json(serde_json::json!({"ok": true})));

        let response = transport.send(get("")).await.unwrap();
        assert_eq!(
            response.get_header("Content-Type"),
            Some("application/x-amz-json-1.1")
        );
        assert_eq!(response.body, Bytes::from(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_records_body() {
        let transport = MockTransport::new().with_default(MockResponse::ok());
        transport
            .send(HttpRequest::new("POST", "https://mock.local").with_body("request body"))
            .await
            .unwrap();

        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.method, "POST");
        assert_eq!(recorded.body, Some(Bytes::from("request body")));
    }
}
