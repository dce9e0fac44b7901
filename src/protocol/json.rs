//! AWS JSON 1.0 / 1.1 protocol.
//!
//! Requests are `POST /` with an `X-Amz-Target` header naming the operation.
//! Errors carry their code in `__type` or the `x-amzn-ErrorType` header.

use crate::error::{AwsError, AwsErrorResponse, ResponseError};
use crate::transport::HttpResponse;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// JSON protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonVersion {
    /// `application/x-amz-json-1.0` (DynamoDB).
    V1_0,
    /// `application/x-amz-json-1.1` (Cognito, Textract).
    V1_1,
}

impl JsonVersion {
    /// Content type for request bodies.
    pub fn content_type(&self) -> &'static str {
        match self {
            JsonVersion::V1_0 => "application/x-amz-json-1.0",
            JsonVersion::V1_1 => "application/x-amz-json-1.1",
        }
    }
}

/// Headers for a JSON protocol request.
pub fn request_headers(version: JsonVersion, target: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), version.content_type().to_string());
    headers.insert("x-amz-target".to_string(), target.to_string());
    headers
}

/// Deserialize a successful response body. An empty body reads as `{}`.
pub fn parse_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, AwsError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| {
        AwsError::Response(ResponseError::JsonParseError {
            message: e.to_string(),
        })
    })
}

#[derive(Deserialize)]
struct JsonErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    code: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Strip the namespace from `__type` and the URI suffix from the header form.
///
/// `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException` and
/// `ResourceNotFoundException:http://internal.amazon.com/` both become
/// `ResourceNotFoundException`.
pub fn sanitize_error_code(raw: &str) -> &str {
    let code = raw.split(':').next().unwrap_or(raw);
    code.rsplit('#').next().unwrap_or(code).trim()
}

/// Parse a JSON protocol error response.
///
/// Returns `None` when neither the header nor the body names an error code.
pub fn parse_error_response(response: &HttpResponse) -> Option<AwsErrorResponse> {
    let body: Option<JsonErrorBody> = serde_json::from_slice(&response.body).ok();

    let raw_code = response
        .get_header("x-amzn-errortype")
        .map(str::to_string)
        .or_else(|| body.as_ref().and_then(|b| b.error_type.clone()))
        .or_else(|| body.as_ref().and_then(|b| b.code.clone()))?;

    let code = sanitize_error_code(&raw_code);
    if code.is_empty() {
        return None;
    }

    Some(AwsErrorResponse {
        status: response.status,
        code: code.to_string(),
        message: body.and_then(|b| b.message).unwrap_or_default(),
        request_id: response.request_id().map(str::to_string),
        retry_after: response.retry_after(),
    })
}
