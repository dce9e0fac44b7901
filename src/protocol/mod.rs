//! Wire protocol codecs.
//!
//! Each service speaks one AWS protocol. Building request bodies lives in
//! the submodules; [`parse_error`] turns any non-2xx response into an
//! [`AwsError`] regardless of protocol.

pub mod json;
pub mod query;

use crate::error::{map_error_code, map_http_status, AwsError};
use crate::transport::HttpResponse;
use crate::xml;
use tracing::debug;

/// AWS wire protocols used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// REST with XML errors (S3).
    RestXml,
    /// Form-encoded query with XML responses (SNS).
    AwsQuery,
    /// JSON with `X-Amz-Target` (DynamoDB, Cognito, Textract).
    AwsJson(json::JsonVersion),
}

/// Map a non-success response to a typed error.
///
/// Bodies that carry no recognizable error code (proxies, load balancers,
/// empty `HEAD`-style replies) are classified by HTTP status alone.
pub fn parse_error(protocol: Protocol, response: &HttpResponse) -> AwsError {
    let parsed = match protocol {
        Protocol::RestXml | Protocol::AwsQuery => {
            let body = String::from_utf8_lossy(&response.body);
            match xml::parse_error_response(&body, response.status) {
                Ok(mut parsed) => {
                    if parsed.request_id.is_none() {
                        parsed.request_id = response.request_id().map(str::to_string);
                    }
                    parsed.retry_after = response.retry_after();
                    Some(parsed)
                }
                Err(e) => {
                    debug!(status = response.status, error = %e, "Unparseable XML error body");
                    None
                }
            }
        }
        Protocol::AwsJson(_) => json::parse_error_response(response),
    };

    match parsed {
        Some(parsed) => map_error_code(parsed),
        None => map_http_status(
            response.status,
            response.request_id().map(str::to_string),
        ),
    }
}
