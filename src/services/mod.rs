//! Service implementations, one per remote operation.
//!
//! - Receipts: S3 `PutObject`
//! - Auth: Cognito `InitiateAuth`
//! - Expenses: DynamoDB `PutItem`
//! - Alerts: SNS `Publish`
//! - Documents: Textract `AnalyzeDocument`

mod alerts;
mod auth;
mod documents;
mod expenses;
mod receipts;

pub use alerts::AlertsService;
pub use auth::{secret_hash, AuthService};
pub use documents::DocumentsService;
pub use expenses::ExpensesService;
pub use receipts::ReceiptsService;

use crate::error::AwsError;
use crate::protocol::{self, Protocol};
use crate::signing::AwsSigner;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, INVOCATION_ID_HEADER};
use bytes::Bytes;
use std::collections::HashMap;
use tracing::warn;
use url::Url;

/// Sign (when a signer is given), send, and map failures.
pub(crate) async fn dispatch(
    transport: &dyn HttpTransport,
    signer: Option<&dyn AwsSigner>,
    protocol: Protocol,
    method: &str,
    url: &Url,
    mut headers: HashMap<String, String>,
    body: Bytes,
) -> Result<HttpResponse, AwsError> {
    headers.insert(
        INVOCATION_ID_HEADER.to_string(),
        uuid::Uuid::new_v4().to_string(),
    );

    let http_request = match signer {
        Some(signer) => {
            let signed = signer.sign(method, url, &headers, Some(&body)).await?;
            HttpRequest::new(method, signed.url.as_str()).with_headers(signed.headers)
        }
        None => HttpRequest::new(method, url.as_str()).with_headers(headers),
    }
    .with_body(body);

    let response = transport.send(http_request).await?;

    if !response.is_success() {
        let error = protocol::parse_error(protocol, &response);
        warn!(
            status = response.status,
            error_code = error.error_code().unwrap_or("unknown"),
            request_id = error.request_id().unwrap_or("unknown"),
            category = %error.category(),
            "Request failed"
        );
        return Err(error);
    }

    Ok(response)
}
