//! Recording signer.

use crate::error::AwsError;
use crate::signing::{AwsSigner, SignedRequest};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use url::Url;

/// Fixed `Authorization` value stamped on every request.
pub const MOCK_AUTHORIZATION: &str = "AWS4-HMAC-SHA256 Credential=mock/signing";

/// What a service handed to the signer.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// HTTP method.
    pub method: String,
    /// URL that was signed.
    pub url: Url,
    /// Headers before signing.
    pub headers: HashMap<String, String>,
    /// Payload, copied.
    pub body: Option<Bytes>,
}

/// Signer that records its input and adds a fixed `Authorization` and
/// `x-amz-date` instead of computing a signature.
#[derive(Debug)]
pub struct MockSigner {
    service: String,
    pending_error: Mutex<Option<AwsError>>,
    calls: Mutex<Vec<SignRequest>>,
}

impl MockSigner {
    /// Signer reporting the signing name `mock`.
    pub fn new() -> Self {
        Self::for_service("mock")
    }

    /// Signer reporting `service` as its signing name.
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            pending_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Signer whose first call fails with `error`; later calls succeed.
    pub fn with_error(error: AwsError) -> Self {
        let signer = Self::new();
        signer.pending_error.lock().replace(error);
        signer
    }

    /// Calls so far, failed ones included.
    pub fn sign_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Most recent call.
    pub fn last_sign_request(&self) -> Option<SignRequest> {
        self.calls.lock().last().cloned()
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AwsSigner for MockSigner {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, AwsError> {
        self.calls.lock().push(SignRequest {
            method: method.to_string(),
            url: url.clone(),
            headers: headers.clone(),
            body: body.map(Bytes::copy_from_slice),
        });

        if let Some(error) = self.pending_error.lock().take() {
            return Err(error);
        }

        let mut headers = headers.clone();
        headers.insert("authorization".into(), MOCK_AUTHORIZATION.into());
        headers.insert("x-amz-date".into(), "20240115T100000Z".into());

        Ok(SignedRequest {
            method: method.to_string(),
            url: url.clone(),
            headers,
        })
    }

    fn service(&self) -> &str {
        &self.service
    }
}
