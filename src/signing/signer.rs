//! AWS Signature V4 signer implementation.

use super::*;
use crate::credentials::CredentialsProvider;
use crate::error::{AwsError, SigningError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// A signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: String,
    /// Full URL including query string.
    pub url: Url,
    /// Headers to include.
    pub headers: HashMap<String, String>,
}

/// Trait for AWS request signers.
#[async_trait]
pub trait AwsSigner: Send + Sync {
    /// Sign a request with AWS Signature V4.
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, AwsError>;

    /// Service signing name used in the credential scope.
    fn service(&self) -> &str;
}

/// AWS Signature V4 signer bound to one region and one service.
pub struct AwsSignerV4 {
    credentials_provider: Arc<dyn CredentialsProvider>,
    region: String,
    service: String,
}

impl AwsSignerV4 {
    /// Create a new signer.
    pub fn new(
        credentials_provider: Arc<dyn CredentialsProvider>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials_provider,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Region in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign at a fixed timestamp.
    pub async fn sign_at(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
        timestamp: DateTime<Utc>,
    ) -> Result<SignedRequest, AwsError> {
        let credentials = self.credentials_provider.get_credentials().await?;
        credentials.ensure_fresh()?;

        let host = url.host_str().ok_or_else(|| {
            AwsError::Signing(SigningError::InvalidUrl {
                message: format!("URL has no host: {}", url),
            })
        })?;
        let host_value = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let payload_hash = sha256_hex(body.unwrap_or_default());
        let amz_date = format_datetime(&timestamp);

        let mut added: Vec<(String, String)> = vec![
            ("host".to_string(), host_value),
            ("x-amz-date".to_string(), amz_date),
        ];
        if self.service == "s3" {
            added.push(("x-amz-content-sha256".to_string(), payload_hash.clone()));
        }
        if let Some(token) = credentials.session_token() {
            added.push(("x-amz-security-token".to_string(), token.to_string()));
        }

        let mut signing_headers = added.clone();
        for (name, value) in headers {
            let lower = name.to_lowercase();
            if !added.iter().any(|(n, _)| *n == lower) {
                signing_headers.push((name.clone(), value.clone()));
            }
        }

        let authorization = sign_request(
            &SigningParams {
                method,
                uri: url.path(),
                query_string: url.query().unwrap_or(""),
                headers: &signing_headers,
                payload_hash: &payload_hash,
                region: &self.region,
                service: &self.service,
                timestamp: &timestamp,
            },
            &credentials,
        );

        let mut final_headers = headers.clone();
        for (name, value) in added {
            final_headers.insert(name, value);
        }
        final_headers.insert("authorization".to_string(), authorization);

        Ok(SignedRequest {
            method: method.to_string(),
            url: url.clone(),
            headers: final_headers,
        })
    }
}

impl std::fmt::Debug for AwsSignerV4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSignerV4")
            .field("credentials_provider", &self.credentials_provider.name())
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

#[async_trait]
impl AwsSigner for AwsSignerV4 {
    async fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, AwsError> {
        self.sign_at(method, url, headers, body, Utc::now()).await
    }

    fn service(&self) -> &str {
        &self.service
    }
}
