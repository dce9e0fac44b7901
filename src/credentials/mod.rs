//! AWS credentials management.
//!
//! Signing keys for the S3, DynamoDB, SNS and Textract requests. Keys come
//! from an explicit value, the process environment or the shared profile
//! file; [`ChainCredentialsProvider`] tries them in order and caches the
//! result until it nears expiry.

mod chain;
mod env;
mod profile;

pub use chain::ChainCredentialsProvider;
pub use env::EnvCredentialsProvider;
pub use profile::ProfileCredentialsProvider;

use crate::error::{AwsError, CredentialsError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An access key pair, optionally with a session token and expiry.
///
/// The secret key and token never appear in `Debug` output.
#[derive(Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
    expiration: Option<DateTime<Utc>>,
}

impl AwsCredentials {
    /// Long-term credentials from an access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: None,
            expiration: None,
        }
    }

    /// Attach an STS session token.
    pub fn with_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::new(session_token.into()));
        self
    }

    /// Set the instant after which the credentials are rejected.
    pub fn expires_at(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key. Keep it out of logs.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// Session token, for temporary credentials.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Expiry, for temporary credentials.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// True when the credentials expire within `window` from now.
    ///
    /// Credentials without an expiry never expire.
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expiration
            .map_or(false, |expiration| Utc::now() + window >= expiration)
    }

    /// True once the expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero())
    }

    /// Fail with [`CredentialsError::Expired`] if the expiry has passed.
    pub fn ensure_fresh(&self) -> Result<(), AwsError> {
        match self.expiration {
            Some(expiration) if self.is_expired() => {
                Err(AwsError::Credentials(CredentialsError::Expired {
                    expiration: expiration.to_rfc3339(),
                }))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "[REDACTED]";
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("session_token", &self.session_token.as_ref().map(|_| REDACTED))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Source of signing credentials.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Current credentials.
    async fn get_credentials(&self) -> Result<AwsCredentials, AwsError>;

    /// Drop anything cached and fetch again. Stateless providers just fetch.
    async fn refresh_credentials(&self) -> Result<AwsCredentials, AwsError> {
        self.get_credentials().await
    }

    /// Short name used in log fields.
    fn name(&self) -> &'static str;
}

/// Provider for keys passed in by the caller.
pub struct StaticCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialsProvider {
    /// Wrap fixed credentials.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, AwsError> {
        self.credentials.ensure_fresh()?;
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

impl fmt::Debug for StaticCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticCredentialsProvider")
            .field(&self.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sts(expires_in: Duration) -> AwsCredentials {
        AwsCredentials::new("ASIATEMP", "temp-secret")
            .with_token("sts-token")
            .expires_at(Utc::now() + expires_in)
    }

    #[test]
    fn test_long_term_credentials_never_expire() {
        let creds = AwsCredentials::new("AKID", "SECRET");
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert!(creds.session_token().is_none());
        assert!(!creds.expires_within(Duration::days(365)));
        assert!(creds.ensure_fresh().is_ok());
    }

    #[test]
    fn test_expiry_window() {
        let creds = sts(Duration::minutes(5));
        assert_eq!(creds.session_token(), Some("sts-token"));
        assert!(!creds.is_expired());
        assert!(creds.expires_within(Duration::minutes(10)));
        assert!(!creds.expires_within(Duration::minutes(1)));

        let stale = sts(-Duration::hours(1));
        assert!(stale.is_expired());
        assert!(matches!(
            stale.ensure_fresh(),
            Err(AwsError::Credentials(CredentialsError::Expired { .. }))
        ));
    }

    #[test]
    fn test_debug_hides_secret_and_token() {
        let debug = format!("{:?}", sts(Duration::hours(1)));
        assert!(debug.contains("ASIATEMP"));
        assert!(!debug.contains("temp-secret"));
        assert!(!debug.contains("sts-token"));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCredentialsProvider::new(AwsCredentials::new("AKID", "SECRET"));
        assert_eq!(provider.get_credentials().await.unwrap().access_key_id(), "AKID");
        assert_eq!(provider.refresh_credentials().await.unwrap().access_key_id(), "AKID");
        assert_eq!(provider.name(), "static");
    }

    #[tokio::test]
    async fn test_static_provider_rejects_expired_keys() {
        let provider = StaticCredentialsProvider::new(sts(-Duration::minutes(1)));
        assert!(provider.get_credentials().await.is_err());
    }
}
