//! Configuration for the expense client.
//!
//! [`ExpenseConfig`] carries the region, the resource names each service
//! writes to, endpoint overrides and HTTP settings. Required values are
//! validated when the config is built, so a client never starts with a
//! missing bucket or a template placeholder.

use crate::credentials::{ChainCredentialsProvider, CredentialsProvider};
use crate::error::{AwsError, ConfigurationError};
use crate::types::Service;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Default idle connections kept per host.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;
/// Default idle connection timeout.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Configuration for the expense client.
#[derive(Clone)]
pub struct ExpenseConfig {
    /// AWS region (e.g., "us-east-1").
    pub region: String,

    /// Credentials provider used by every signed service.
    pub credentials_provider: Arc<dyn CredentialsProvider>,

    /// Bucket receipts are uploaded to.
    pub receipt_bucket: String,

    /// Table expense records are written to.
    pub expense_table: String,

    /// Cognito app client ID.
    pub cognito_client_id: String,

    /// Cognito app client secret, when the app client has one.
    pub cognito_client_secret: Option<SecretString>,

    /// Endpoint override applied to every service.
    pub endpoint: Option<Url>,

    /// Per-service endpoint overrides, taking precedence over `endpoint`.
    pub service_endpoints: HashMap<Service, Url>,

    /// Use path-style addressing for S3.
    ///
    /// Path-style: `https://s3.region.amazonaws.com/bucket/key`
    /// Virtual-hosted: `https://bucket.s3.region.amazonaws.com/key`
    pub path_style: bool,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Read timeout for a whole request.
    pub read_timeout: Duration,

    /// Maximum idle connections kept per host.
    pub max_connections: u32,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Verify TLS certificates.
    pub verify_ssl: bool,
}

impl std::fmt::Debug for ExpenseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseConfig")
            .field("region", &self.region)
            .field("receipt_bucket", &self.receipt_bucket)
            .field("expense_table", &self.expense_table)
            .field("cognito_client_id", &self.cognito_client_id)
            .field(
                "cognito_client_secret",
                &self.cognito_client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoint", &self.endpoint)
            .field("service_endpoints", &self.service_endpoints)
            .field("path_style", &self.path_style)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("verify_ssl", &self.verify_ssl)
            .finish_non_exhaustive()
    }
}

impl ExpenseConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ExpenseConfigBuilder {
        ExpenseConfigBuilder::default()
    }

    /// Endpoint override for a service, if any.
    pub fn endpoint_override(&self, service: Service) -> Option<&Url> {
        self.service_endpoints
            .get(&service)
            .or(self.endpoint.as_ref())
    }

    /// Whether S3 requests put the bucket in the path.
    ///
    /// Always true for custom endpoints, which rarely serve bucket subdomains.
    pub fn uses_path_style(&self) -> bool {
        self.path_style || self.endpoint_override(Service::S3).is_some()
    }

    /// Resolve the base URL for a service.
    ///
    /// `bucket` only matters for virtual-hosted S3 addressing.
    pub fn resolve_endpoint(&self, service: Service, bucket: Option<&str>) -> Result<Url, AwsError> {
        if let Some(endpoint) = self.endpoint_override(service) {
            return Ok(endpoint.clone());
        }

        let host = format!("{}.{}.amazonaws.com", service.endpoint_prefix(), self.region);
        let url_str = match (service, bucket) {
            (Service::S3, Some(bucket)) if !self.path_style => {
                format!("https://{}.{}", bucket, host)
            }
            _ => format!("https://{}", host),
        };

        Url::parse(&url_str).map_err(|e| {
            AwsError::Configuration(ConfigurationError::InvalidEndpoint {
                url: url_str,
                details: e.to_string(),
            })
        })
    }

    /// Build the request path for an S3 object.
    pub fn build_object_path(&self, bucket: &str, key: &str) -> String {
        if self.uses_path_style() {
            format!("/{}/{}", bucket, key)
        } else {
            format!("/{}", key)
        }
    }
}

/// Builder for [`ExpenseConfig`].
#[derive(Default)]
pub struct ExpenseConfigBuilder {
    region: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    receipt_bucket: Option<String>,
    expense_table: Option<String>,
    cognito_client_id: Option<String>,
    cognito_client_secret: Option<SecretString>,
    endpoint: Option<Url>,
    service_endpoints: HashMap<Service, Url>,
    path_style: Option<bool>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_connections: Option<u32>,
    idle_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
}

impl ExpenseConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Set the receipt bucket.
    pub fn receipt_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.receipt_bucket = Some(bucket.into());
        self
    }

    /// Set the expense table.
    pub fn expense_table(mut self, table: impl Into<String>) -> Self {
        self.expense_table = Some(table.into());
        self
    }

    /// Set the Cognito app client ID.
    pub fn cognito_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.cognito_client_id = Some(client_id.into());
        self
    }

    /// Set the Cognito app client secret.
    pub fn cognito_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.cognito_client_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Set an endpoint override for every service.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, AwsError> {
        self.endpoint = Some(parse_endpoint(endpoint.into())?);
        Ok(self)
    }

    /// Set an endpoint override for a single service.
    pub fn service_endpoint(
        mut self,
        service: Service,
        endpoint: impl Into<String>,
    ) -> Result<Self, AwsError> {
        self.service_endpoints
            .insert(service, parse_endpoint(endpoint.into())?);
        Ok(self)
    }

    /// Enable path-style addressing for S3.
    pub fn path_style(mut self, enabled: bool) -> Self {
        self.path_style = Some(enabled);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    pub fn max_connections(mut self, connections: u32) -> Self {
        self.max_connections = Some(connections);
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Values already set on the builder are overwritten by any variable
    /// that is present.
    pub fn from_env(self) -> Self {
        self.from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(region) = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")) {
            self.region = Some(region);
        }

        if let Some(endpoint) = lookup("AWS_ENDPOINT_URL") {
            match Url::parse(&endpoint) {
                Ok(url) => self.endpoint = Some(url),
                Err(e) => warn!(variable = "AWS_ENDPOINT_URL", error = %e, "Ignoring invalid endpoint"),
            }
        }
        for service in Service::ALL {
            let variable = service.endpoint_env_var();
            if let Some(endpoint) = lookup(variable) {
                match Url::parse(&endpoint) {
                    Ok(url) => {
                        self.service_endpoints.insert(service, url);
                    }
                    Err(e) => warn!(variable, error = %e, "Ignoring invalid endpoint"),
                }
            }
        }

        if let Some(bucket) = lookup("EXPENSE_RECEIPT_BUCKET") {
            self.receipt_bucket = Some(bucket);
        }
        if let Some(table) = lookup("EXPENSE_TABLE_NAME") {
            self.expense_table = Some(table);
        }
        if let Some(client_id) = lookup("EXPENSE_COGNITO_CLIENT_ID") {
            self.cognito_client_id = Some(client_id);
        }
        if let Some(secret) = lookup("EXPENSE_COGNITO_CLIENT_SECRET").filter(|s| !s.is_empty()) {
            self.cognito_client_secret = Some(SecretString::new(secret));
        }

        if let Some(val) = lookup("EXPENSE_INTEGRATION_PATH_STYLE") {
            self.path_style = Some(val.to_lowercase() == "true");
        }
        if let Some(val) = lookup("EXPENSE_INTEGRATION_TIMEOUT_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => self.read_timeout = Some(Duration::from_millis(ms)),
                Err(e) => warn!(
                    variable = "EXPENSE_INTEGRATION_TIMEOUT_MS",
                    value = %val,
                    error = %e,
                    "Ignoring invalid timeout"
                ),
            }
        }

        self
    }

    /// Build the configuration.
    ///
    /// Fails if region, receipt bucket, expense table or Cognito client ID
    /// is missing, empty, or still a `YOUR_...` placeholder.
    pub fn build(self) -> Result<ExpenseConfig, AwsError> {
        let region = match self.region {
            Some(region) if !region.is_empty() => check_placeholder("region", region)?,
            _ => return Err(AwsError::Configuration(ConfigurationError::MissingRegion)),
        };
        let receipt_bucket = required("receipt_bucket", self.receipt_bucket)?;
        let expense_table = required("expense_table", self.expense_table)?;
        let cognito_client_id = required("cognito_client_id", self.cognito_client_id)?;

        let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);
        if read_timeout.is_zero() {
            return Err(AwsError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    field: "read_timeout".to_string(),
                    message: "must be greater than zero".to_string(),
                },
            ));
        }

        Ok(ExpenseConfig {
            region,
            credentials_provider: self
                .credentials_provider
                .unwrap_or_else(|| Arc::new(ChainCredentialsProvider::new())),
            receipt_bucket,
            expense_table,
            cognito_client_id,
            cognito_client_secret: self.cognito_client_secret,
            endpoint: self.endpoint,
            service_endpoints: self.service_endpoints,
            path_style: self.path_style.unwrap_or(false),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout,
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            idle_timeout: self.idle_timeout.unwrap_or(DEFAULT_IDLE_TIMEOUT),
            verify_ssl: self.verify_ssl.unwrap_or(true),
        })
    }
}

fn parse_endpoint(url_str: String) -> Result<Url, AwsError> {
    Url::parse(&url_str).map_err(|e| {
        AwsError::Configuration(ConfigurationError::InvalidEndpoint {
            url: url_str,
            details: e.to_string(),
        })
    })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, AwsError> {
    match value {
        Some(value) if !value.is_empty() => check_placeholder(field, value),
        _ => Err(AwsError::Configuration(ConfigurationError::MissingSetting {
            field,
        })),
    }
}

fn check_placeholder(field: &'static str, value: String) -> Result<String, AwsError> {
    if value.to_ascii_uppercase().starts_with(PLACEHOLDER_PREFIX) {
        return Err(AwsError::Configuration(
            ConfigurationError::PlaceholderValue { field, value },
        ));
    }
    Ok(value)
}
