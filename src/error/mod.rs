//! Error types for the expense integration.
//!
//! Every failure surfaces as an [`AwsError`]. Remote failures from all five
//! services are mapped into the same hierarchy, and each error reports an
//! [`ErrorCategory`] so callers can tell a retryable hiccup from bad input or
//! a credentials problem without matching on service-specific codes.

mod mapping;

pub use mapping::{map_error_code, map_http_status, AwsErrorResponse};

use std::time::Duration;
use thiserror::Error;

/// Broad classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The call may succeed if repeated later (network, 5xx, throttling).
    Transient,
    /// The request or configuration is invalid; repeating it will not help.
    Permanent,
    /// Credentials are missing, wrong, expired, or lack permission.
    Authorization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Transient => "transient",
            ErrorCategory::Permanent => "permanent",
            ErrorCategory::Authorization => "authorization",
        };
        f.write_str(s)
    }
}

/// Top-level error type for the expense integration.
#[derive(Debug, Error)]
pub enum AwsError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credential-related errors.
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Signature V4 errors.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// The request was rejected as invalid, locally or by the service.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Access and authorization errors.
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Server-side errors, including throttling.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Response parsing errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl AwsError {
    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AwsError::Network(e) if e.is_retryable() => ErrorCategory::Transient,
            AwsError::Server(_) => ErrorCategory::Transient,
            AwsError::Access(_) | AwsError::Credentials(_) => ErrorCategory::Authorization,
            AwsError::Network(_)
            | AwsError::Configuration(_)
            | AwsError::Signing(_)
            | AwsError::Request(_)
            | AwsError::Response(_) => ErrorCategory::Permanent,
        }
    }

    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    /// Returns the retry delay hint if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AwsError::Server(ServerError::Throttled { retry_after, .. }) => *retry_after,
            AwsError::Server(ServerError::ServiceUnavailable { retry_after, .. }) => *retry_after,
            _ => None,
        }
    }

    /// Returns the AWS error code reported by the service, if any.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            AwsError::Request(e) => e.code(),
            AwsError::Access(e) => Some(e.code()),
            AwsError::Server(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            AwsError::Request(e) => e.request_id(),
            AwsError::Access(e) => e.request_id(),
            AwsError::Server(e) => e.request_id(),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing required region configuration.
    #[error("Missing region: region must be specified via config or environment")]
    MissingRegion,

    /// A required setting was not provided.
    #[error("Missing setting: {field} must be specified via config or environment")]
    MissingSetting {
        /// The setting name.
        field: &'static str,
    },

    /// A setting still holds a template placeholder.
    #[error("Placeholder value for {field}: '{value}' must be replaced with a real value")]
    PlaceholderValue {
        /// The setting name.
        field: &'static str,
        /// The placeholder that was supplied.
        value: String,
    },

    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Details about the validation error.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Credential-related errors.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// No credentials could be found.
    #[error("Credentials not found: no credentials could be loaded from any source")]
    NotFound,

    /// Credentials have expired.
    #[error("Credentials expired: session credentials expired at {expiration}")]
    Expired {
        /// When the credentials expired.
        expiration: String,
    },

    /// Credentials are invalid.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why credentials are invalid.
        message: String,
    },

    /// Profile configuration error.
    #[error("Profile error: {message}")]
    ProfileError {
        /// Details about the profile error.
        message: String,
    },
}

/// Signature V4 signing errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The URL cannot be signed (no host).
    #[error("Invalid URL for signing: {message}")]
    InvalidUrl {
        /// Details about the URL problem.
        message: String,
    },

    /// Signature calculation failed.
    #[error("Signature calculation failed: {message}")]
    CalculationFailed {
        /// Details about the calculation error.
        message: String,
    },
}

/// Request errors: the input was invalid or referenced something missing.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request failed validation, locally or remotely.
    #[error("Validation error: {message}")]
    Validation {
        /// AWS error code, when the service reported one.
        code: Option<String>,
        /// Details about the validation error.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// A referenced resource (bucket, table, topic) does not exist.
    #[error("Resource not found ({code}): {message}")]
    ResourceNotFound {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The payload exceeds a service limit.
    #[error("Payload too large ({code}): {message}")]
    PayloadTooLarge {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The document format cannot be processed.
    #[error("Unsupported document ({code}): {message}")]
    UnsupportedDocument {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Any other client-side fault reported by the service.
    #[error("Request rejected ({code}): {message}")]
    Rejected {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },
}

impl RequestError {
    /// Build a local validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RequestError::Validation {
            code: None,
            message: message.into(),
            request_id: None,
        }
    }

    /// Returns the AWS error code, if the service reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            RequestError::Validation { code, .. } => code.as_deref(),
            RequestError::ResourceNotFound { code, .. }
            | RequestError::PayloadTooLarge { code, .. }
            | RequestError::UnsupportedDocument { code, .. }
            | RequestError::Rejected { code, .. } => Some(code),
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            RequestError::Validation { request_id, .. }
            | RequestError::ResourceNotFound { request_id, .. }
            | RequestError::PayloadTooLarge { request_id, .. }
            | RequestError::UnsupportedDocument { request_id, .. }
            | RequestError::Rejected { request_id, .. } => request_id.as_deref(),
        }
    }
}

/// Access and authorization errors.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The principal lacks permission for the operation.
    #[error("Access denied: {}", message.as_deref().unwrap_or("no details provided"))]
    AccessDenied {
        /// AWS error code.
        code: String,
        /// Error message.
        message: Option<String>,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The access key or request signature was not accepted.
    #[error("Invalid credentials ({code}): {message}")]
    InvalidCredentials {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The session token has expired.
    #[error("Expired token")]
    ExpiredToken {
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Cognito rejected the username/password pair.
    #[error("Not authorized: {message}")]
    NotAuthorized {
        /// Error message.
        message: String,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The user does not exist in the user pool.
    #[error("User not found")]
    UserNotFound {
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The user has not confirmed their account.
    #[error("User not confirmed")]
    UserNotConfirmed {
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The user must reset their password before signing in.
    #[error("Password reset required")]
    PasswordResetRequired {
        /// AWS request ID.
        request_id: Option<String>,
    },
}

impl AccessError {
    /// Returns the AWS error code.
    pub fn code(&self) -> &str {
        match self {
            AccessError::AccessDenied { code, .. } => code,
            AccessError::InvalidCredentials { code, .. } => code,
            AccessError::ExpiredToken { .. } => "ExpiredToken",
            AccessError::NotAuthorized { .. } => "NotAuthorizedException",
            AccessError::UserNotFound { .. } => "UserNotFoundException",
            AccessError::UserNotConfirmed { .. } => "UserNotConfirmedException",
            AccessError::PasswordResetRequired { .. } => "PasswordResetRequiredException",
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            AccessError::AccessDenied { request_id, .. }
            | AccessError::InvalidCredentials { request_id, .. }
            | AccessError::ExpiredToken { request_id }
            | AccessError::NotAuthorized { request_id, .. }
            | AccessError::UserNotFound { request_id }
            | AccessError::UserNotConfirmed { request_id }
            | AccessError::PasswordResetRequired { request_id } => request_id.as_deref(),
        }
    }
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// Timeout duration.
        duration: Duration,
    },

    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be built (TLS backend).
    #[error("TLS error: {message}")]
    TlsError {
        /// Error message.
        message: String,
    },
}

impl NetworkError {
    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NetworkError::Timeout { .. } | NetworkError::ConnectionFailed { .. }
        )
    }
}

/// Server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Internal server error (5xx).
    #[error("Internal server error ({code}): {}", message.as_deref().unwrap_or("no details provided"))]
    InternalError {
        /// AWS error code.
        code: String,
        /// Error message.
        message: Option<String>,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Service unavailable (503).
    #[error("Service unavailable")]
    ServiceUnavailable {
        /// Retry after duration hint.
        retry_after: Option<Duration>,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// The request rate or provisioned throughput was exceeded.
    #[error("Throttled ({code}): {message}")]
    Throttled {
        /// AWS error code.
        code: String,
        /// Error message.
        message: String,
        /// Retry after duration hint.
        retry_after: Option<Duration>,
        /// AWS request ID.
        request_id: Option<String>,
    },

    /// Bad gateway (502).
    #[error("Bad gateway")]
    BadGateway {
        /// AWS request ID.
        request_id: Option<String>,
    },
}

impl ServerError {
    /// Returns the AWS error code.
    pub fn code(&self) -> &str {
        match self {
            ServerError::InternalError { code, .. } => code,
            ServerError::ServiceUnavailable { .. } => "ServiceUnavailable",
            ServerError::Throttled { code, .. } => code,
            ServerError::BadGateway { .. } => "BadGateway",
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ServerError::InternalError { request_id, .. }
            | ServerError::ServiceUnavailable { request_id, .. }
            | ServerError::Throttled { request_id, .. }
            | ServerError::BadGateway { request_id } => request_id.as_deref(),
        }
    }
}

/// Response parsing errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// XML parse error.
    #[error("XML parse error: {message}")]
    XmlParseError {
        /// Error message.
        message: String,
    },

    /// JSON parse error.
    #[error("JSON parse error: {message}")]
    JsonParseError {
        /// Error message.
        message: String,
    },

    /// Invalid response format.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// Missing required field.
    #[error("Missing required field '{field}' in response")]
    MissingField {
        /// The missing field name.
        field: String,
    },
}
