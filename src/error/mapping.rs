//! Error code mapping from AWS error responses to typed errors.
//!
//! S3 and SNS report codes in XML bodies, the JSON services in `__type` or
//! the `x-amzn-ErrorType` header. Protocol codecs normalize all of them into
//! an [`AwsErrorResponse`] before mapping.

use super::*;

/// Parsed AWS error response, independent of wire protocol.
#[derive(Debug, Clone, Default)]
pub struct AwsErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// AWS error code without namespace (e.g., "NoSuchBucket").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// AWS request ID.
    pub request_id: Option<String>,
    /// Retry hint from a `Retry-After` header.
    pub retry_after: Option<Duration>,
}

impl AwsErrorResponse {
    fn message_opt(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.clone())
        }
    }
}

/// Map an AWS error code to a typed error.
///
/// Falls back to [`map_http_status`] semantics for codes it does not know.
pub fn map_error_code(resp: AwsErrorResponse) -> AwsError {
    if resp.code.is_empty() {
        return map_http_status(resp.status, resp.request_id);
    }

    let code = resp.code.clone();
    match code.as_str() {
        // Throttling
        "SlowDown"
        | "Throttling"
        | "ThrottlingException"
        | "Throttled"
        | "TooManyRequestsException"
        | "RequestLimitExceeded"
        | "ProvisionedThroughputExceededException"
        | "LimitExceededException"
        | "KMSThrottling"
        | "KMSThrottlingException" => AwsError::Server(ServerError::Throttled {
            message: resp.message,
            retry_after: resp.retry_after,
            request_id: resp.request_id,
            code: resp.code,
        }),

        // Server faults
        "InternalError" | "InternalErrorException" | "InternalServerError"
        | "InternalFailure" => AwsError::Server(ServerError::InternalError {
            message: resp.message_opt(),
            request_id: resp.request_id,
            code: resp.code,
        }),
        "ServiceUnavailable" | "ServiceUnavailableException" => {
            AwsError::Server(ServerError::ServiceUnavailable {
                retry_after: resp.retry_after,
                request_id: resp.request_id,
            })
        }

        // Access
        "AccessDenied" | "AccessDeniedException" | "AuthorizationError" => {
            AwsError::Access(AccessError::AccessDenied {
                message: resp.message_opt(),
                request_id: resp.request_id,
                code: resp.code,
            })
        }
        "InvalidAccessKeyId"
        | "SignatureDoesNotMatch"
        | "UnrecognizedClientException"
        | "InvalidSignatureException"
        | "IncompleteSignature"
        | "MissingAuthenticationToken"
        | "InvalidClientTokenId"
        | "InvalidSecurity" => AwsError::Access(AccessError::InvalidCredentials {
            message: resp.message,
            request_id: resp.request_id,
            code: resp.code,
        }),
        "ExpiredToken" | "ExpiredTokenException" | "RequestExpired" => {
            AwsError::Access(AccessError::ExpiredToken {
                request_id: resp.request_id,
            })
        }

        // Cognito sign-in outcomes
        "NotAuthorizedException" => AwsError::Access(AccessError::NotAuthorized {
            message: resp.message,
            request_id: resp.request_id,
        }),
        "UserNotFoundException" => AwsError::Access(AccessError::UserNotFound {
            request_id: resp.request_id,
        }),
        "UserNotConfirmedException" => AwsError::Access(AccessError::UserNotConfirmed {
            request_id: resp.request_id,
        }),
        "PasswordResetRequiredException" => {
            AwsError::Access(AccessError::PasswordResetRequired {
                request_id: resp.request_id,
            })
        }

        // Missing resources
        "NoSuchBucket" | "ResourceNotFoundException" | "NotFound" => {
            AwsError::Request(RequestError::ResourceNotFound {
                message: resp.message,
                request_id: resp.request_id,
                code: resp.code,
            })
        }

        // Payload limits
        "EntityTooLarge" | "DocumentTooLargeException" | "ItemCollectionSizeLimitExceededException" => {
            AwsError::Request(RequestError::PayloadTooLarge {
                message: resp.message,
                request_id: resp.request_id,
                code: resp.code,
            })
        }

        // Document analysis
        "UnsupportedDocumentException" | "BadDocumentException" => {
            AwsError::Request(RequestError::UnsupportedDocument {
                message: resp.message,
                request_id: resp.request_id,
                code: resp.code,
            })
        }

        // Validation
        "ValidationException"
        | "InvalidParameter"
        | "InvalidParameterException"
        | "InvalidParameterValue"
        | "InvalidParameterValueException"
        | "SerializationException"
        | "InvalidRequest"
        | "InvalidArgument"
        | "InvalidBucketName"
        | "MalformedXML"
        | "MissingContentLength"
        | "BadDigest"
        | "InvalidDigest" => AwsError::Request(RequestError::Validation {
            message: resp.message,
            request_id: resp.request_id,
            code: Some(resp.code),
        }),

        // Unknown codes are classified by status
        _ => match resp.status {
            500..=599 => AwsError::Server(ServerError::InternalError {
                message: Some(format!("{} - {}", resp.code, resp.message)),
                request_id: resp.request_id,
                code: resp.code,
            }),
            _ => AwsError::Request(RequestError::Rejected {
                message: resp.message,
                request_id: resp.request_id,
                code: resp.code,
            }),
        },
    }
}

/// Map an HTTP status code to an error when no AWS error code is available.
pub fn map_http_status(status: u16, request_id: Option<String>) -> AwsError {
    match status {
        400 => AwsError::Request(RequestError::Validation {
            code: None,
            message: "Bad request".to_string(),
            request_id,
        }),
        401 | 403 => AwsError::Access(AccessError::AccessDenied {
            code: "AccessDenied".to_string(),
            message: None,
            request_id,
        }),
        404 => AwsError::Request(RequestError::ResourceNotFound {
            code: "NotFound".to_string(),
            message: "Not found".to_string(),
            request_id,
        }),
        413 => AwsError::Request(RequestError::PayloadTooLarge {
            code: "RequestEntityTooLarge".to_string(),
            message: "Request entity too large".to_string(),
            request_id,
        }),
        429 => AwsError::Server(ServerError::Throttled {
            code: "TooManyRequests".to_string(),
            message: "Too many requests".to_string(),
            retry_after: None,
            request_id,
        }),
        502 => AwsError::Server(ServerError::BadGateway { request_id }),
        503 => AwsError::Server(ServerError::ServiceUnavailable {
            retry_after: None,
            request_id,
        }),
        500..=599 => AwsError::Server(ServerError::InternalError {
            code: "InternalError".to_string(),
            message: Some(format!("HTTP status {}", status)),
            request_id,
        }),
        _ => AwsError::Request(RequestError::Rejected {
            code: format!("Http{}", status),
            message: format!("HTTP status {}", status),
            request_id,
        }),
    }
}
