//! Types shared across services.

use std::fmt;

/// The remote services the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// S3 object storage (receipt uploads).
    S3,
    /// Cognito user pools (sign-in).
    CognitoIdentityProvider,
    /// DynamoDB (expense records).
    DynamoDb,
    /// SNS (budget alerts).
    Sns,
    /// Textract (receipt analysis).
    Textract,
}

impl Service {
    /// All services, in client order.
    pub const ALL: [Service; 5] = [
        Service::S3,
        Service::CognitoIdentityProvider,
        Service::DynamoDb,
        Service::Sns,
        Service::Textract,
    ];

    /// SigV4 signing name.
    pub fn signing_name(&self) -> &'static str {
        match self {
            Service::S3 => "s3",
            Service::CognitoIdentityProvider => "cognito-idp",
            Service::DynamoDb => "dynamodb",
            Service::Sns => "sns",
            Service::Textract => "textract",
        }
    }

    /// Hostname prefix in `{prefix}.{region}.amazonaws.com`.
    pub fn endpoint_prefix(&self) -> &'static str {
        match self {
            Service::CognitoIdentityProvider => "cognito-idp",
            other => other.signing_name(),
        }
    }

    /// Environment variable holding a per-service endpoint override.
    pub fn endpoint_env_var(&self) -> &'static str {
        match self {
            Service::S3 => "AWS_ENDPOINT_URL_S3",
            Service::CognitoIdentityProvider => "AWS_ENDPOINT_URL_COGNITO_IDENTITY_PROVIDER",
            Service::DynamoDb => "AWS_ENDPOINT_URL_DYNAMODB",
            Service::Sns => "AWS_ENDPOINT_URL_SNS",
            Service::Textract => "AWS_ENDPOINT_URL_TEXTRACT",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signing_name())
    }
}
