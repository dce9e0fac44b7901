//! Mock implementations for testing.
//!
//! Transport, signer and credentials doubles plus canned service payloads,
//! usable from unit tests and from integration tests under `tests/`.

mod credentials;
mod signer;
mod transport;

pub use credentials::MockCredentialsProvider;
pub use signer::{MockSigner, SignRequest};
pub use transport::{MockResponse, MockTransport};

use crate::config::{ExpenseConfig, ExpenseConfigBuilder};
use std::sync::Arc;

/// Canned configuration and response bodies.
pub struct TestFixtures;

impl TestFixtures {
    /// A complete builder with mock credentials.
    pub fn config_builder() -> ExpenseConfigBuilder {
        ExpenseConfig::builder()
            .region("us-east-1")
            .receipt_bucket("expense-receipts")
            .expense_table("Expenses")
            .cognito_client_id("test-client-id")
            .credentials_provider(Arc::new(MockCredentialsProvider::new()))
    }

    /// A complete configuration with mock credentials.
    ///
    /// # Panics
    ///
    /// Never for the fixed values used here.
    pub fn config() -> Arc<ExpenseConfig> {
        Arc::new(
            Self::config_builder()
                .build()
                .expect("fixture configuration is valid"),
        )
    }

    /// S3 error body.
    pub fn s3_error_xml(code: &str, message: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>{}</Code>
    <Message>{}</Message>
    <RequestId>test-request-id</RequestId>
</Error>"#,
            code, message
        )
    }

    /// SNS error body.
    pub fn sns_error_xml(code: &str, message: &str) -> String {
        format!(
            r#"<ErrorResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <Error>
    <Type>Sender</Type>
    <Code>{}</Code>
    <Message>{}</Message>
  </Error>
  <RequestId>test-request-id</RequestId>
</ErrorResponse>"#,
            code, message
        )
    }

    /// SNS `PublishResponse` body.
    pub fn publish_response_xml(message_id: &str) -> String {
        format!(
            r#"<PublishResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <PublishResult>
    <MessageId>{}</MessageId>
  </PublishResult>
  <ResponseMetadata>
    <RequestId>test-request-id</RequestId>
  </ResponseMetadata>
</PublishResponse>"#,
            message_id
        )
    }

    /// JSON protocol error body.
    pub fn json_error(code: &str, message: &str) -> String {
        serde_json::json!({ "__type": code, "message": message }).to_string()
    }

    /// Successful `InitiateAuth` result.
    pub fn auth_result_json() -> serde_json::Value {
        serde_json::json!({
            "AuthenticationResult": {
                "AccessToken": "access-token",
                "IdToken": "id-token",
                "RefreshToken": "refresh-token",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        })
    }

    /// Minimal `AnalyzeDocument` result with one key-value pair.
    pub fn analyze_document_json() -> serde_json::Value {
        serde_json::json!({
            "DocumentMetadata": { "Pages": 1 },
            "AnalyzeDocumentModelVersion": "1.0",
            "Blocks": [
                { "BlockType": "PAGE", "Id": "page-1",
                  "Relationships": [{ "Type": "CHILD", "Ids": ["key-1", "value-1"] }] },
                { "BlockType": "KEY_VALUE_SET", "Id": "key-1", "EntityTypes": ["KEY"],
                  "Relationships": [{ "Type": "VALUE", "Ids": ["value-1"] }] },
                { "BlockType": "KEY_VALUE_SET", "Id": "value-1", "EntityTypes": ["VALUE"] }
            ]
        })
    }
}
