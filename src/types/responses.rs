//! Response types for the expense operations.
//!
//! JSON service results deserialize from the wire shape directly and are
//! returned without reshaping.

use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

/// Response from a receipt upload.
#[derive(Debug, Clone, Default)]
pub struct UploadReceiptOutput {
    /// Key the receipt was stored under.
    pub key: String,
    /// ETag of the stored object.
    pub e_tag: Option<String>,
    /// Version ID if bucket versioning is enabled.
    pub version_id: Option<String>,
    /// AWS request ID.
    pub request_id: Option<String>,
}

/// Result of an `InitiateAuth` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignInOutput {
    /// Tokens, present when no further challenge is required.
    pub authentication_result: Option<AuthenticationResult>,
    /// Name of the challenge the caller must answer next.
    pub challenge_name: Option<String>,
    /// Parameters for the challenge.
    #[serde(default)]
    pub challenge_parameters: HashMap<String, String>,
    /// Session to pass back when answering a challenge.
    pub session: Option<SecretString>,
    /// AWS request ID.
    #[serde(skip)]
    pub request_id: Option<String>,
}

/// Tokens issued on successful authentication.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    /// Access token.
    pub access_token: Option<SecretString>,
    /// ID token.
    pub id_token: Option<SecretString>,
    /// Refresh token.
    pub refresh_token: Option<SecretString>,
    /// Token lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Token type, normally `Bearer`.
    pub token_type: Option<String>,
    /// Metadata of a newly remembered device.
    pub new_device_metadata: Option<NewDeviceMetadata>,
}

/// Device metadata returned for new devices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewDeviceMetadata {
    /// Device key.
    pub device_key: Option<String>,
    /// Device group key.
    pub device_group_key: Option<String>,
}

/// Result of a `PutItem` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutExpenseOutput {
    /// Capacity consumed, when requested.
    pub consumed_capacity: Option<ConsumedCapacity>,
    /// AWS request ID.
    #[serde(skip)]
    pub request_id: Option<String>,
}

/// Capacity units consumed by a write.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// Table the capacity was consumed on.
    pub table_name: Option<String>,
    /// Total capacity units.
    pub capacity_units: Option<f64>,
    /// Write capacity units.
    pub write_capacity_units: Option<f64>,
}

/// Result of an SNS `Publish` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishAlertOutput {
    /// Message ID assigned by SNS.
    pub message_id: String,
    /// Sequence number (FIFO topics only).
    pub sequence_number: Option<String>,
    /// AWS request ID.
    pub request_id: Option<String>,
}

/// Result of an `AnalyzeDocument` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzeDocumentOutput {
    /// Detected blocks.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Document metadata.
    pub document_metadata: Option<DocumentMetadata>,
    /// Model version used for the analysis.
    pub analyze_document_model_version: Option<String>,
    /// AWS request ID.
    #[serde(skip)]
    pub request_id: Option<String>,
}

/// Document metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    /// Number of pages.
    pub pages: Option<u32>,
}

/// A detected item: page, line, word, key-value set or selection element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Block type (`PAGE`, `LINE`, `WORD`, `KEY_VALUE_SET`, ...).
    pub block_type: Option<String>,
    /// Block identifier.
    pub id: Option<String>,
    /// Confidence, 0 to 100.
    pub confidence: Option<f32>,
    /// Detected text.
    pub text: Option<String>,
    /// `PRINTED` or `HANDWRITING`.
    pub text_type: Option<String>,
    /// `KEY` or `VALUE` for key-value sets.
    #[serde(default)]
    pub entity_types: Vec<String>,
    /// Selection status for selection elements.
    pub selection_status: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Location on the page.
    pub geometry: Option<Geometry>,
    /// Links to other blocks.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Block location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    /// Axis-aligned box.
    pub bounding_box: Option<BoundingBox>,
    /// Fine-grained outline.
    #[serde(default)]
    pub polygon: Vec<Point>,
}

/// Axis-aligned box, as ratios of page size.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
}

/// Polygon point, as ratios of page size.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

/// Relationship from one block to others.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// `CHILD`, `VALUE`, ...
    #[serde(rename = "Type")]
    pub relationship_type: Option<String>,
    /// Related block IDs.
    #[serde(default)]
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_sign_in_output_tokens() {
        let json = r#"{
            "AuthenticationResult": {
                "AccessToken": "access",
                "IdToken": "id",
                "RefreshToken": "refresh",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        }"#;

        let output: SignInOutput = serde_json::from_str(json).unwrap();
        let result = output.authentication_result.unwrap();
        assert_eq!(result.access_token.unwrap().expose_secret(), "access");
        assert_eq!(result.expires_in, Some(3600));
        assert!(output.challenge_name.is_none());
    }

    #[test]
    fn test_sign_in_output_debug_redacts_tokens() {
        let json = r#"{"AuthenticationResult": {"AccessToken": "very-secret-token"}}"#;
        let output: SignInOutput = serde_json::from_str(json).unwrap();
        assert!(!format!("{:?}", output).contains("very-secret-token"));
    }

    #[test]
    fn test_sign_in_output_challenge() {
        let json = r#"{
            "ChallengeName": "NEW_PASSWORD_REQUIRED",
            "ChallengeParameters": {"USER_ID_FOR_SRP": "alice"},
            "Session": "sess"
        }"#;

        let output: SignInOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.challenge_name.as_deref(), Some("NEW_PASSWORD_REQUIRED"));
        assert_eq!(output.challenge_parameters["USER_ID_FOR_SRP"], "alice");
        assert!(output.authentication_result.is_none());
    }

    #[test]
    fn test_analyze_document_output() {
        let json = r#"{
            "DocumentMetadata": {"Pages": 1},
            "AnalyzeDocumentModelVersion": "1.0",
            "Blocks": [
                {"BlockType": "PAGE", "Id": "p1", "Relationships": [{"Type": "CHILD", "Ids": ["k1"]}]},
                {"BlockType": "KEY_VALUE_SET", "Id": "k1", "EntityTypes": ["KEY"], "Confidence": 98.5,
                 "Geometry": {"BoundingBox": {"Width": 0.1, "Height": 0.02, "Left": 0.3, "Top": 0.4},
                              "Polygon": [{"X": 0.3, "Y": 0.4}]}}
            ]
        }"#;

        let output: AnalyzeDocumentOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.blocks.len(), 2);
        assert_eq!(output.document_metadata.unwrap().pages, Some(1));
        assert_eq!(output.blocks[0].relationships[0].ids, vec!["k1"]);
        assert_eq!(output.blocks[1].entity_types, vec!["KEY"]);
    }

    #[test]
    fn test_put_expense_output_empty_body() {
        let output: PutExpenseOutput = serde_json::from_str("{}").unwrap();
        assert!(output.consumed_capacity.is_none());
    }
}
