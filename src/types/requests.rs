//! Request types for the expense operations.

use crate::error::{AwsError, RequestError};
use bytes::Bytes;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reject an empty required field.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), AwsError> {
    if value.is_empty() {
        return Err(RequestError::validation(format!("{} must not be empty", field)).into());
    }
    Ok(())
}

/// Request to upload a receipt image.
#[derive(Debug, Clone)]
pub struct UploadReceiptRequest {
    /// Owning user; becomes the key prefix.
    pub owner_id: String,
    /// File name under the owner prefix.
    pub file_name: String,
    /// Object body.
    pub content: Bytes,
    /// MIME type stored with the object.
    pub content_type: String,
}

impl UploadReceiptRequest {
    /// Create a new upload request.
    pub fn new(
        owner_id: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            file_name: file_name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Destination object key: `{owner_id}/{file_name}`.
    pub fn object_key(&self) -> String {
        format!("{}/{}", self.owner_id, self.file_name)
    }

    /// Rejects keys with a `.` or `..` segment: URL path normalization,
    /// percent-encoded or not, would send those to a different key.
    pub(crate) fn validate(&self) -> Result<(), AwsError> {
        require_non_empty("owner_id", &self.owner_id)?;
        require_non_empty("file_name", &self.file_name)?;
        require_non_empty("content_type", &self.content_type)?;

        let key = self.object_key();
        if let Some(segment) = key.split('/').find(|s| matches!(*s, "." | "..")) {
            return Err(RequestError::validation(format!(
                "object key '{}' contains a '{}' segment",
                key, segment
            ))
            .into());
        }
        Ok(())
    }
}

/// Request to sign a user in with username and password.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    /// User name or alias.
    pub username: String,
    /// Password, sent as-is.
    pub password: SecretString,
}

impl SignInRequest {
    /// Authentication flow used for every sign-in.
    pub const AUTH_FLOW: &'static str = "USER_PASSWORD_AUTH";

    /// Create a new sign-in request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AwsError> {
        use secrecy::ExposeSecret;
        require_non_empty("username", &self.username)?;
        require_non_empty("password", self.password.expose_secret())
    }
}

/// A DynamoDB attribute value with its type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, carried as its decimal text.
    N(String),
}

/// Request to store one expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct PutExpenseRequest {
    /// Owning user.
    pub owner_id: String,
    /// Amount spent.
    pub amount: f64,
    /// Free-form category.
    pub category: String,
    /// Expense date, stored as given.
    pub date: String,
}

impl PutExpenseRequest {
    /// Create a new expense record request.
    pub fn new(
        owner_id: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }

    /// The item as written to the table.
    ///
    /// The amount uses Rust's shortest round-trip decimal form.
    pub fn to_item(&self) -> BTreeMap<String, AttributeValue> {
        let mut item = BTreeMap::new();
        item.insert("userId".to_string(), AttributeValue::S(self.owner_id.clone()));
        item.insert("amount".to_string(), AttributeValue::N(self.amount.to_string()));
        item.insert("category".to_string(), AttributeValue::S(self.category.clone()));
        item.insert("date".to_string(), AttributeValue::S(self.date.clone()));
        item
    }

    pub(crate) fn validate(&self) -> Result<(), AwsError> {
        require_non_empty("owner_id", &self.owner_id)?;
        require_non_empty("category", &self.category)?;
        require_non_empty("date", &self.date)?;
        if !self.amount.is_finite() {
            return Err(RequestError::validation(format!(
                "amount must be a finite number, got {}",
                self.amount
            ))
            .into());
        }
        Ok(())
    }
}

/// Request to publish a budget alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAlertRequest {
    /// Destination topic ARN.
    pub topic_arn: String,
    /// Message body.
    pub message: String,
}

impl PublishAlertRequest {
    /// Create a new publish request.
    pub fn new(topic_arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            message: message.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AwsError> {
        require_non_empty("topic_arn", &self.topic_arn)?;
        require_non_empty("message", &self.message)
    }
}

/// Request to analyze a receipt document.
#[derive(Debug, Clone)]
pub struct AnalyzeReceiptRequest {
    /// Raw document bytes (PNG, JPEG, PDF or TIFF).
    pub document: Bytes,
}

impl AnalyzeReceiptRequest {
    /// Analysis features requested for every document.
    pub const FEATURE_TYPES: [&'static str; 1] = ["FORMS"];

    /// Create a new analysis request.
    pub fn new(document: impl Into<Bytes>) -> Self {
        Self {
            document: document.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AwsError> {
        if self.document.is_empty() {
            return Err(RequestError::validation("document must not be empty").into());
        }
        Ok(())
    }
}
