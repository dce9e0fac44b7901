//! AWS Expense Integration
//!
//! Thin, typed wrappers over the five AWS calls an expense tracker needs:
//! receipt upload to S3, sign-in through Cognito user pools, expense records
//! in DynamoDB, budget alerts over SNS and receipt analysis with Textract.
//!
//! # Features
//!
//! - **AWS Signature V4**: Request signing per service, no SDK required
//! - **Passthrough**: Each operation is exactly one remote call
//! - **Typed Errors**: Transient, permanent and authorization failures
//! - **Observability**: `tracing` spans on every operation
//! - **Testable**: Transport, signer and credentials are trait seams
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aws_expense::{ExpenseClient, PutExpenseRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aws_expense::AwsError> {
//!     // Create client from environment
//!     let client = aws_expense::create_client_from_env()?;
//!
//!     // Record an expense
//!     client
//!         .expenses()
//!         .add(PutExpenseRequest::new("user-1", 12.5, "food", "2024-01-01"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod protocol;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export main types at crate root
pub use client::{ExpenseClient, ExpenseClientBuilder, ExpenseClientImpl};
pub use config::{ExpenseConfig, ExpenseConfigBuilder};
pub use credentials::{
    AwsCredentials, ChainCredentialsProvider, CredentialsProvider, EnvCredentialsProvider,
    ProfileCredentialsProvider, StaticCredentialsProvider,
};
pub use error::{
    AccessError, AwsError, ConfigurationError, CredentialsError, ErrorCategory, NetworkError,
    RequestError, ResponseError, ServerError, SigningError,
};
pub use services::{AlertsService, AuthService, DocumentsService, ExpensesService, ReceiptsService};
pub use signing::{AwsSigner, AwsSignerV4};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    // Request types
    AnalyzeReceiptRequest,
    AttributeValue,
    PublishAlertRequest,
    PutExpenseRequest,
    SignInRequest,
    UploadReceiptRequest,
    // Response types
    AnalyzeDocumentOutput,
    AuthenticationResult,
    Block,
    PublishAlertOutput,
    PutExpenseOutput,
    SignInOutput,
    UploadReceiptOutput,
    // Common types
    Service,
};

/// Create a new expense client from environment variables.
///
/// This will attempt to read configuration from:
/// - `AWS_REGION` / `AWS_DEFAULT_REGION` for region
/// - `EXPENSE_RECEIPT_BUCKET`, `EXPENSE_TABLE_NAME`, `EXPENSE_COGNITO_CLIENT_ID`
/// - `EXPENSE_COGNITO_CLIENT_SECRET` for app clients with a secret
/// - `AWS_ENDPOINT_URL` / `AWS_ENDPOINT_URL_<SERVICE>` for custom endpoints
///
/// Credentials come from the default chain (environment, then profile file).
///
/// # Example
///
/// ```rust,no_run
/// let client = aws_expense::create_client_from_env()?;
/// # Ok::<(), aws_expense::AwsError>(())
/// ```
pub fn create_client_from_env() -> Result<ExpenseClientImpl> {
    ExpenseClientBuilder::new().from_env().build()
}

/// Create a new expense client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use aws_expense::{AwsCredentials, ExpenseConfig, StaticCredentialsProvider};
/// use std::sync::Arc;
///
/// let config = ExpenseConfig::builder()
///     .region("us-west-2")
///     .receipt_bucket("expense-receipts")
///     .expense_table("Expenses")
///     .cognito_client_id("1example23456789")
///     .credentials_provider(Arc::new(StaticCredentialsProvider::new(
///         AwsCredentials::new("AKID", "SECRET"),
///     )))
///     .build()?;
///
/// let client = aws_expense::create_client(config)?;
/// # Ok::<(), aws_expense::AwsError>(())
/// ```
pub fn create_client(config: ExpenseConfig) -> Result<ExpenseClientImpl> {
    ExpenseClientBuilder::new().config(config).build()
}

/// Result type alias for expense operations.
pub type Result<T> = std::result::Result<T, AwsError>;
