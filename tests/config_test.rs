//! Integration tests for configuration and client construction.

use aws_expense::mocks::TestFixtures;
use aws_expense::{AwsError, ConfigurationError, ExpenseClient, ExpenseClientBuilder, Service};
use test_case::test_case;

#[test_case("region", ConfigurationError::MissingRegion ; "region")]
#[test_case("receipt_bucket", ConfigurationError::MissingSetting { field: "receipt_bucket" } ; "bucket")]
#[test_case("expense_table", ConfigurationError::MissingSetting { field: "expense_table" } ; "table")]
#[test_case("cognito_client_id", ConfigurationError::MissingSetting { field: "cognito_client_id" } ; "client id")]
fn test_empty_required_setting(field: &str, expected: ConfigurationError) {
    let builder = TestFixtures::config_builder();
    let builder = match field {
        "region" => builder.region(""),
        "receipt_bucket" => builder.receipt_bucket(""),
        "expense_table" => builder.expense_table(""),
        _ => builder.cognito_client_id(""),
    };

    let err = builder.build().unwrap_err();
    assert!(matches!(err, AwsError::Configuration(_)));
    assert_eq!(err.to_string(), AwsError::Configuration(expected).to_string());
}

#[test_case("YOUR_BUCKET_NAME" ; "upper")]
#[test_case("your_bucket" ; "lower")]
fn test_placeholder_bucket_rejected(value: &str) {
    let err = TestFixtures::config_builder()
        .receipt_bucket(value)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        AwsError::Configuration(ConfigurationError::PlaceholderValue { field: "receipt_bucket", .. })
    ));
}

#[test]
fn test_client_exposes_all_services() {
    let client = ExpenseClientBuilder::new()
        .config(TestFixtures::config_builder().build().unwrap())
        .build()
        .unwrap();

    let _ = client.receipts();
    let _ = client.auth();
    let _ = client.expenses();
    let _ = client.alerts();
    let _ = client.documents();

    let url = client.config().resolve_endpoint(Service::Sns, None).unwrap();
    assert_eq!(url.as_str(), "https://sns.us-east-1.amazonaws.com/");
    client.shutdown();
}
