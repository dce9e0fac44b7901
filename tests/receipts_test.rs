//! Integration tests for ReceiptsService.

use aws_expense::error::ErrorCategory;
use aws_expense::mocks::{MockResponse, MockSigner, MockTransport, TestFixtures};
use aws_expense::services::ReceiptsService;
use aws_expense::types::*;
use aws_expense::AwsError;
use proptest::prelude::*;
use std::sync::Arc;

fn create_test_service(transport: Arc<MockTransport>) -> ReceiptsService {
    ReceiptsService::new(
        TestFixtures::config(),
        transport,
        Arc::new(MockSigner::for_service("s3")),
    )
}

#[tokio::test]
async fn test_upload_success() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok()
        .with_header("etag", "\"5d41402abc4b2a76b9719d911017c592\"")
        .with_header("x-amz-version-id", "v1")
        .with_header("x-amz-request-id", "REQ-1")]));
    let service = create_test_service(transport.clone());

    let output = service
        .upload(UploadReceiptRequest::new(
            "user-42",
            "lunch.jpg",
            b"hello".to_vec(),
            "image/jpeg",
        ))
        .await
        .unwrap();

    assert_eq!(output.key, "user-42/lunch.jpg");
    assert_eq!(
        output.e_tag.as_deref(),
        Some("\"5d41402abc4b2a76b9719d911017c592\"")
    );
    assert_eq!(output.version_id.as_deref(), Some("v1"));
    assert_eq!(output.request_id.as_deref(), Some("REQ-1"));

    let recorded = transport.last_request().unwrap();
    assert_eq!(recorded.method, "PUT");
    assert_eq!(
        recorded.url,
        "https://expense-receipts.s3.us-east-1.amazonaws.com/user-42/lunch.jpg"
    );
    assert_eq!(recorded.get_header("content-type"), Some("image/jpeg"));
    assert_eq!(recorded.get_header("content-length"), Some("5"));
    assert_eq!(recorded.body.as_deref(), Some(&b"hello"[..]));
    assert!(recorded.get_header("amz-sdk-invocation-id").is_some());
}

#[tokio::test]
async fn test_upload_overwrites_without_precondition() {
    let transport = Arc::new(MockTransport::new().with_default(MockResponse::ok()));
    let service = create_test_service(transport.clone());

    for _ in 0..2 {
        service
            .upload(UploadReceiptRequest::new("u1", "r.png", vec![1u8], "image/png"))
            .await
            .unwrap();
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.get_header("if-none-match").is_none() && r.get_header("if-match").is_none()));
}

#[tokio::test]
async fn test_upload_access_denied() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        403,
        TestFixtures::s3_error_xml("AccessDenied", "Access Denied"),
    )]));
    let service = create_test_service(transport);

    let err = service
        .upload(UploadReceiptRequest::new("u1", "r.png", vec![1u8], "image/png"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Authorization);
    assert_eq!(err.error_code(), Some("AccessDenied"));
    assert_eq!(err.request_id(), Some("test-request-id"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_upload_missing_bucket() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        404,
        TestFixtures::s3_error_xml("NoSuchBucket", "The specified bucket does not exist"),
    )]));
    let service = create_test_service(transport);

    let err = service
        .upload(UploadReceiptRequest::new("u1", "r.png", vec![1u8], "image/png"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Permanent);
    assert_eq!(err.error_code(), Some("NoSuchBucket"));
}

#[tokio::test]
async fn test_upload_slow_down_is_transient() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        503,
        TestFixtures::s3_error_xml("SlowDown", "Please reduce your request rate."),
    )
    .with_header("retry-after", "2")]));
    let service = create_test_service(transport);

    let err = service
        .upload(UploadReceiptRequest::new("u1", "r.png", vec![1u8], "image/png"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Transient);
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(2)));
}

#[tokio::test]
async fn test_upload_signing_failure_sends_nothing() {
    let transport = Arc::new(MockTransport::new().with_default(MockResponse::ok()));
    let signer = Arc::new(MockSigner::with_error(AwsError::Credentials(
        aws_expense::CredentialsError::NotFound,
    )));
    let service = ReceiptsService::new(TestFixtures::config(), transport.clone(), signer);

    let err = service
        .upload(UploadReceiptRequest::new("u1", "r.png", vec![1u8], "image/png"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Authorization);
    assert_eq!(transport.request_count(), 0);
}

fn sent_key(transport: &MockTransport) -> String {
    let url = url::Url::parse(&transport.last_request().unwrap().url).unwrap();
    percent_encoding::percent_decode_str(url.path().trim_start_matches('/'))
        .decode_utf8()
        .unwrap()
        .into_owned()
}

#[tokio::test]
async fn test_dot_segment_keys_are_rejected_before_sending() {
    let transport = Arc::new(MockTransport::new().with_default(MockResponse::ok()));
    let service = create_test_service(transport.clone());

    for (owner, file) in [("u1", ".."), ("u1", "."), ("..", "r.png"), ("u1", "a/../b.png")] {
        let err = service
            .upload(UploadReceiptRequest::new(owner, file, vec![1u8], "image/png"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Permanent, "{owner}/{file}");
    }
    assert_eq!(transport.request_count(), 0);
}

proptest! {
    #[test]
    fn prop_upload_key_is_owner_slash_file(
        owner in "[A-Za-z0-9_.-]{1,16}",
        file in "[A-Za-z0-9 ./_#-]{1,24}",
    ) {
        let transport = Arc::new(MockTransport::new().with_default(MockResponse::ok()));
        let service = create_test_service(transport.clone());
        let key = format!("{}/{}", owner, file);
        let addressable = !key.split('/').any(|s| s == "." || s == "..");

        let result = tokio_test::block_on(service.upload(UploadReceiptRequest::new(
            owner.clone(),
            file.clone(),
            vec![0u8; 3],
            "image/png",
        )));

        if addressable {
            let output = result.unwrap();
            prop_assert_eq!(&output.key, &key);
            prop_assert_eq!(sent_key(&transport), key);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(transport.request_count(), 0);
        }
    }
}
