//! Integration tests for DocumentsService.

use aws_expense::error::ErrorCategory;
use aws_expense::mocks::{MockResponse, MockSigner, MockTransport, TestFixtures};
use aws_expense::services::DocumentsService;
use aws_expense::types::*;
use std::sync::Arc;

fn create_test_service(transport: Arc<MockTransport>) -> (DocumentsService, Arc<MockSigner>) {
    let signer = Arc::new(MockSigner::for_service("textract"));
    let service = DocumentsService::new(TestFixtures::config(), transport, signer.clone());
    (service, signer)
}

#[tokio::test]
async fn test_analyze_returns_blocks_unmodified() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::json(
        TestFixtures::analyze_document_json(),
    )]));
    let (service, signer) = create_test_service(transport);

    let output = service
        .analyze(AnalyzeReceiptRequest::new(b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    assert_eq!(output.blocks.len(), 3);
    assert_eq!(output.blocks[0].block_type.as_deref(), Some("PAGE"));
    assert_eq!(output.blocks[1].entity_types, vec!["KEY".to_string()]);
    assert_eq!(output.analyze_document_model_version.as_deref(), Some("1.0"));
    assert_eq!(output.document_metadata.as_ref().and_then(|m| m.pages), Some(1));

    assert_eq!(signer.sign_count(), 1);
    let signed = signer.last_sign_request().unwrap();
    assert!(signed.body.is_some());
}

#[tokio::test]
async fn test_analyze_always_requests_forms_only() {
    let transport = Arc::new(MockTransport::new().with_default(MockResponse::json(
        TestFixtures::analyze_document_json(),
    )));
    let (service, _) = create_test_service(transport.clone());

    for document in [vec![1u8], vec![2u8; 1024]] {
        service.analyze(AnalyzeReceiptRequest::new(document)).await.unwrap();
    }

    for recorded in transport.requests() {
        let body: serde_json::Value =
            serde_json::from_slice(recorded.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["FeatureTypes"], serde_json::json!(["FORMS"]));
    }
}

#[tokio::test]
async fn test_analyze_document_too_large() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        400,
        TestFixtures::json_error("DocumentTooLargeException", "Document size exceeds limit"),
    )]));
    let (service, _) = create_test_service(transport);

    let err = service
        .analyze(AnalyzeReceiptRequest::new(vec![0u8; 16]))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Permanent);
    assert_eq!(err.error_code(), Some("DocumentTooLargeException"));
}

#[tokio::test]
async fn test_analyze_throttled() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        400,
        TestFixtures::json_error("ProvisionedThroughputExceededException", "Slow down"),
    )]));
    let (service, _) = create_test_service(transport);

    let err = service
        .analyze(AnalyzeReceiptRequest::new(vec![0u8; 16]))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_analyze_empty_document_rejected_locally() {
    let transport = Arc::new(MockTransport::new());
    let (service, signer) = create_test_service(transport.clone());

    let err = service
        .analyze(AnalyzeReceiptRequest::new(Vec::<u8>::new()))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Permanent);
    assert_eq!(transport.request_count(), 0);
    assert_eq!(signer.sign_count(), 0);
}
