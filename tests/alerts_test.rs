//! Integration tests for AlertsService.

use aws_expense::error::ErrorCategory;
use aws_expense::mocks::{MockResponse, MockSigner, MockTransport, TestFixtures};
use aws_expense::services::AlertsService;
use aws_expense::types::*;
use std::sync::Arc;

const TOPIC: &str = "arn:aws:sns:eu-west-1:123456789012:budget";

fn create_test_service(transport: Arc<MockTransport>) -> AlertsService {
    AlertsService::new(
        TestFixtures::config(),
        transport,
        Arc::new(MockSigner::for_service("sns")),
    )
}

fn form_value(transport: &MockTransport, name: &str) -> Option<String> {
    let recorded = transport.last_request().unwrap();
    url::form_urlencoded::parse(recorded.body_str().as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_publish_long_message_is_not_truncated() {
    let transport = Arc::new(MockTransport::new().with_default(MockResponse::ok_with_body(
        TestFixtures::publish_response_xml("m-1"),
    )));
    let service = create_test_service(transport.clone());

    let message = "Budget & limits = 100% ".repeat(500) + "ünïcode ✓";
    service
        .publish(PublishAlertRequest::new(TOPIC, message.clone()))
        .await
        .unwrap();

    assert_eq!(form_value(&transport, "Message"), Some(message));
    assert_eq!(form_value(&transport, "TopicArn").as_deref(), Some(TOPIC));
    assert_eq!(form_value(&transport, "Version").as_deref(), Some("2010-03-31"));
}

#[tokio::test]
async fn test_publish_fifo_sequence_number() {
    let body = r#"<PublishResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <PublishResult>
    <MessageId>m-2</MessageId>
    <SequenceNumber>10000000000000003000</SequenceNumber>
  </PublishResult>
  <ResponseMetadata><RequestId>r-2</RequestId></ResponseMetadata>
</PublishResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::ok_with_body(body)]));
    let service = create_test_service(transport);

    let output = service
        .publish(PublishAlertRequest::new(TOPIC, "over budget"))
        .await
        .unwrap();

    assert_eq!(output.message_id, "m-2");
    assert_eq!(output.sequence_number.as_deref(), Some("10000000000000003000"));
    assert_eq!(output.request_id.as_deref(), Some("r-2"));
}

#[tokio::test]
async fn test_publish_unknown_topic() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        404,
        TestFixtures::sns_error_xml("NotFound", "Topic does not exist"),
    )]));
    let service = create_test_service(transport);

    let err = service
        .publish(PublishAlertRequest::new(TOPIC, "over budget"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Permanent);
    assert_eq!(err.error_code(), Some("NotFound"));
}

#[tokio::test]
async fn test_publish_server_error_without_body() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(502, "")]));
    let service = create_test_service(transport);

    let err = service
        .publish(PublishAlertRequest::new(TOPIC, "over budget"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Transient);
}

#[tokio::test]
async fn test_publish_empty_topic_rejected_locally() {
    let transport = Arc::new(MockTransport::new());
    let service = create_test_service(transport.clone());

    let err = service
        .publish(PublishAlertRequest::new("", "over budget"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Permanent);
    assert_eq!(transport.request_count(), 0);
}
