//! Budget alerts over SNS.

use super::dispatch;
use crate::config::ExpenseConfig;
use crate::error::AwsError;
use crate::protocol::query;
use crate::protocol::Protocol;
use crate::signing::AwsSigner;
use crate::transport::HttpTransport;
use crate::types::*;
use crate::xml;
use std::sync::Arc;
use tracing::{debug, instrument};

const API_VERSION: &str = "2010-03-31";

/// Service for publishing budget alerts.
pub struct AlertsService {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl AlertsService {
    /// Create a new alerts service.
    pub fn new(
        config: Arc<ExpenseConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn AwsSigner>,
    ) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    /// Publish `message` to `topic_arn` verbatim.
    #[instrument(
        skip(self, request),
        fields(topic_arn = %request.topic_arn, message_len = request.message.len())
    )]
    pub async fn publish(&self, request: PublishAlertRequest) -> Result<PublishAlertOutput, AwsError> {
        request.validate()?;

        let body = query::build_body(
            "Publish",
            API_VERSION,
            &[
                ("TopicArn", request.topic_arn.as_str()),
                ("Message", request.message.as_str()),
            ],
        );

        let url = self.config.resolve_endpoint(Service::Sns, None)?;

        debug!("Publishing alert");

        let response = dispatch(
            self.transport.as_ref(),
            Some(self.signer.as_ref()),
            Protocol::AwsQuery,
            "POST",
            &url,
            query::request_headers(),
            body.into(),
        )
        .await?;

        let mut output = xml::parse_publish_response(&String::from_utf8_lossy(&response.body))?;
        if output.request_id.is_none() {
            output.request_id = response.request_id().map(String::from);
        }

        debug!(message_id = %output.message_id, "Alert published");
        Ok(output)
    }
}

impl std::fmt::Debug for AlertsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertsService").finish_non_exhaustive()
    }
}
