//! Receipt analysis with Textract.

use super::dispatch;
use crate::config::ExpenseConfig;
use crate::error::{AwsError, RequestError};
use crate::protocol::json::{self, JsonVersion};
use crate::protocol::Protocol;
use crate::signing::AwsSigner;
use crate::transport::HttpTransport;
use crate::types::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

const TARGET: &str = "Textract.AnalyzeDocument";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AnalyzeDocumentInput<'a> {
    document: DocumentInput,
    feature_types: &'a [&'a str],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentInput {
    bytes: String,
}

/// Service for analyzing receipt documents.
pub struct DocumentsService {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl DocumentsService {
    /// Create a new documents service.
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

    /// Run form analysis on a document and return Textract's result as-is.
    #[instrument(skip(self, request), fields(document_size = request.document.len()))]
    pub async fn analyze(&self, request: AnalyzeReceiptRequest) -> Result<AnalyzeDocumentOutput, AwsError> {
        request.validate()?;

        let input = AnalyzeDocumentInput {
            document: DocumentInput {
                bytes: STANDARD.encode(&request.document),
            },
            feature_types: &AnalyzeReceiptRequest::FEATURE_TYPES,
        };
        let body = serde_json::to_vec(&input).map_err(|e| {
            AwsError::Request(RequestError::validation(format!(
                "Failed to serialize analysis request: {}",
                e
            )))
        })?;

        let url = self.config.resolve_endpoint(Service::Textract, None)?;

        debug!(body_size = body.len(), "Analyzing document");

        let response = dispatch(
            self.transport.as_ref(),
            Some(self.signer.as_ref()),
            Protocol::AwsJson(JsonVersion::V1_1),
            "POST",
            &url,
            json::request_headers(JsonVersion::V1_1, TARGET),
            body.into(),
        )
        .await?;

        let mut output: AnalyzeDocumentOutput = json::parse_response(&response.body)?;
        output.request_id = response.request_id().map(String::from);

        debug!(blocks = output.blocks.len(), "Document analyzed");
        Ok(output)
    }
}

impl std::fmt::Debug for DocumentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentsService").finish_non_exhaustive()
    }
}
