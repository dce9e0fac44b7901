//! Receipt uploads to S3.

use super::dispatch;
use crate::config::ExpenseConfig;
use crate::error::{AwsError, RequestError};
use crate::protocol::Protocol;
use crate::signing::{uri_encode_query, AwsSigner};
use crate::transport::HttpTransport;
use crate::types::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Service for storing receipt images.
pub struct ReceiptsService {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl ReceiptsService {
    /// Create a new receipts service.
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

    /// Upload a receipt to `{owner_id}/{file_name}` in the receipt bucket.
    ///
    /// An existing object at the same key is overwritten.
    #[instrument(
        skip(self, request),
        fields(bucket = %self.config.receipt_bucket, key = %request.object_key(), size = request.content.len())
    )]
    pub async fn upload(&self, request: UploadReceiptRequest) -> Result<UploadReceiptOutput, AwsError> {
        request.validate()?;

        let bucket = &self.config.receipt_bucket;
        let key = request.object_key();
        let encoded_key = key
            .split('/')
            .map(uri_encode_query)
            .collect::<Vec<_>>()
            .join("/");

        let path = self.config.build_object_path(bucket, &encoded_key);
        let mut url = self.config.resolve_endpoint(Service::S3, Some(bucket))?;
        url.set_path(&path);
        if url.path() != path {
            return Err(RequestError::validation(format!(
                "object key '{}' cannot be addressed as a URL path",
                key
            ))
            .into());
        }

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), request.content_type.clone());
        headers.insert(
            "content-length".to_string(),
            request.content.len().to_string(),
        );
        headers.insert(
            "content-md5".to_string(),
            STANDARD.encode(Md5::digest(&request.content)),
        );

        debug!("Uploading receipt");

        let response = dispatch(
            self.transport.as_ref(),
            Some(self.signer.as_ref()),
            Protocol::RestXml,
            "PUT",
            &url,
            headers,
            request.content,
        )
        .await?;

        let output = UploadReceiptOutput {
            key,
            e_tag: response.etag().map(String::from),
            version_id: response.get_header("x-amz-version-id").map(String::from),
            request_id: response.request_id().map(String::from),
        };

        debug!(e_tag = ?output.e_tag, "Receipt uploaded");
        Ok(output)
    }
}

impl std::fmt::Debug for ReceiptsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptsService")
            .field("bucket", &self.config.receipt_bucket)
            .finish_non_exhaustive()
    }
}
