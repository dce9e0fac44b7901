//! Expense records in DynamoDB.

use super::dispatch;
use crate::config::ExpenseConfig;
use crate::error::{AwsError, RequestError};
use crate::protocol::json::{self, JsonVersion};
use crate::protocol::Protocol;
use crate::signing::AwsSigner;
use crate::transport::HttpTransport;
use crate::types::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

const TARGET: &str = "DynamoDB_20120810.PutItem";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutItemInput<'a> {
    table_name: &'a str,
    item: BTreeMap<String, AttributeValue>,
}

/// Service for writing expense records.
pub struct ExpensesService {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl ExpensesService {
    /// Create a new expenses service.
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

    /// Write one expense record, replacing any item with the same key.
    #[instrument(skip(self, request), fields(table = %self.config.expense_table))]
    pub async fn add(&self, request: PutExpenseRequest) -> Result<PutExpenseOutput, AwsError> {
        request.validate()?;

        let input = PutItemInput {
            table_name: &self.config.expense_table,
            item: request.to_item(),
        };
        let body = serde_json::to_vec(&input).map_err(|e| {
            AwsError::Request(RequestError::validation(format!(
                "Failed to serialize expense record: {}",
                e
            )))
        })?;

        let url = self.config.resolve_endpoint(Service::DynamoDb, None)?;

        debug!(body_size = body.len(), "Putting expense record");

        let response = dispatch(
            self.transport.as_ref(),
            Some(self.signer.as_ref()),
            Protocol::AwsJson(JsonVersion::V1_0),
            "POST",
            &url,
            json::request_headers(JsonVersion::V1_0, TARGET),
            body.into(),
        )
        .await?;

        let mut output: PutExpenseOutput = json::parse_response(&response.body)?;
        output.request_id = response.request_id().map(String::from);

        debug!("Expense record stored");
        Ok(output)
    }
}

impl std::fmt::Debug for ExpensesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpensesService")
            .field("table", &self.config.expense_table)
            .finish_non_exhaustive()
    }
}
