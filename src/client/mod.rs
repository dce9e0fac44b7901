//! Expense client implementation.
//!
//! This module provides the top-level client and its builder. The client owns
//! the configuration, one shared HTTP transport and one signer per signed
//! service; the five services are created on first access.

use crate::config::ExpenseConfig;
use crate::error::AwsError;
use crate::services::{
    AlertsService, AuthService, DocumentsService, ExpensesService, ReceiptsService,
};
use crate::signing::{AwsSigner, AwsSignerV4};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::Service;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Expense client trait.
pub trait ExpenseClient: Send + Sync {
    /// Get the receipt upload service.
    fn receipts(&self) -> &ReceiptsService;

    /// Get the sign-in service.
    fn auth(&self) -> &AuthService;

    /// Get the expense record service.
    fn expenses(&self) -> &ExpensesService;

    /// Get the budget alert service.
    fn alerts(&self) -> &AlertsService;

    /// Get the receipt analysis service.
    fn documents(&self) -> &DocumentsService;

    /// Get the client configuration.
    fn config(&self) -> &ExpenseConfig;
}

/// Expense client implementation.
pub struct ExpenseClientImpl {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
    signers: HashMap<Service, Arc<dyn AwsSigner>>,

    // Lazy-initialized services
    receipts: OnceCell<ReceiptsService>,
    auth: OnceCell<AuthService>,
    expenses: OnceCell<ExpensesService>,
    alerts: OnceCell<AlertsService>,
    documents: OnceCell<DocumentsService>,
}

impl ExpenseClientImpl {
    /// Create a new client with the given configuration and transport.
    ///
    /// Every signed service gets an [`AwsSignerV4`] bound to the configured
    /// region and credentials provider.
    pub fn new(config: ExpenseConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_signers(config, transport, HashMap::new())
    }

    fn with_signers(
        config: ExpenseConfig,
        transport: Arc<dyn HttpTransport>,
        mut signers: HashMap<Service, Arc<dyn AwsSigner>>,
    ) -> Self {
        let config = Arc::new(config);

        for service in Service::ALL {
            if service == Service::CognitoIdentityProvider {
                continue;
            }
            signers.entry(service).or_insert_with(|| {
                Arc::new(AwsSignerV4::new(
                    config.credentials_provider.clone(),
                    config.region.clone(),
                    service.signing_name(),
                ))
            });
        }

        Self {
            config,
            transport,
            signers,
            receipts: OnceCell::new(),
            auth: OnceCell::new(),
            expenses: OnceCell::new(),
            alerts: OnceCell::new(),
            documents: OnceCell::new(),
        }
    }

    fn signer(&self, service: Service) -> Arc<dyn AwsSigner> {
        match self.signers.get(&service) {
            Some(signer) => signer.clone(),
            // Populated for every signed service in `with_signers`.
            None => Arc::new(AwsSignerV4::new(
                self.config.credentials_provider.clone(),
                self.config.region.clone(),
                service.signing_name(),
            )),
        }
    }

    /// Release the client and its connection pool.
    ///
    /// Services borrowed from the client cannot outlive this call.
    pub fn shutdown(self) {
        debug!(region = %self.config.region, "Shutting down expense client");
        drop(self);
    }
}

impl ExpenseClient for ExpenseClientImpl {
    fn receipts(&self) -> &ReceiptsService {
        self.receipts.get_or_init(|| {
            ReceiptsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(Service::S3),
            )
        })
    }

    fn auth(&self) -> &AuthService {
        self.auth
            .get_or_init(|| AuthService::new(self.config.clone(), self.transport.clone()))
    }

    fn expenses(&self) -> &ExpensesService {
        self.expenses.get_or_init(|| {
            ExpensesService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(Service::DynamoDb),
            )
        })
    }

    fn alerts(&self) -> &AlertsService {
        self.alerts.get_or_init(|| {
            AlertsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(Service::Sns),
            )
        })
    }

    fn documents(&self) -> &DocumentsService {
        self.documents.get_or_init(|| {
            DocumentsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer(Service::Textract),
            )
        })
    }

    fn config(&self) -> &ExpenseConfig {
        &self.config
    }
}

impl std::fmt::Debug for ExpenseClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the expense client.
pub struct ExpenseClientBuilder {
    config: Option<ExpenseConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    signers: HashMap<Service, Arc<dyn AwsSigner>>,
}

impl ExpenseClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
            signers: HashMap::new(),
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: ExpenseConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom signer for one service.
    ///
    /// Ignored for Cognito, whose `InitiateAuth` call is never signed.
    pub fn signer(mut self, service: Service, signer: Arc<dyn AwsSigner>) -> Self {
        self.signers.insert(service, signer);
        self
    }

    /// Build the expense client.
    ///
    /// Fails when neither a configuration nor `from_env` was given, or when
    /// the configuration does not validate.
    pub fn build(self) -> Result<ExpenseClientImpl, AwsError> {
        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            ExpenseConfig::builder().from_env().build()?
        } else {
            // Surfaces the first missing setting.
            ExpenseConfig::builder().build()?
        };

        let transport = if let Some(transport) = self.transport {
            transport
        } else {
            let builder = ReqwestTransport::builder()
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.read_timeout)
                .pool_max_idle_per_host(config.max_connections as usize)
                .pool_idle_timeout(Some(config.idle_timeout))
                .verify_ssl(config.verify_ssl);

            Arc::new(builder.build()?)
        };

        let mut signers = self.signers;
        signers.remove(&Service::CognitoIdentityProvider);

        Ok(ExpenseClientImpl::with_signers(config, transport, signers))
    }
}

impl Default for ExpenseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
