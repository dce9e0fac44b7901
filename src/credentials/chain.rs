//! Ordered credentials lookup with caching.

use super::{
    AwsCredentials, CredentialsProvider, EnvCredentialsProvider, ProfileCredentialsProvider,
};
use crate::error::{AwsError, CredentialsError};
use async_trait::async_trait;
use chrono::Duration;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default window before expiry in which cached credentials are replaced.
const DEFAULT_REFRESH_WINDOW_SECS: i64 = 300;

/// Tries each provider in order and caches the first success.
///
/// The default chain reads the environment, then `~/.aws/credentials`.
/// Cached credentials are reused until they come within the refresh window
/// of their expiry; long-term keys are cached indefinitely.
pub struct ChainCredentialsProvider {
    providers: Vec<Arc<dyn CredentialsProvider>>,
    cache: RwLock<Option<(AwsCredentials, &'static str)>>,
    refresh_window: Duration,
}

impl ChainCredentialsProvider {
    /// Environment, then profile file.
    pub fn new() -> Self {
        Self::with_providers(vec![
            Arc::new(EnvCredentialsProvider::new()),
            Arc::new(ProfileCredentialsProvider::new()),
        ])
    }

    /// A chain over the given providers, tried in order.
    pub fn with_providers(providers: Vec<Arc<dyn CredentialsProvider>>) -> Self {
        Self {
            providers,
            cache: RwLock::new(None),
            refresh_window: Duration::seconds(DEFAULT_REFRESH_WINDOW_SECS),
        }
    }

    /// Replace cached credentials this many seconds before they expire.
    pub fn with_refresh_buffer(mut self, seconds: i64) -> Self {
        self.refresh_window = Duration::seconds(seconds);
        self
    }

    /// Try `provider` before the existing ones.
    pub fn prepend_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    fn cached(&self) -> Option<AwsCredentials> {
        let cache = self.cache.read();
        let (credentials, source) = cache.as_ref()?;
        if credentials.expires_within(self.refresh_window) {
            return None;
        }
        trace!(provider = *source, "Using cached credentials");
        Some(credentials.clone())
    }

    async fn resolve(&self) -> Result<AwsCredentials, AwsError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.get_credentials().await {
                Ok(credentials) => {
                    debug!(provider = provider.name(), "Credentials resolved");
                    *self.cache.write() = Some((credentials.clone(), provider.name()));
                    return Ok(credentials);
                }
                Err(e) => {
                    trace!(provider = provider.name(), error = %e, "Provider had no credentials");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(AwsError::Credentials(CredentialsError::NotFound)))
    }
}

impl Default for ChainCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ChainCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, AwsError> {
        match self.cached() {
            Some(credentials) => Ok(credentials),
            None => self.resolve().await,
        }
    }

    async fn refresh_credentials(&self) -> Result<AwsCredentials, AwsError> {
        self.cache.write().take();
        self.resolve().await
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

impl std::fmt::Debug for ChainCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ChainCredentialsProvider")
            .field("providers", &names)
            .field("refresh_window_secs", &self.refresh_window.num_seconds())
            .finish()
    }
}
