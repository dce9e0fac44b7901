//! Credentials from process environment variables.

use super::{AwsCredentials, CredentialsProvider};
use crate::error::{AwsError, CredentialsError};
use async_trait::async_trait;
use std::env;

/// Access key ID variable.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Secret access key variable.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Session token variable.
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Reads a key pair, and optionally a session token, from the environment.
///
/// A missing key variable means "not configured here" and yields
/// [`CredentialsError::NotFound`] so a chain moves on; a key variable that
/// is set but empty is [`CredentialsError::Invalid`]. An empty token is
/// treated as absent.
#[derive(Debug, Clone)]
pub struct EnvCredentialsProvider {
    vars: [String; 3],
}

impl EnvCredentialsProvider {
    /// The standard `AWS_*` variables.
    pub fn new() -> Self {
        Self::with_vars(
            AWS_ACCESS_KEY_ID,
            AWS_SECRET_ACCESS_KEY,
            Some(AWS_SESSION_TOKEN.to_string()),
        )
    }

    /// Custom variable names. Without a token variable no token is read.
    pub fn with_vars(
        access_key_var: impl Into<String>,
        secret_key_var: impl Into<String>,
        session_token_var: Option<String>,
    ) -> Self {
        Self {
            vars: [
                access_key_var.into(),
                secret_key_var.into(),
                session_token_var.unwrap_or_default(),
            ],
        }
    }

    fn required(var: &str) -> Result<String, AwsError> {
        match env::var(var) {
            Ok(value) if value.is_empty() => Err(AwsError::Credentials(CredentialsError::Invalid {
                message: format!("{} is set but empty", var),
            })),
            Ok(value) => Ok(value),
            Err(_) => Err(AwsError::Credentials(CredentialsError::NotFound)),
        }
    }
}

impl Default for EnvCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, AwsError> {
        let [access_key_var, secret_key_var, token_var] = &self.vars;
        let credentials =
            AwsCredentials::new(Self::required(access_key_var)?, Self::required(secret_key_var)?);

        let token = Some(token_var.as_str())
            .filter(|var| !var.is_empty())
            .and_then(|var| env::var(var).ok())
            .filter(|token| !token.is_empty());

        Ok(match token {
            Some(token) => credentials.with_token(token),
            None => credentials,
        })
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so parallel tests never race.
    fn provider(prefix: &str) -> EnvCredentialsProvider {
        EnvCredentialsProvider::with_vars(
            format!("{}_ACCESS_KEY", prefix),
            format!("{}_SECRET_KEY", prefix),
            Some(format!("{}_SESSION_TOKEN", prefix)),
        )
    }

    #[test]
    fn test_env_provider_success() {
        env::set_var("EXPENSE_TEST_OK_ACCESS_KEY", "AKID");
        env::set_var("EXPENSE_TEST_OK_SECRET_KEY", "SECRET");

        let creds = tokio_test::block_on(provider("EXPENSE_TEST_OK").get_credentials()).unwrap();
        assert_eq!(
            (creds.access_key_id(), creds.secret_access_key()),
            ("AKID", "SECRET")
        );
        assert_eq!(creds.session_token(), None);
    }

    #[test]
    fn test_env_provider_with_session_token() {
        env::set_var("EXPENSE_TEST_TOKEN_ACCESS_KEY", "AKID");
        env::set_var("EXPENSE_TEST_TOKEN_SECRET_KEY", "SECRET");
        env::set_var("EXPENSE_TEST_TOKEN_SESSION_TOKEN", "TOKEN");

        let creds =
            tokio_test::block_on(provider("EXPENSE_TEST_TOKEN").get_credentials()).unwrap();
        assert_eq!(creds.session_token(), Some("TOKEN"));

        let without_token_var =
            EnvCredentialsProvider::with_vars("EXPENSE_TEST_TOKEN_ACCESS_KEY", "EXPENSE_TEST_TOKEN_SECRET_KEY", None);
        let creds = tokio_test::block_on(without_token_var.get_credentials()).unwrap();
        assert_eq!(creds.session_token(), None);
    }

    #[test]
    fn test_env_provider_missing_access_key() {
        env::remove_var("EXPENSE_TEST_MISSING_ACCESS_KEY");
        env::set_var("EXPENSE_TEST_MISSING_SECRET_KEY", "SECRET");

        let result = tokio_test::block_on(provider("EXPENSE_TEST_MISSING").get_credentials());
        assert!(matches!(
            result,
            Err(AwsError::Credentials(CredentialsError::NotFound))
        ));
    }

    #[test]
    fn test_env_provider_empty_secret() {
        env::set_var("EXPENSE_TEST_EMPTY_ACCESS_KEY", "AKID");
        env::set_var("EXPENSE_TEST_EMPTY_SECRET_KEY", "");

        let result = tokio_test::block_on(provider("EXPENSE_TEST_EMPTY").get_credentials());
        assert!(matches!(
            result,
            Err(AwsError::Credentials(CredentialsError::Invalid { .. }))
        ));
    }
}
