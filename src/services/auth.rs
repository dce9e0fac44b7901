//! User sign-in through Cognito user pools.

use super::dispatch;
use crate::config::ExpenseConfig;
use crate::error::AwsError;
use crate::protocol::json::{self, JsonVersion};
use crate::protocol::Protocol;
use crate::signing::hmac_sha256;
use crate::transport::HttpTransport;
use crate::types::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

const TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthInput<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: BTreeMap<&'static str, String>,
}

/// Compute the `SECRET_HASH` for an app client with a secret.
///
/// `Base64(HMAC-SHA256(client_secret, username + client_id))`
pub fn secret_hash(client_secret: &str, username: &str, client_id: &str) -> String {
    let message = format!("{}{}", username, client_id);
    STANDARD.encode(hmac_sha256(client_secret.as_bytes(), message.as_bytes()))
}

/// Service for signing users in.
///
/// `InitiateAuth` is an unauthenticated API, so requests are not signed.
pub struct AuthService {
    config: Arc<ExpenseConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(config: Arc<ExpenseConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Start a `USER_PASSWORD_AUTH` flow and return Cognito's result as-is.
    #[instrument(skip(self, request), fields(client_id = %self.config.cognito_client_id))]
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SignInOutput, AwsError> {
        request.validate()?;

        let client_id = self.config.cognito_client_id.as_str();

        let mut auth_parameters = BTreeMap::new();
        auth_parameters.insert("USERNAME", request.username.clone());
        auth_parameters.insert("PASSWORD", request.password.expose_secret().clone());
        if let Some(secret) = &self.config.cognito_client_secret {
            auth_parameters.insert(
                "SECRET_HASH",
                secret_hash(secret.expose_secret(), &request.username, client_id),
            );
        }

        let input = InitiateAuthInput {
            auth_flow: SignInRequest::AUTH_FLOW,
            client_id,
            auth_parameters,
        };
        let body = serde_json::to_vec(&input).map_err(|e| {
            AwsError::Request(crate::error::RequestError::validation(format!(
                "Failed to serialize sign-in request: {}",
                e
            )))
        })?;

        let url = self
            .config
            .resolve_endpoint(Service::CognitoIdentityProvider, None)?;

        debug!("Initiating auth");

        let response = dispatch(
            self.transport.as_ref(),
            None,
            Protocol::AwsJson(JsonVersion::V1_1),
            "POST",
            &url,
            json::request_headers(JsonVersion::V1_1, TARGET),
            body.into(),
        )
        .await?;

        let mut output: SignInOutput = json::parse_response(&response.body)?;
        output.request_id = response.request_id().map(String::from);

        debug!(
            authenticated = output.authentication_result.is_some(),
            challenge = ?output.challenge_name,
            "Auth initiated"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("client_id", &self.config.cognito_client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AccessError, ErrorCategory};
    use crate::mocks::{MockResponse, MockTransport, TestFixtures};

    fn body_json(transport: &MockTransport) -> serde_json::Value {
        let request = transport.last_request().unwrap();
        serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_secret_hash_matches_manual_hmac() {
        let expected = STANDARD.encode(hmac_sha256(b"client-secret", b"alicetest-client-id"));
        assert_eq!(secret_hash("client-secret", "alice", "test-client-id"), expected);
        assert_eq!(expected.len(), 44);
    }

    #[tokio::test]
    async fn test_sign_in_request_shape() {
        let transport = Arc::new(
            MockTransport::new().with_default(MockResponse::json(TestFixtures::auth_result_json())),
        );
        let service = AuthService::new(TestFixtures::config(), transport.clone());

        let output = service
            .sign_in(SignInRequest::new("alice", "p@ss w0rd"))
            .await
            .unwrap();
        assert!(output.authentication_result.is_some());

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://cognito-idp.us-east-1.amazonaws.com/");
        assert_eq!(request.get_header("x-amz-target"), Some(TARGET));
        assert_eq!(
            request.get_header("content-type"),
            Some("application/x-amz-json-1.1")
        );
        assert!(request.get_header("authorization").is_none());

        assert_eq!(
            body_json(&transport),
            serde_json::json!({
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": "test-client-id",
                "AuthParameters": { "USERNAME": "alice", "PASSWORD": "p@ss w0rd" }
            })
        );
    }

    #[tokio::test]
    async fn test_sign_in_adds_secret_hash() {
        let config = Arc::new(
            TestFixtures::config_builder()
                .cognito_client_secret("client-secret")
                .build()
                .unwrap(),
        );
        let transport = Arc::new(
            MockTransport::new().with_default(MockResponse::json(TestFixtures::auth_result_json())),
        );
        let service = AuthService::new(config, transport.clone());

        service.sign_in(SignInRequest::new("alice", "pw")).await.unwrap();

        assert_eq!(
            body_json(&transport)["AuthParameters"]["SECRET_HASH"],
            secret_hash("client-secret", "alice", "test-client-id")
        );
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
            400,
            TestFixtures::json_error("NotAuthorizedException", "Incorrect username or password."),
        )]));
        let service = AuthService::new(TestFixtures::config(), transport);

        let err = service
            .sign_in(SignInRequest::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, AwsError::Access(AccessError::NotAuthorized { .. })));
        assert_eq!(err.category(), ErrorCategory::Authorization);
    }
}
