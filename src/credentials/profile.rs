//! Shared credentials file (`~/.aws/credentials`).

use super::{AwsCredentials, CredentialsProvider};
use crate::error::{AwsError, CredentialsError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Profile used when neither the caller nor `AWS_PROFILE` picks one.
pub const DEFAULT_PROFILE: &str = "default";

/// Variable selecting the profile.
pub const AWS_PROFILE: &str = "AWS_PROFILE";

/// Variable overriding the credentials file location.
pub const AWS_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Sections of an INI-style credentials file, keyed by profile name.
///
/// `[profile name]` headers are accepted as well as `[name]`. Lines starting
/// with `#` or `;` are comments; keys before the first header are ignored.
#[derive(Debug, Default)]
struct ProfileFile {
    sections: HashMap<String, HashMap<String, String>>,
}

impl ProfileFile {
    fn parse(content: &str) -> Self {
        let mut file = Self::default();
        let mut current: Option<String> = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(['#', ';']) {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let header = header.trim();
                let name = header.strip_prefix("profile ").unwrap_or(header).trim();
                file.sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
            } else if let (Some(name), Some((key, value))) = (&current, line.split_once('=')) {
                if let Some(entries) = file.sections.get_mut(name) {
                    entries.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        file
    }

    fn profile(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(name)
    }
}

/// Reads one profile from the shared credentials file on every call.
///
/// The file is `~/.aws/credentials` unless `AWS_SHARED_CREDENTIALS_FILE` or
/// [`with_credentials_file`](Self::with_credentials_file) points elsewhere.
#[derive(Debug, Clone)]
pub struct ProfileCredentialsProvider {
    profile_name: String,
    credentials_file: Option<PathBuf>,
}

impl ProfileCredentialsProvider {
    /// Profile from `AWS_PROFILE`, else `default`.
    pub fn new() -> Self {
        Self::with_profile(env::var(AWS_PROFILE).unwrap_or_else(|_| DEFAULT_PROFILE.to_string()))
    }

    /// A named profile.
    pub fn with_profile(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            credentials_file: None,
        }
    }

    /// Read `path` instead of the default location.
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    fn path(&self) -> Result<PathBuf, AwsError> {
        self.credentials_file
            .clone()
            .or_else(|| env::var_os(AWS_SHARED_CREDENTIALS_FILE).map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join("credentials")))
            .ok_or_else(|| profile_error("no home directory to look for .aws/credentials in"))
    }
}

fn profile_error(message: impl Into<String>) -> AwsError {
    AwsError::Credentials(CredentialsError::ProfileError {
        message: message.into(),
    })
}

impl Default for ProfileCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ProfileCredentialsProvider {
    async fn get_credentials(&self) -> Result<AwsCredentials, AwsError> {
        let path = self.path()?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| profile_error(format!("{}: {}", path.display(), e)))?;

        let file = ProfileFile::parse(&content);
        let profile = file.profile(&self.profile_name).ok_or_else(|| {
            profile_error(format!(
                "profile [{}] missing from {}",
                self.profile_name,
                path.display()
            ))
        })?;

        let required = |key: &str| {
            profile
                .get(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| profile_error(format!("profile [{}] has no {}", self.profile_name, key)))
        };

        let mut credentials =
            AwsCredentials::new(required("aws_access_key_id")?, required("aws_secret_access_key")?);
        if let Some(token) = profile.get("aws_session_token").filter(|t| !t.is_empty()) {
            credentials = credentials.with_token(token.as_str());
        }
        Ok(credentials)
    }

    fn name(&self) -> &'static str {
        "profile"
    }
}
