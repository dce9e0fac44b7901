//! AWS Signature V4.
//!
//! Every signed service shares one implementation; only the signing name in
//! the credential scope (`s3`, `dynamodb`, `sns`, `textract`) differs.

mod canonical;
mod signer;

pub use canonical::{uri_encode_path, uri_encode_query};
pub use signer::{AwsSigner, AwsSignerV4, SignedRequest};

use crate::credentials::AwsCredentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

/// Algorithm name in the string to sign and the `Authorization` header.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

const SCOPE_TERMINATOR: &str = "aws4_request";

/// Lowercase hex SHA-256.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// HMAC-SHA256 of `data` under `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// `x-amz-date` form of a timestamp, e.g. `20150830T123600Z`.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Headers that take part in the signature. Everything else, including the
/// invocation id and user agent, may change in flight.
pub fn should_sign_header(header_name: &str) -> bool {
    let name = header_name.to_ascii_lowercase();
    name.starts_with("x-amz-")
        || matches!(
            name.as_str(),
            "host" | "content-type" | "content-md5" | "content-length"
        )
}

/// Credential scope: `{date}/{region}/{service}/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope<'a> {
    date: String,
    region: &'a str,
    service: &'a str,
}

impl<'a> CredentialScope<'a> {
    /// Scope for the day of `timestamp`.
    pub fn new(timestamp: &DateTime<Utc>, region: &'a str, service: &'a str) -> Self {
        Self {
            date: timestamp.format("%Y%m%d").to_string(),
            region,
            service,
        }
    }

    /// Signing key derived from the secret through date, region, service
    /// and the terminator, in that order.
    pub fn signing_key(&self, secret_access_key: &str) -> Vec<u8> {
        let seed = format!("AWS4{}", secret_access_key).into_bytes();
        [
            self.date.as_str(),
            self.region,
            self.service,
            SCOPE_TERMINATOR,
        ]
        .iter()
        .fold(seed, |key, part| hmac_sha256(&key, part.as_bytes()))
    }
}

impl fmt::Display for CredentialScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, SCOPE_TERMINATOR
        )
    }
}

/// Inputs to a single signature calculation.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    /// HTTP method.
    pub method: &'a str,
    /// Request path as it appears in the URL.
    pub uri: &'a str,
    /// Raw query string.
    pub query_string: &'a str,
    /// Candidate headers; unsigned ones are filtered out.
    pub headers: &'a [(String, String)],
    /// Hex SHA-256 of the payload.
    pub payload_hash: &'a str,
    /// Region.
    pub region: &'a str,
    /// Service signing name.
    pub service: &'a str,
    /// Request time; must match `x-amz-date`.
    pub timestamp: &'a DateTime<Utc>,
}

/// Compute the `Authorization` header value for `params`.
pub fn sign_request(params: &SigningParams<'_>, credentials: &AwsCredentials) -> String {
    let scope = CredentialScope::new(params.timestamp, params.region, params.service);
    let canonical_request = canonical::build_canonical_request(
        params.method,
        params.uri,
        params.query_string,
        params.headers,
        params.payload_hash,
    );

    let string_to_sign = [
        AWS_ALGORITHM.to_string(),
        format_datetime(params.timestamp),
        scope.to_string(),
        sha256_hex(canonical_request.as_bytes()),
    ]
    .join("\n");

    let signature = hex::encode(hmac_sha256(
        &scope.signing_key(credentials.secret_access_key()),
        string_to_sign.as_bytes(),
    ));

    format!(
        "{AWS_ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
        credentials.access_key_id(),
        canonical::build_signed_headers(params.headers),
    )
}
