//! Canonical request construction.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Unreserved characters plus the path separator.
const UNRESERVED_AND_SLASH: &AsciiSet = &UNRESERVED.remove(b'/');

/// Percent-encode a path, leaving `/` intact.
pub fn uri_encode_path(path: &str) -> String {
    utf8_percent_encode(path, UNRESERVED_AND_SLASH).to_string()
}

/// Percent-encode a single query component or path segment.
pub fn uri_encode_query(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Canonical URI. The URL parser hands the path over already escaped, so
/// each segment is unescaped first and then escaped exactly once.
pub fn build_canonical_uri(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let mut uri = String::with_capacity(path.len() + 1);
    for segment in trimmed.split('/') {
        uri.push('/');
        uri.push_str(&uri_encode_query(
            &percent_decode_str(segment).decode_utf8_lossy(),
        ));
    }
    uri
}

/// Canonical query string, pairs ordered by name then value.
pub fn build_canonical_query_string(query_string: &str) -> String {
    let mut pairs: Vec<(String, String)> = query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (uri_encode_query(name), uri_encode_query(value))
        })
        .collect();
    pairs.sort_unstable();

    pairs
        .into_iter()
        .map(|(name, value)| name + "=" + &value)
        .collect::<Vec<_>>()
        .join("&")
}

/// Signable headers grouped by lowercase name, values whitespace-collapsed.
fn signable_headers(headers: &[(String, String)]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        if super::should_sign_header(name) {
            let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            grouped
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(collapsed);
        }
    }
    grouped
}

/// One `name:value` line per signed header; repeated headers are joined
/// with commas.
pub fn build_canonical_headers(headers: &[(String, String)]) -> String {
    signable_headers(headers)
        .into_iter()
        .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
        .collect()
}

/// `;`-separated list of signed header names.
pub fn build_signed_headers(headers: &[(String, String)]) -> String {
    signable_headers(headers)
        .into_keys()
        .collect::<Vec<_>>()
        .join(";")
}

/// The six canonical request lines joined with `\n`.
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> String {
    [
        method.to_ascii_uppercase(),
        build_canonical_uri(uri),
        build_canonical_query_string(query_string),
        build_canonical_headers(headers),
        build_signed_headers(headers),
        payload_hash.to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_sets() {
        assert_eq!(uri_encode_path("/u1/my receipt.png"), "/u1/my%20receipt.png");
        assert_eq!(uri_encode_query("a/b=c"), "a%2Fb%3Dc");
        assert_eq!(uri_encode_query("Ab-_.~"), "Ab-_.~");
    }

    #[test]
    fn test_canonical_uri() {
        assert_eq!(build_canonical_uri(""), "/");
        assert_eq!(build_canonical_uri("/"), "/");
        assert_eq!(build_canonical_uri("u1/r.png"), "/u1/r.png");
        assert_eq!(
            build_canonical_uri("/expense-receipts/u1/r.png"),
            "/expense-receipts/u1/r.png"
        );
    }

    #[test]
    fn test_canonical_uri_escapes_once() {
        assert_eq!(
            build_canonical_uri("/u1/my%20receipt.png"),
            "/u1/my%20receipt.png"
        );
        assert_eq!(build_canonical_uri("/u1/a+b.png"), "/u1/a%2Bb.png");
    }

    #[test]
    fn test_canonical_query_string() {
        assert_eq!(build_canonical_query_string(""), "");
        assert_eq!(build_canonical_query_string("z=9&a=1"), "a=1&z=9");
        assert_eq!(build_canonical_query_string("k=b&k=a"), "k=a&k=b");
        assert_eq!(build_canonical_query_string("versioning"), "versioning=");
    }

    #[test]
    fn test_headers_filtered_and_normalized() {
        let headers = vec![
            ("Host".to_string(), "  dynamodb.us-east-1.amazonaws.com ".to_string()),
            ("X-Amz-Target".to_string(), "DynamoDB_20120810.PutItem".to_string()),
            ("User-Agent".to_string(), "ignored".to_string()),
            ("X-Amz-Meta-Note".to_string(), "lunch   with  team".to_string()),
        ];

        assert_eq!(
            build_canonical_headers(&headers),
            "host:dynamodb.us-east-1.amazonaws.com\n\
             x-amz-meta-note:lunch with team\n\
             x-amz-target:DynamoDB_20120810.PutItem\n"
        );
        assert_eq!(
            build_signed_headers(&headers),
            "host;x-amz-meta-note;x-amz-target"
        );
    }

    #[test]
    fn test_canonical_request_layout() {
        let headers = vec![
            ("host".to_string(), "sns.us-east-1.amazonaws.com".to_string()),
            ("x-amz-date".to_string(), "20231215T103045Z".to_string()),
        ];

        assert_eq!(
            build_canonical_request("post", "/", "", &headers, "abc"),
            "POST\n/\n\nhost:sns.us-east-1.amazonaws.com\nx-amz-date:20231215T103045Z\n\nhost;x-amz-date\nabc"
        );
    }
}
