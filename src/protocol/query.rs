//! AWS Query protocol: form-encoded `POST /` bodies with XML responses.

use std::collections::HashMap;

/// Content type for query protocol bodies.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Build a form-encoded body for `action`.
///
/// Parameter values are encoded as given, never trimmed or truncated.
pub fn build_body(action: &str, version: &str, params: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("Action", action);
    serializer.append_pair("Version", version);
    for (name, value) in params {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Headers for a query protocol request.
pub fn request_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), CONTENT_TYPE.to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_build_body_order_and_encoding() {
        let body = build_body(
            "Publish",
            "2010-03-31",
            &[
                ("TopicArn", "arn:aws:sns:us-east-1:123456789012:budget"),
                ("Message", "Over budget: 100% & rising"),
            ],
        );

        assert!(body.starts_with("Action=Publish&Version=2010-03-31&TopicArn=arn%3Aaws%3Asns"));
        assert_eq!(
            decode(&body),
            vec![
                ("Action".to_string(), "Publish".to_string()),
                ("Version".to_string(), "2010-03-31".to_string()),
                (
                    "TopicArn".to_string(),
                    "arn:aws:sns:us-east-1:123456789012:budget".to_string()
                ),
                ("Message".to_string(), "Over budget: 100% & rising".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_body_keeps_whitespace_and_unicode() {
        let message = "  line one\nline two  €  ";
        let body = build_body("Publish", "2010-03-31", &[("Message", message)]);
        assert_eq!(decode(&body)[2].1, message);
    }
}
