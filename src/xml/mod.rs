//! XML parsing for S3 and SNS responses.
//!
//! S3 errors arrive as `<Error><Code/><Message/><RequestId/></Error>`; SNS
//! wraps the same fields in `<ErrorResponse>`. Both go through
//! [`parse_error_response`].

use crate::error::{AwsError, AwsErrorResponse, ResponseError};
use crate::types::PublishAlertOutput;
use quick_xml::events::Event;
use quick_xml::Reader;

fn xml_error(e: impl std::fmt::Display) -> AwsError {
    AwsError::Response(ResponseError::XmlParseError {
        message: e.to_string(),
    })
}

/// Parse an S3 or SNS error response body.
pub fn parse_error_response(xml: &str, status: u16) -> Result<AwsErrorResponse, AwsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut code = String::new();
    let mut message = String::new();
    let mut request_id = None;
    let mut saw_error = false;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current_element = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if current_element == "Error" {
                    saw_error = true;
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?.to_string();
                match current_element.as_str() {
                    "Code" => code = text,
                    "Message" => message = text,
                    "RequestId" => request_id = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    if !saw_error {
        return Err(xml_error("no <Error> element in error response"));
    }

    Ok(AwsErrorResponse {
        status,
        code,
        message,
        request_id,
        retry_after: None,
    })
}

/// Parse an SNS `PublishResponse`.
pub fn parse_publish_response(xml: &str) -> Result<PublishAlertOutput, AwsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut output = PublishAlertOutput::default();
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current_element = String::from_utf8_lossy(e.name().as_ref()).to_string();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?.to_string();
                match current_element.as_str() {
                    "MessageId" => output.message_id = text,
                    "SequenceNumber" => output.sequence_number = Some(text),
                    "RequestId" => output.request_id = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    if output.message_id.is_empty() {
        return Err(AwsError::Response(ResponseError::MissingField {
            field: "MessageId".to_string(),
        }));
    }

    Ok(output)
}
