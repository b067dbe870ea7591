//! Error handling utilities for HTTP responses and error context formatting.

use super::common::TRANSACTION_ID_HEADER;
use crate::errors::WatsonError;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum characters to include from error body in context messages
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Checks if an HTTP response is successful, returning it if so or an error otherwise.
///
/// # Errors
///
/// Returns [`WatsonError::Api`] with the status code, the best available
/// message and the transaction ID on non-success status.
pub async fn check_response(response: Response) -> Result<Response, WatsonError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(read_error_with_context(response).await)
    }
}

/// Reads an error response body and turns it into [`WatsonError::Api`].
///
/// If the body cannot be read, the message describes the read failure.
pub async fn read_error_with_context(response: Response) -> WatsonError {
    let status_code = response.status().as_u16();

    // Headers first: reading the body consumes the response
    let transaction_id = response
        .headers()
        .get(TRANSACTION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error body: {}", e));

    let message = extract_error_message(&error_body)
        .unwrap_or_else(|| truncate_for_context(&error_body, ERROR_BODY_PREVIEW_LENGTH));

    tracing::debug!(
        "Watson API error: status={}, transaction_id={:?}, message={}",
        status_code,
        transaction_id,
        message
    );

    WatsonError::Api {
        status_code,
        message,
        transaction_id,
    }
}

/// Pulls a human-readable message out of a Watson error body.
///
/// Services disagree on the shape: newer ones send
/// `{"errors": [{"message": ..}]}`, older ones `{"error": ..}` (string or
/// object), `{"errorMessage": ..}`, `{"message": ..}`, `{"description": ..}`,
/// and Alchemy `{"statusInfo": ..}`. Returns `None` for non-JSON bodies.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|first| first.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    if let Some(error) = value.get("error") {
        match error {
            Value::String(s) => return Some(s.clone()),
            Value::Object(_) => {
                if let Some(message) = error.get("message").and_then(Value::as_str) {
                    return Some(message.to_string());
                }
            }
            _ => {}
        }
    }

    ["errorMessage", "message", "description", "statusInfo"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
}

/// Deserializes a response body, attaching a preview of the body to the
/// error when it does not parse.
pub fn deserialize_with_context<T: DeserializeOwned>(
    json_str: &str,
    context: &str,
) -> Result<T, WatsonError> {
    serde_json::from_str(json_str).map_err(|e| {
        WatsonError::Parse(format!(
            "{} ({})",
            format_json_parse_error(json_str, e),
            context
        ))
    })
}

/// Formats JSON parsing context by including a preview of the raw JSON.
pub fn format_json_parse_error(json_str: &str, error: serde_json::Error) -> String {
    let preview = truncate_for_context(json_str, ERROR_BODY_PREVIEW_LENGTH);
    format!("JSON parse error: {} | Context: {}", error, preview)
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Uses character-boundary-aware slicing to prevent panics on multi-byte UTF-8 characters.
pub(crate) fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}
