//! Error type for access API calls.

use std::fmt;

use serde_json::Value;

/// Categories of access API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Backend base URL or anon key missing at call time
    Config,
    /// Required input rejected before any network I/O
    Validation,
    /// Non-success HTTP status from the backend
    Status,
    /// Network failure (connect, timeout, body read)
    Transport,
    /// Response body was non-empty but not valid JSON
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Config => write!(f, "config"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from an access API call.
///
/// Backend errors carry the HTTP status and the parsed response payload so
/// callers can present or branch on them; nothing in this crate catches or
/// reinterprets an error once raised.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status code, set for `Status` errors
    pub status: Option<u16>,
    /// Parsed response payload, set for `Status` errors with a JSON body
    pub payload: Option<Value>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    /// Creates a configuration error (raised before any I/O).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Config, message)
    }

    /// Creates a validation error (raised before any I/O).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Builds the error for a non-success HTTP response.
    ///
    /// Message priority: the payload's `message` field, then its `error`
    /// field, then a synthesized `API error <status>: <raw body>` line.
    /// Empty string fields count as absent.
    pub fn status(status: u16, payload: Option<Value>, raw_body: &str) -> Self {
        let from_payload = payload.as_ref().and_then(|p| {
            p.get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .or_else(|| {
                    p.get("error")
                        .and_then(Value::as_str)
                        .filter(|m| !m.is_empty())
                })
                .map(str::to_string)
        });

        let message =
            from_payload.unwrap_or_else(|| format!("API error {status}: {raw_body}"));

        Self {
            kind: ApiErrorKind::Status,
            message,
            status: Some(status),
            payload,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for access API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// The payload's `message` field wins.
    #[test]
    fn test_status_message_field_wins() {
        let err = ApiError::status(
            400,
            Some(json!({"message": "bad role", "error": "ignored"})),
            r#"{"message":"bad role","error":"ignored"}"#,
        );

        assert_eq!(err.message, "bad role");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.kind, ApiErrorKind::Status);
    }

    /// The `error` field is the fallback when `message` is absent.
    #[test]
    fn test_status_error_field_fallback() {
        let err = ApiError::status(500, Some(json!({"error": "boom"})), r#"{"error":"boom"}"#);
        assert_eq!(err.message, "boom");
    }

    /// An empty `message` string falls through to `error`.
    #[test]
    fn test_status_empty_message_falls_through() {
        let err = ApiError::status(
            400,
            Some(json!({"message": "", "error": "real cause"})),
            "",
        );
        assert_eq!(err.message, "real cause");
    }

    /// Neither field present: the message is synthesized from status + body.
    #[test]
    fn test_status_synthesized_message() {
        let err = ApiError::status(500, Some(json!({})), "{}");
        assert_eq!(err.message, "API error 500: {}");
        assert!(err.payload.is_some());
    }

    /// No payload at all (empty body): synthesized message, payload None.
    #[test]
    fn test_status_no_payload() {
        let err = ApiError::status(502, None, "");
        assert_eq!(err.message, "API error 502: ");
        assert_eq!(err.payload, None);
    }
}
