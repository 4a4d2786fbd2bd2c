//! Error types for the Investright API client.
//!
//! Errors fall into two groups. Configuration, input and transport
//! failures are returned to the caller as [`Error`]. Broker-side rejections
//! ([`Error::Broker`] and [`Error::Authentication`]) are folded into a
//! [`NormalizedResponse`](crate::models::NormalizedResponse) by the services
//! so that an ordinary rejection never surfaces as an `Err`.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Investright operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Investright operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The broker rejected a request or flagged an error in its response
    #[error("Broker error: status={status}, code={code}, message={message}")]
    Broker {
        /// HTTP status code
        status: u16,
        /// Broker error code, passed through verbatim
        code: String,
        /// Human-readable error message
        message: String,
    },

    /// Token exchange, refresh or authorization failed
    #[error("Authentication failed: status={status}, code={code}, message={message}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Broker error code
        code: String,
        /// Human-readable error message
        message: String,
    },

    /// Rate limited by the broker (HTTP 429)
    #[error("Rate limited; retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Number of seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Invalid input provided to an operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// caller could retry the operation.
    ///
    /// # Example
    ///
    /// ```
    /// use investright_rs::Error;
    ///
    /// let err = Error::RateLimited { retry_after_secs: 5 };
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } => true,
            Error::Broker { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Broker { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Suggested delay before retrying, when the broker supplied one.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Error::RateLimited { retry_after_secs } => {
                Some(std::time::Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }

    /// The `(code, message)` pair for errors that belong in the error
    /// envelope, or `None` for errors the caller has to handle itself.
    pub(crate) fn envelope_parts(&self) -> Option<(&str, &str)> {
        match self {
            Error::Broker { code, message, .. } | Error::Authentication { code, message, .. } => {
                Some((code, message))
            }
            _ => None,
        }
    }

    /// Create a broker error from a response body.
    pub(crate) fn from_broker_response(status: u16, body: &Value) -> Self {
        let (code, message) = error_fields(status, body, "Unknown broker error");
        Error::Broker {
            status,
            code,
            message,
        }
    }

    /// Create an authentication error from a token endpoint response body.
    pub(crate) fn from_auth_response(status: u16, body: &Value) -> Self {
        let (code, message) = error_fields(status, body, "Token exchange failed");
        Error::Authentication {
            status,
            code,
            message,
        }
    }
}

/// Returns `true` if a 2xx body still reports an error.
///
/// An empty `error_code` does not count.
pub(crate) fn is_error_body(body: &Value) -> bool {
    body.get("error_code")
        .and_then(scalar_to_string)
        .is_some_and(|c| !c.is_empty())
        || body.get("status").and_then(Value::as_str) == Some("error")
}

/// Extract the error code and message from a broker body.
///
/// The code is taken from `error_code`, then `code`, then the OAuth `error`
/// field, and falls back to the HTTP status so it is never empty.
fn error_fields(status: u16, body: &Value, default_message: &str) -> (String, String) {
    let code = ["error_code", "code", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(scalar_to_string))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| status.to_string());

    let message = ["message", "error_description", "detail"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .unwrap_or(default_message)
        .to_string();

    (code, message)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_retryable() {
        assert!(Error::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
        assert!(Error::from_broker_response(503, &json!({})).is_retryable());
        assert!(!Error::from_broker_response(400, &json!({})).is_retryable());
    }

    #[test]
    fn test_error_auth() {
        assert!(Error::from_auth_response(401, &json!({})).is_auth_error());
        assert!(!Error::Config("missing".into()).is_auth_error());
    }

    #[test]
    fn test_from_broker_response() {
        let body = json!({ "error_code": "E1", "message": "m" });
        match Error::from_broker_response(400, &body) {
            Error::Broker {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "E1");
                assert_eq!(message, "m");
            }
            other => panic!("Expected Broker error, got {other:?}"),
        }
    }

    #[test]
    fn test_code_falls_back_to_status() {
        let err = Error::from_auth_response(401, &json!({}));
        assert_eq!(err.envelope_parts(), Some(("401", "Token exchange failed")));
    }

    #[test]
    fn test_oauth_error_fields() {
        let body = json!({
            "error": "invalid_grant",
            "error_description": "Authorization code expired"
        });
        let err = Error::from_auth_response(400, &body);
        assert_eq!(
            err.envelope_parts(),
            Some(("invalid_grant", "Authorization code expired"))
        );
    }

    #[test]
    fn test_numeric_code_kept_verbatim() {
        let err = Error::from_broker_response(422, &json!({ "code": 1042, "message": "x" }));
        assert_eq!(err.envelope_parts(), Some(("1042", "x")));
    }

    #[test]
    fn test_is_error_body() {
        assert!(is_error_body(&json!({ "status": "error" })));
        assert!(is_error_body(&json!({ "error_code": "E9" })));
        assert!(!is_error_body(&json!({ "status": "success", "order_id": "1" })));
        assert!(!is_error_body(&json!({ "error_code": null })));
        assert!(is_error_body(&json!({ "error_code": 1042 })));
        assert!(!is_error_body(&json!({
            "order_id": "42",
            "status": "success",
            "error_code": ""
        })));
    }

    #[test]
    fn test_transport_errors_stay_out_of_envelope() {
        assert!(Error::RateLimited { retry_after_secs: 1 }
            .envelope_parts()
            .is_none());
        assert!(Error::InvalidInput("x".into()).envelope_parts().is_none());
    }
}
