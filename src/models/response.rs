//! The normalized response envelope returned by every trading call.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Platform-standard envelope for broker responses.
///
/// Serializes to `{"status":"success","data":...}` or
/// `{"status":"error","message":"...","code":"..."}` regardless of the
/// shape the broker used.
///
/// # Example
///
/// ```
/// use investright_rs::models::NormalizedResponse;
///
/// let ok: NormalizedResponse<u32> = NormalizedResponse::success(7);
/// assert_eq!(
///     serde_json::to_value(&ok).unwrap(),
///     serde_json::json!({ "status": "success", "data": 7 })
/// );
///
/// let err: NormalizedResponse<u32> = NormalizedResponse::error("E1", "rejected");
/// assert_eq!(err.code(), Some("E1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NormalizedResponse<T> {
    /// The broker accepted the request
    Success {
        /// Operation-specific payload
        data: T,
    },
    /// The broker (or the token endpoint) rejected the request
    Error {
        /// Human-readable description
        message: String,
        /// Broker error code, passed through verbatim
        code: String,
    },
}

impl<T> NormalizedResponse<T> {
    /// Wrap a successful payload.
    pub fn success(data: T) -> Self {
        NormalizedResponse::Success { data }
    }

    /// Build an error envelope.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        NormalizedResponse::Error {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Fold an operation result into the envelope.
    ///
    /// Broker and authentication rejections become
    /// [`NormalizedResponse::Error`]; every other error (invalid input,
    /// configuration, transport, rate limiting) is returned unchanged so
    /// the caller can handle it.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(data) => Ok(Self::success(data)),
            Err(err) => match err.envelope_parts() {
                Some((code, message)) => {
                    tracing::warn!(code, message, "broker rejected request");
                    Ok(Self::error(code, message))
                }
                None => Err(err),
            },
        }
    }

    /// Returns `true` for a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedResponse::Success { .. })
    }

    /// Returns `true` for an error envelope.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Borrow the payload of a success envelope.
    pub fn data(&self) -> Option<&T> {
        match self {
            NormalizedResponse::Success { data } => Some(data),
            NormalizedResponse::Error { .. } => None,
        }
    }

    /// Take the payload of a success envelope.
    pub fn into_data(self) -> Option<T> {
        match self {
            NormalizedResponse::Success { data } => Some(data),
            NormalizedResponse::Error { .. } => None,
        }
    }

    /// The broker error code of an error envelope.
    pub fn code(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Error { code, .. } => Some(code),
            NormalizedResponse::Success { .. } => None,
        }
    }

    /// The message of an error envelope.
    pub fn message(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Error { message, .. } => Some(message),
            NormalizedResponse::Success { .. } => None,
        }
    }

    /// Transform the payload of a success envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NormalizedResponse<U> {
        match self {
            NormalizedResponse::Success { data } => NormalizedResponse::Success { data: f(data) },
            NormalizedResponse::Error { message, code } => {
                NormalizedResponse::Error { message, code }
            }
        }
    }
}
