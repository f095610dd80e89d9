//! Error types for the HTTP transport layer.

use handcash::SignError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Errors returned by [`HandCashClient`](crate::HandCashClient) operations.
///
/// Signing failures are kept in their own variant so they are never
/// mistaken for network or server errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be signed.
    #[error("error creating signed request: {0}")]
    Sign(#[from] SignError),

    /// Arguments were rejected before any request was sent.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The environment's API URL is not a valid base URL.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HandCash API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// The server's `message` field, or the raw response text.
        message: String,
    },

    /// A 2xx response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx response decoded but is missing required data.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ClientError {
    /// Builds a [`ClientError::Status`] from a failed response body.
    ///
    /// Uses the body's `message` field when it is `{"message": ...}` JSON,
    /// otherwise the body text itself.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body).map_or_else(
            |_| String::from_utf8_lossy(body).trim().to_owned(),
            |parsed| parsed.message,
        );
        Self::Status { status, message }
    }

    /// Returns the HTTP status for [`ClientError::Status`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn invalid_parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_message_field() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            br#"{"message":"Invalid signature"}"#,
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(matches!(&err, ClientError::Status { message, .. } if message == "Invalid signature"));
        assert_eq!(
            err.to_string(),
            "HandCash API returned 401 Unauthorized: Invalid signature"
        );
    }

    #[test]
    fn test_from_status_falls_back_to_text() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, b"  upstream down \n");
        assert!(matches!(&err, ClientError::Status { message, .. } if message == "upstream down"));
    }

    #[test]
    fn test_sign_errors_stay_distinct() {
        let err = ClientError::from(SignError::invalid_token("missing auth token"));
        assert!(err.status().is_none());
        assert!(matches!(err, ClientError::Sign(SignError::InvalidToken(_))));
    }
}
