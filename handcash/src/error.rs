//! Error types for HandCash request signing and configuration lookups.

use std::fmt;

/// Errors raised while building a signed request.
///
/// All variants are local and deterministic: retrying with the same input
/// produces the same error.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The auth token is not hex, has the wrong length, or is not a valid
    /// secp256k1 scalar.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    BodyEncoding(#[from] serde_json::Error),

    /// The curve operation rejected its input.
    #[error("signing failed: {0}")]
    SigningFailure(#[source] secp256k1::Error),
}

impl SignError {
    /// Creates an [`SignError::InvalidToken`] with the given reason.
    #[must_use]
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken(reason.into())
    }
}

/// No environment is registered under the requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnvironmentError {
    /// The requested environment name.
    pub name: String,
}

impl UnknownEnvironmentError {
    /// Creates a new unknown-environment error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for UnknownEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No environment registered under '{}'", self.name)
    }
}

impl std::error::Error for UnknownEnvironmentError {}

/// A string did not name a value of an enumerated type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// The kind of value being parsed (e.g. `"currency code"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
