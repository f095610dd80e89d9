//! Request signing for the HandCash Connect API.
//!
//! Every authenticated call carries three headers computed here:
//!
//! - `oauth-publickey` - compressed secp256k1 public key derived from the auth token, hex
//! - `oauth-signature` - DER-encoded ECDSA signature over the canonical payload, hex
//! - `oauth-timestamp` - the timestamp embedded in the canonical payload
//!
//! The canonical payload is `METHOD\nENDPOINT\nTIMESTAMP\nBODY_JSON`, hashed
//! with SHA-256 before signing. The server reconstructs the same string, so any
//! deviation in line order, separator, timestamp shape or body encoding makes
//! every request fail with an invalid-signature error.

use std::fmt;
use std::str::FromStr;

use secp256k1::ecdsa::Signature;
use secp256k1::Secp256k1;
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};
#[cfg(feature = "telemetry")]
use tracing::{instrument, trace};

pub use secp256k1::{Message, PublicKey, SecretKey};

use crate::error::{ParseEnumError, SignError};
use crate::timestamp::IsoTimestamp;

/// Header carrying the hex-encoded compressed public key.
pub const PUBLIC_KEY_HEADER: &str = "oauth-publickey";

/// Header carrying the hex-encoded DER signature.
pub const SIGNATURE_HEADER: &str = "oauth-signature";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "oauth-timestamp";

/// Body segment used in the canonical payload when a request has no body.
pub const EMPTY_BODY: &str = "{}";

/// Byte length of a secp256k1 secret scalar.
pub const SECRET_KEY_SIZE: usize = 32;

/// Caller-held hex secret from which the signing key pair is derived.
///
/// The token is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a hex-encoded auth token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is empty or whitespace only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AuthToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// HTTP verbs accepted by the signer.
///
/// Always rendered uppercase; the server compares the method line verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Returns the uppercase verb.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ParseEnumError::new("HTTP method", s)),
        }
    }
}

/// Request body: either absent or a JSON value.
///
/// A JSON `null` is treated the same as an absent body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body. Signed as `{}`.
    #[default]
    Empty,
    /// A JSON body, signed in its compact serialization.
    Present(Value),
}

impl Body {
    /// Wraps a JSON value, normalising `null` to [`Body::Empty`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            Self::Empty
        } else {
            Self::Present(value)
        }
    }

    /// Serializes any value into a body.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::BodyEncoding`] if `value` cannot be represented
    /// as JSON (e.g. a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SignError> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    /// Returns `true` for [`Body::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the JSON value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Present(value) => Some(value),
        }
    }

    /// Returns the body segment of the canonical payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::BodyEncoding`] if serialization fails.
    pub fn to_canonical_json(&self) -> Result<String, SignError> {
        match self {
            Self::Empty => Ok(EMPTY_BODY.to_owned()),
            Self::Present(value) => Ok(serde_json::to_string(value)?),
        }
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Present(value) => value.serialize(serializer),
        }
    }
}

/// Logical description of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    endpoint: String,
    body: Body,
}

impl RequestDescriptor {
    /// Creates a descriptor without a body.
    ///
    /// `endpoint` is the path including its leading `/`, without the host.
    #[must_use]
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: Body::Empty,
        }
    }

    /// Creates a `GET` descriptor.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    /// Creates a `POST` descriptor.
    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }
}

/// Secret and public key derived from an [`AuthToken`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Returns the secret key.
    #[must_use]
    pub const fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Returns the public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the compressed (33-byte) public key, hex-encoded.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// The three authentication headers of a signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OauthHeaders {
    /// Compressed public key, hex.
    #[serde(rename = "oauth-publickey")]
    pub public_key: String,
    /// DER signature, hex.
    #[serde(rename = "oauth-signature")]
    pub signature: String,
    /// Signed timestamp.
    #[serde(rename = "oauth-timestamp")]
    pub timestamp: String,
}

impl OauthHeaders {
    /// Returns `(header name, value)` pairs ready to attach to a request.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (PUBLIC_KEY_HEADER, self.public_key.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}

/// A fully signed request, ready to hand to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedRequest {
    uri: String,
    method: Method,
    headers: OauthHeaders,
    body: Body,
    json: bool,
    #[serde(skip)]
    signed_body: String,
}

impl SignedRequest {
    /// Absolute request URI (`base_url + endpoint`).
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Authentication headers.
    #[must_use]
    pub const fn headers(&self) -> &OauthHeaders {
        &self.headers
    }

    /// The request body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Whether the body is sent as JSON. Always `true`.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Returns the exact body text covered by the signature, or `None` when
    /// the request has no body.
    ///
    /// Transports must send these bytes unchanged.
    #[must_use]
    pub fn body_json(&self) -> Option<&str> {
        if self.body.is_empty() {
            None
        } else {
            Some(&self.signed_body)
        }
    }
}

/// Derives the signing key pair from an auth token.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`SignError::InvalidToken`] if the token is empty, not hex, does
/// not decode to exactly [`SECRET_KEY_SIZE`] bytes, or is not a valid scalar.
pub fn derive_key_pair(auth_token: &AuthToken) -> Result<KeyPair, SignError> {
    if auth_token.is_empty() {
        return Err(SignError::invalid_token("missing auth token"));
    }

    let bytes = hex::decode(auth_token.expose().trim())
        .map_err(|e| SignError::invalid_token(format!("not valid hex: {e}")))?;
    if bytes.len() != SECRET_KEY_SIZE {
        return Err(SignError::invalid_token(format!(
            "expected {SECRET_KEY_SIZE} bytes, got {}",
            bytes.len()
        )));
    }

    let secret_key = SecretKey::from_slice(&bytes)
        .map_err(|_| SignError::invalid_token("not a valid secp256k1 scalar"))?;
    let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);

    Ok(KeyPair {
        secret_key,
        public_key,
    })
}

/// Builds the canonical payload `METHOD\nENDPOINT\nTIMESTAMP\nBODY_JSON`.
///
/// # Errors
///
/// Returns [`SignError::BodyEncoding`] if the body cannot be serialized.
pub fn canonicalize(
    method: Method,
    endpoint: &str,
    timestamp: &IsoTimestamp,
    body: &Body,
) -> Result<String, SignError> {
    let body_json = body.to_canonical_json()?;
    Ok(join_payload(method, endpoint, timestamp, &body_json))
}

fn join_payload(method: Method, endpoint: &str, timestamp: &IsoTimestamp, body_json: &str) -> String {
    format!("{method}\n{endpoint}\n{timestamp}\n{body_json}")
}

/// Signs a canonical payload.
///
/// The payload is hashed with SHA-256 and signed with RFC 6979 deterministic
/// ECDSA. The signature is low-S normalised and DER-encoded.
///
/// # Errors
///
/// Returns [`SignError::SigningFailure`] if the digest is rejected by the
/// curve library.
pub fn sign(canonical_payload: &str, secret_key: &SecretKey) -> Result<Vec<u8>, SignError> {
    let message = payload_message(canonical_payload).map_err(SignError::SigningFailure)?;
    let mut signature = Secp256k1::signing_only().sign_ecdsa(&message, secret_key);
    signature.normalize_s();
    Ok(signature.serialize_der().to_vec())
}

/// Checks a DER signature over a canonical payload, as the server does.
#[must_use]
pub fn verify(canonical_payload: &str, signature_der: &[u8], public_key: &PublicKey) -> bool {
    let Ok(signature) = Signature::from_der(signature_der) else {
        return false;
    };
    let Ok(message) = payload_message(canonical_payload) else {
        return false;
    };
    Secp256k1::verification_only()
        .verify_ecdsa(&message, &signature, public_key)
        .is_ok()
}

/// Hashes a canonical payload into the message that gets signed.
///
/// # Errors
///
/// Returns the curve library's error if the digest has the wrong length.
pub fn payload_message(canonical_payload: &str) -> Result<Message, secp256k1::Error> {
    let digest = Sha256::digest(canonical_payload.as_bytes());
    Message::from_digest_slice(digest.as_slice())
}

/// Signs a request and assembles the result.
///
/// When `timestamp` is `None` the current wall-clock time is used. Key
/// material is derived for this call only and dropped before returning.
///
/// # Errors
///
/// Returns the first [`SignError`] raised by key derivation,
/// canonicalization or signing.
#[cfg_attr(
    feature = "telemetry",
    instrument(
        name = "handcash.sign_request",
        skip_all,
        fields(method = %descriptor.method(), endpoint = descriptor.endpoint()),
        err
    )
)]
pub fn build_signed_request(
    descriptor: &RequestDescriptor,
    base_url: &str,
    auth_token: &AuthToken,
    timestamp: Option<IsoTimestamp>,
) -> Result<SignedRequest, SignError> {
    let key_pair = derive_key_pair(auth_token)?;
    let timestamp = timestamp.unwrap_or_else(IsoTimestamp::now);

    let signed_body = descriptor.body().to_canonical_json()?;
    let payload = join_payload(
        descriptor.method(),
        descriptor.endpoint(),
        &timestamp,
        &signed_body,
    );
    let signature = sign(&payload, key_pair.secret_key())?;

    #[cfg(feature = "telemetry")]
    trace!(%timestamp, public_key = %key_pair.public_key_hex(), "signed request payload");

    Ok(SignedRequest {
        uri: format!("{}{}", base_url.trim_end_matches('/'), descriptor.endpoint()),
        method: descriptor.method(),
        headers: OauthHeaders {
            public_key: key_pair.public_key_hex(),
            signature: hex::encode(signature),
            timestamp: timestamp.to_string(),
        },
        body: descriptor.body().clone(),
        json: true,
        signed_body,
    })
}
