#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the HandCash Connect API.
//!
//! This crate implements the request-signing protocol that authenticates every
//! HandCash Connect call, together with the domain types exchanged with the
//! API. It performs no I/O; the `handcash-http` crate sends the signed
//! requests produced here.
//!
//! # Overview
//!
//! Every request carries three headers: the compressed secp256k1 public key
//! derived from the caller's auth token, a DER-encoded ECDSA signature, and the
//! timestamp that was signed. The signature covers a canonical payload of the
//! form `METHOD\nENDPOINT\nTIMESTAMP\nBODY_JSON`.
//!
//! ```rust
//! use handcash::signer::{AuthToken, RequestDescriptor, build_signed_request};
//! use handcash::timestamp::IsoTimestamp;
//!
//! let token = AuthToken::new("68d8fadc95324afa853f00923e0b86f06a76ceb7a6afbb1784e0dde8f43989a0");
//! let request = RequestDescriptor::get("/v1/connect/profile/currentUserProfile");
//! let timestamp: IsoTimestamp = "2020-11-22T16:31:23.304Z".parse().unwrap();
//!
//! let signed = build_signed_request(&request, "https://cloud.handcash.io", &token, Some(timestamp)).unwrap();
//! assert_eq!(signed.uri(), "https://cloud.handcash.io/v1/connect/profile/currentUserProfile");
//! assert_eq!(signed.headers().timestamp, "2020-11-22T16:31:23.304Z");
//! ```
//!
//! # Modules
//!
//! - [`signer`] - Key derivation, canonicalization, signing and signed requests
//! - [`timestamp`] - Millisecond-precision ISO-8601 timestamps
//! - [`environment`] - HandCash environments and their base URLs
//! - [`currency`] - Supported currency codes
//! - [`profile`] - User profile types
//! - [`wallet`] - Balance and payment types
//! - [`error`] - Error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for request signing

pub mod currency;
mod de;
pub mod environment;
pub mod error;
pub mod profile;
pub mod signer;
pub mod timestamp;
pub mod wallet;

pub use currency::CurrencyCode;
pub use environment::{Environment, EnvironmentRegistry};
pub use error::{ParseEnumError, SignError, UnknownEnvironmentError};
pub use signer::{AuthToken, Body, Method, RequestDescriptor, SignedRequest};
pub use timestamp::IsoTimestamp;
