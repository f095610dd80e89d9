//! HTTP transport for the HandCash Connect API.
//!
//! [`HandCashClient`] signs every call with the request signer from the
//! `handcash` crate, sends it with `reqwest`, and decodes the JSON response
//! into the matching domain type.
//!
//! # Modules
//!
//! - [`client`] - [`HandCashClient`] and its [`ClientConfig`]
//! - [`constants`] - API endpoints, header names, defaults
//! - [`error`] - Transport error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for outbound requests

pub mod client;
pub mod constants;
pub mod error;

pub use client::{ClientConfig, HandCashClient};
pub use error::ClientError;
