//! HandCash Connect endpoints, header names and client defaults.

use std::time::Duration;

pub use handcash::signer::{PUBLIC_KEY_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Current user's profile.
pub const ENDPOINT_CURRENT_PROFILE: &str = "/v1/connect/profile/currentUserProfile";

/// Public profiles looked up by handle.
pub const ENDPOINT_PUBLIC_PROFILES: &str = "/v1/connect/profile/publicUserProfiles";

/// Current user's friends.
pub const ENDPOINT_FRIENDS: &str = "/v1/connect/profile/friends";

/// Permissions granted to the app.
pub const ENDPOINT_PERMISSIONS: &str = "/v1/connect/profile/permissions";

/// Spendable balance.
pub const ENDPOINT_SPENDABLE_BALANCE: &str = "/v1/connect/wallet/spendableBalance";

/// Make a payment.
pub const ENDPOINT_PAY: &str = "/v1/connect/wallet/pay";

/// Fetch a payment by transaction id.
pub const ENDPOINT_PAYMENT: &str = "/v1/connect/wallet/payment";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("handcash-connect-rs/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
