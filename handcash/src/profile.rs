//! User profile types returned by the profile endpoints.

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

/// The authenticated user, as returned by `currentUserProfile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Fields visible to anyone.
    #[serde(deserialize_with = "null_as_default")]
    pub public_profile: PublicProfile,
    /// Fields only visible to apps with the matching permission.
    #[serde(deserialize_with = "null_as_default")]
    pub private_profile: PrivateProfile,
}

/// Publicly visible profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicProfile {
    /// HandCash user id.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// `$handle` without the leading `$`.
    #[serde(deserialize_with = "null_as_default")]
    pub handle: String,
    /// Paymail address (e.g. `handle@handcash.io`).
    #[serde(deserialize_with = "null_as_default")]
    pub paymail: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Avatar image URL.
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
    /// ISO 4217 code of the user's preferred currency.
    #[serde(deserialize_with = "null_as_default")]
    pub local_currency_code: String,
}

/// Private profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateProfile {
    /// Email address.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Phone number.
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
}

/// A list of public profiles (friends, handle lookups).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicProfiles {
    /// The profiles.
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<PublicProfile>,
}

/// Request body for looking up public profiles by handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfilesRequest {
    /// Handles to look up.
    pub aliases: Vec<String>,
}

/// Permissions granted to the calling app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    /// Permission identifiers (e.g. `"PAY"`, `"USER_PUBLIC_PROFILE"`).
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<String>,
    /// The app the permissions belong to.
    #[serde(deserialize_with = "null_as_default")]
    pub app_id: String,
}
