//! HandCash environments and their base URLs.
//!
//! Environments are plain values handed to the client at construction time,
//! so several of them can be used side by side in one process. The
//! [`EnvironmentRegistry`] resolves the names accepted on the command line or
//! in configuration (`beta`, `iae`, `prod`) to their URLs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEnvironmentError;

/// Name of the beta environment.
pub const BETA: &str = "beta";

/// Name of the IAE environment.
pub const IAE: &str = "iae";

/// Name of the production environment.
pub const PRODUCTION: &str = "prod";

/// Base URLs of one HandCash deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment name (e.g. `"prod"`).
    pub name: String,
    /// Server-side API base URL, without trailing slash.
    pub api_url: String,
    /// Client-side app URL, used for authorization redirects.
    pub client_url: String,
}

impl Environment {
    /// The beta environment.
    #[must_use]
    pub fn beta() -> Self {
        Self::custom(
            BETA,
            "https://beta-cloud.handcash.io",
            "https://beta-app.handcash.io",
        )
    }

    /// The IAE environment.
    #[must_use]
    pub fn iae() -> Self {
        Self::custom(
            IAE,
            "https://iae.cloud.handcash.io",
            "https://iae-app.handcash.io",
        )
    }

    /// The production environment.
    #[must_use]
    pub fn production() -> Self {
        Self::custom(
            PRODUCTION,
            "https://cloud.handcash.io",
            "https://app.handcash.io",
        )
    }

    /// An environment with arbitrary URLs (e.g. a local mock server).
    ///
    /// Trailing slashes are removed from both URLs.
    #[must_use]
    pub fn custom(
        name: impl Into<String>,
        api_url: impl Into<String>,
        client_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            client_url: client_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// URL a user visits to authorize `app_id` and obtain an auth token.
    #[must_use]
    pub fn redirection_url(&self, app_id: &str) -> String {
        format!("{}/#/authorizeApp?appId={app_id}", self.client_url)
    }
}

/// Lookup table from environment name to [`Environment`].
///
/// # Example
///
/// ```rust
/// use handcash::environment::EnvironmentRegistry;
///
/// let registry = EnvironmentRegistry::known();
/// let prod = registry.resolve("prod").unwrap();
/// assert_eq!(prod.api_url, "https://cloud.handcash.io");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRegistry {
    environments: HashMap<String, Environment>,
}

impl EnvironmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            environments: HashMap::new(),
        }
    }

    /// Creates a registry holding `beta`, `iae` and `prod`.
    #[must_use]
    pub fn known() -> Self {
        Self::new()
            .with_environment(Environment::beta())
            .with_environment(Environment::iae())
            .with_environment(Environment::production())
    }

    /// Registers an environment, replacing any previous one with the same name.
    pub fn register(&mut self, environment: Environment) {
        self.environments
            .insert(environment.name.clone(), environment);
    }

    /// Builder-style method: registers an environment and returns `self`.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.register(environment);
        self
    }

    /// Looks up an environment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    /// Looks up an environment by name, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEnvironmentError`] if `name` is not registered.
    pub fn resolve(&self, name: &str) -> Result<&Environment, UnknownEnvironmentError> {
        self.get(name)
            .ok_or_else(|| UnknownEnvironmentError::new(name))
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered environments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Returns `true` if no environments are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self::known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_table() {
        let registry = EnvironmentRegistry::known();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["beta", "iae", "prod"]);

        let beta = registry.resolve(BETA).unwrap();
        assert_eq!(beta.api_url, "https://beta-cloud.handcash.io");
        assert_eq!(beta.client_url, "https://beta-app.handcash.io");

        let iae = registry.resolve(IAE).unwrap();
        assert_eq!(iae.api_url, "https://iae.cloud.handcash.io");
        assert_eq!(iae.client_url, "https://iae-app.handcash.io");

        let prod = registry.resolve(PRODUCTION).unwrap();
        assert_eq!(prod.api_url, "https://cloud.handcash.io");
        assert_eq!(prod.client_url, "https://app.handcash.io");
    }

    #[test]
    fn test_resolve_unknown() {
        let err = EnvironmentRegistry::known().resolve("staging").unwrap_err();
        assert_eq!(err.name, "staging");
        assert_eq!(err.to_string(), "No environment registered under 'staging'");
    }

    #[test]
    fn test_custom_environment_coexists_with_known() {
        let registry = EnvironmentRegistry::known().with_environment(Environment::custom(
            "local",
            "http://127.0.0.1:8080/",
            "http://127.0.0.1:3000",
        ));
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve("local").unwrap().api_url, "http://127.0.0.1:8080");
        assert_eq!(
            registry.resolve("prod").unwrap().api_url,
            "https://cloud.handcash.io"
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = EnvironmentRegistry::known();
        registry.register(Environment::custom(BETA, "http://localhost:1", "http://localhost:2"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve(BETA).unwrap().api_url, "http://localhost:1");
    }

    #[test]
    fn test_redirection_url() {
        let url = Environment::production().redirection_url("my-app");
        assert_eq!(url, "https://app.handcash.io/#/authorizeApp?appId=my-app");
    }
}
