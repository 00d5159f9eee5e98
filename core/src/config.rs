//! Client configuration.
//!
//! Holds the two base endpoints and, for `ClientConfig`, the identity and
//! starting environment. Defaults point at the public API; override via
//! environment variables or explicit construction for testing.

use url::Url;

use crate::session::Environment;
use crate::types::Identity;

pub const PRODUCTION_ENDPOINT: &str = "https://api.bingplaces.com/trustedPartnerApi/v1";
pub const SANDBOX_ENDPOINT: &str = "https://api.sandbox.bingplaces.com/trustedPartnerApi/v1";

/// Base URLs for the two environments, stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    sandbox: String,
    production: String,
}

impl Endpoints {
    /// Validate both URLs and strip trailing slashes.
    pub fn new(sandbox: &str, production: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            sandbox: checked_url("sandbox", sandbox)?,
            production: checked_url("production", production)?,
        })
    }

    /// Point both environments at one server (a local mock, usually).
    pub fn single(base_url: &str) -> Result<Self, ConfigError> {
        Self::new(base_url, base_url)
    }

    pub fn sandbox(&self) -> &str {
        &self.sandbox
    }

    pub fn production(&self) -> &str {
        &self.production
    }

    pub fn for_environment(&self, environment: Environment) -> &str {
        match environment {
            Environment::Sandbox => &self.sandbox,
            Environment::Production => &self.production,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sandbox: SANDBOX_ENDPOINT.to_string(),
            production: PRODUCTION_ENDPOINT.to_string(),
        }
    }
}

fn checked_url(name: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            name.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Everything needed to construct a `PlacesClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub identity: Identity,
    /// `None` means Production.
    pub environment: Option<Environment>,
    pub endpoints: Endpoints,
}

impl ClientConfig {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            environment: None,
            endpoints: Endpoints::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BING_PLACES_PUID`, `BING_PLACES_AUTH_PROVIDER`, `BING_PLACES_EMAIL` (required)
    /// - `BING_PLACES_SANDBOX` (optional; unrecognized values warn and fall back to production)
    /// - `BING_PLACES_SANDBOX_URL` (default: the public sandbox endpoint)
    /// - `BING_PLACES_PRODUCTION_URL` (default: the public production endpoint)
    ///
    /// Identity fields are only checked for presence here; shape and email
    /// validation happen when the client is constructed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// `from_env` over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| lookup(var).ok_or_else(|| ConfigError::MissingVar(var.to_string()));
        let identity = Identity {
            puid: required("BING_PLACES_PUID")?,
            auth_provider: required("BING_PLACES_AUTH_PROVIDER")?,
            email_id: required("BING_PLACES_EMAIL")?,
        };
        let environment = lookup("BING_PLACES_SANDBOX").map(|flag| Environment::from_flag_lenient(&flag));
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());
        let endpoints = Endpoints::new(
            &or_default("BING_PLACES_SANDBOX_URL", SANDBOX_ENDPOINT),
            &or_default("BING_PLACES_PRODUCTION_URL", PRODUCTION_ENDPOINT),
        )?;
        Ok(Self {
            identity,
            environment,
            endpoints,
        })
    }

    /// Configuration pointing both environments at a local mock server.
    pub fn local_mock(base_url: &str, identity: Identity) -> Result<Self, ConfigError> {
        Ok(Self {
            identity,
            environment: Some(Environment::Sandbox),
            endpoints: Endpoints::single(base_url)?,
        })
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(String),
    #[error("invalid {0} endpoint: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_are_public_api() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.sandbox(), SANDBOX_ENDPOINT);
        assert_eq!(endpoints.production(), PRODUCTION_ENDPOINT);
        assert_ne!(endpoints.sandbox(), endpoints.production());
    }

    #[test]
    fn endpoints_strip_trailing_slash() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9001").unwrap();
        assert_eq!(endpoints.sandbox(), "http://127.0.0.1:9000");
        assert_eq!(endpoints.for_environment(Environment::Production), "http://127.0.0.1:9001");
    }

    #[test]
    fn endpoints_reject_bad_urls() {
        assert!(matches!(
            Endpoints::new("not a url", PRODUCTION_ENDPOINT),
            Err(ConfigError::InvalidUrl(name, _)) if name == "sandbox"
        ));
        assert!(Endpoints::new(SANDBOX_ENDPOINT, "ftp://example.com").is_err());
    }

    #[test]
    fn local_mock_targets_one_server() {
        let cfg = ClientConfig::local_mock(
            "http://127.0.0.1:3000",
            Identity::new("test", "test", "test@gmail.com"),
        )
        .unwrap();
        assert_eq!(cfg.environment, Some(Environment::Sandbox));
        assert_eq!(cfg.endpoints.sandbox(), cfg.endpoints.production());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    const IDENTITY_VARS: [(&str, &str); 3] = [
        ("BING_PLACES_PUID", "test"),
        ("BING_PLACES_AUTH_PROVIDER", "test"),
        ("BING_PLACES_EMAIL", "test@gmail.com"),
    ];

    #[test]
    fn lookup_requires_identity_vars() {
        let err = ClientConfig::from_lookup(vars(&IDENTITY_VARS[..2])).unwrap_err();
        assert_eq!(err.to_string(), "BING_PLACES_EMAIL environment variable is required");
    }

    #[test]
    fn lookup_defaults_to_public_endpoints() {
        let cfg = ClientConfig::from_lookup(vars(&IDENTITY_VARS)).unwrap();
        assert_eq!(cfg.identity, Identity::new("test", "test", "test@gmail.com"));
        assert_eq!(cfg.environment, None);
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn lookup_reads_flag_and_overrides() {
        let mut pairs = IDENTITY_VARS.to_vec();
        pairs.extend([
            ("BING_PLACES_SANDBOX", "TRUE"),
            ("BING_PLACES_SANDBOX_URL", "http://127.0.0.1:9000/"),
            ("BING_PLACES_PRODUCTION_URL", "http://127.0.0.1:9001"),
        ]);
        let cfg = ClientConfig::from_lookup(vars(&pairs)).unwrap();
        assert_eq!(cfg.environment, Some(Environment::Sandbox));
        assert_eq!(cfg.endpoints.sandbox(), "http://127.0.0.1:9000");
        assert_eq!(cfg.endpoints.production(), "http://127.0.0.1:9001");
    }

    #[test]
    fn lookup_unrecognized_flag_falls_back_to_production() {
        let mut pairs = IDENTITY_VARS.to_vec();
        pairs.push(("BING_PLACES_SANDBOX", "not a boolean"));
        let cfg = ClientConfig::from_lookup(vars(&pairs)).unwrap();
        assert_eq!(cfg.environment, Some(Environment::Production));
    }

    #[test]
    fn lookup_rejects_bad_override() {
        let mut pairs = IDENTITY_VARS.to_vec();
        pairs.push(("BING_PLACES_PRODUCTION_URL", "not a url"));
        assert!(matches!(
            ClientConfig::from_lookup(vars(&pairs)),
            Err(ConfigError::InvalidUrl(name, _)) if name == "production"
        ));
    }

    // The only test that touches the process environment.
    #[test]
    fn from_env_reads_process_environment() {
        for (var, value) in IDENTITY_VARS {
            std::env::set_var(var, value);
        }
        std::env::set_var("BING_PLACES_SANDBOX", "yes");
        std::env::set_var("BING_PLACES_SANDBOX_URL", "http://127.0.0.1:9100");
        std::env::remove_var("BING_PLACES_PRODUCTION_URL");

        let cfg = ClientConfig::from_env().unwrap();
        assert_eq!(cfg.identity.email_id, "test@gmail.com");
        assert_eq!(cfg.environment, Some(Environment::Sandbox));
        assert_eq!(cfg.endpoints.sandbox(), "http://127.0.0.1:9100");
        assert_eq!(cfg.endpoints.production(), PRODUCTION_ENDPOINT);
    }
}
