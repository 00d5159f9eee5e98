//! Identity and target environment for a client.
//!
//! # Design
//! `Session` is owned by one `PlacesClient` and mutated only through
//! `&mut self`. Requests read it synchronously while they are built, so a
//! request reflects the identity and endpoint current at build time; there is
//! no locking or versioning beyond what the borrow checker enforces.
//!
//! Construction validates the identity. `set_identity` does not; a bad
//! replacement is only caught by the server.

use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::error::ApiError;
use crate::types::Identity;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Environment {
    Sandbox,
    #[default]
    Production,
}

impl Environment {
    /// Interpret a "use sandbox" flag. `None` for anything unrecognized.
    pub fn from_flag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "sandbox" => Some(Environment::Sandbox),
            "false" | "0" | "no" | "off" | "production" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Like `from_flag`, but an unrecognized value logs a warning and
    /// selects Production instead of failing.
    pub fn from_flag_lenient(raw: &str) -> Self {
        Self::from_flag(raw).unwrap_or_else(|| {
            tracing::warn!(flag = raw, "sandbox flag not recognized, defaulting to production");
            Environment::Production
        })
    }

    pub fn is_sandbox(self) -> bool {
        self == Environment::Sandbox
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    identity: Identity,
    /// JSON form of `identity`, sent as a header on every request.
    identity_header: String,
    environment: Environment,
    endpoints: Endpoints,
}

impl Session {
    pub fn new(
        identity: Identity,
        environment: Option<Environment>,
        endpoints: Endpoints,
    ) -> Result<Self, ApiError> {
        validate::identity(&identity)?;
        Ok(Self {
            identity_header: identity_header(&identity),
            identity,
            environment: environment.unwrap_or_default(),
            endpoints,
        })
    }

    /// A copy of the current identity.
    pub fn identity(&self) -> Identity {
        self.identity.clone()
    }

    pub(crate) fn identity_ref(&self) -> &Identity {
        &self.identity
    }

    pub fn identity_header(&self) -> &str {
        &self.identity_header
    }

    /// Replace the identity wholesale. Not validated.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity_header = identity_header(&identity);
        self.identity = identity;
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn switch_to_sandbox(&mut self) {
        self.environment = Environment::Sandbox;
    }

    pub fn switch_to_production(&mut self) {
        self.environment = Environment::Production;
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment.is_sandbox()
    }

    pub fn is_production(&self) -> bool {
        !self.is_sandbox()
    }

    /// Base endpoint for the current environment.
    pub fn base_url(&self) -> &str {
        self.endpoints.for_environment(self.environment)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

fn identity_header(identity: &Identity) -> String {
    serde_json::json!({
        "Puid": identity.puid,
        "AuthProvider": identity.auth_provider,
        "EmailId": identity.email_id,
    })
    .to_string()
}
