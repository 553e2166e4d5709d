//! Basic authentication configuration.

use serde::{Deserialize, Serialize};

/// Paths exempt from authentication unless configured otherwise.
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
];

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// enabled = true
/// realm = "warden"
/// excluded_paths = ["/api/v1/status/", "/api/v1/stats"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable/disable the filter entirely.
    /// When disabled, every request proceeds unauthenticated.
    pub enabled: bool,

    /// Realm advertised in the `WWW-Authenticate` challenge.
    pub realm: String,

    /// Paths that never require authentication.
    /// Compared exactly, ignoring a trailing slash.
    pub excluded_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            realm: "warden".to_string(),
            excluded_paths: DEFAULT_EXCLUDED_PATHS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the realm is empty, and
    /// `ConfigError::InvalidValue` if:
    /// - The realm contains a double quote
    /// - An excluded path does not start with `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realm.is_empty() {
            return Err(ConfigError::Missing("auth.realm".to_string()));
        }

        // The realm is emitted as a quoted-string in the challenge header.
        if self.realm.contains('"') {
            return Err(ConfigError::InvalidValue(format!(
                "realm '{}' must not contain '\"'",
                self.realm
            )));
        }

        for path in &self.excluded_paths {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "excluded path '{}' must start with '/'",
                    path
                )));
            }
        }

        Ok(())
    }
}
