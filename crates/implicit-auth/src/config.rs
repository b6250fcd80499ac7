//! Application configuration loading
//!
//! The provider endpoints and application id live in a TOML file so the
//! same core works against any implicit-flow provider. Endpoints are
//! validated at load time; a bad config fails fast instead of producing
//! a broken login URL later.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Application + provider settings for the implicit flow.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public application/client id registered with the provider
    pub app_id: String,
    /// Authorization dialog endpoint
    pub authorize_endpoint: String,
    /// Redirect URI the provider sends the callback to
    pub redirect_uri: String,
    /// Profile endpoint used to resolve the subject id after authorization
    pub profile_endpoint: String,
    /// Dialog rendering hint (`popup` for desktop, `touch` for mobile)
    #[serde(default = "default_display")]
    pub display: String,
    /// Optional endpoint for the best-effort usage ping
    #[serde(default)]
    pub usage_ping_endpoint: Option<String>,
}

fn default_display() -> String {
    "popup".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::Invalid("app_id must not be empty".into()));
        }
        for (name, value) in [
            ("authorize_endpoint", &self.authorize_endpoint),
            ("redirect_uri", &self.redirect_uri),
            ("profile_endpoint", &self.profile_endpoint),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{name} must start with http:// or https://, got: {value}"
                )));
            }
        }
        Ok(())
    }
}
