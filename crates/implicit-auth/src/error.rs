//! Error types for credential storage, profile lookup, and configuration

/// Errors from the credential cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("credential parse error: {0}")]
    Parse(String),

    #[error("invalid credential: {0}")]
    Invalid(String),
}

/// Errors from the post-authorization profile lookup.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("profile endpoint returned {0}")]
    Provider(String),

    #[error("malformed profile response: {0}")]
    Malformed(String),
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
