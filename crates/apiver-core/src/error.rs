//! Error types for version registration and resolution

use thiserror::Error;

/// Errors raised by the version registry, version parsing and configuration
#[derive(Debug, Error)]
pub enum VersionError {
    /// The registry holds no versions
    #[error("No versions registered")]
    NotRegistered,

    /// A string could not be read as a `YYYY-MM-DD` calendar date
    #[error("Invalid version date: {0}")]
    InvalidDate(String),

    /// Resolution produced no version (unparsable input and no default)
    #[error("Unable to resolve API version: {0}")]
    Unresolvable(String),

    /// The configured default is not one of the configured versions
    #[error("Default version {0} is not in the configured version list")]
    UnknownDefault(String),

    /// Environment configuration could not be deserialized
    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),

    /// JSON configuration could not be deserialized
    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VersionError>;
