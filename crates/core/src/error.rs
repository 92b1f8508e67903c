//! Core error types

use thiserror::Error;

/// Core error type for SkyGlass
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Configuration parsed but is inconsistent
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
