//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Invalid lookup table: {0}")]
    InvalidTable(String),

    #[error("Malformed track event: {0}")]
    MalformedEvent(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
