//! Core error types for Dendra

use thiserror::Error;

/// Main error type for Dendra operations
#[derive(Error, Debug)]
pub enum DendraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Dendra operations
pub type DendraResult<T> = Result<T, DendraError>;

impl From<toml::de::Error> for DendraError {
    fn from(err: toml::de::Error) -> Self {
        DendraError::Configuration(err.to_string())
    }
}

impl From<toml::ser::Error> for DendraError {
    fn from(err: toml::ser::Error) -> Self {
        DendraError::Configuration(err.to_string())
    }
}
