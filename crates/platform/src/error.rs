//! Error types for Warden

use std::fmt;

/// Unified error type surfaced to the task scheduler
#[derive(Debug)]
pub enum WardenError {
    /// Configuration error
    Config(String),

    /// Protocol error
    Protocol(String),

    /// Requested behaviour is not implemented for this role or version
    NotImplemented(String),

    /// Other error
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for WardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WardenError::Config(msg) => write!(f, "Configuration error: {}", msg),
            WardenError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            WardenError::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            WardenError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for WardenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WardenError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Result type for Warden operations
pub type WardenResult<T> = Result<T, WardenError>;
