//! Error types for IPSec protocol operations
//!
//! This module defines the error type for IKE task plumbing: configuration
//! validation and session lookup. Per-payload anomalies in received messages
//! are logged and skipped, never reported through here.

use std::fmt;

use warden_platform::WardenError;

/// Result type for IPSec operations
pub type Result<T> = std::result::Result<T, Error>;

/// IPSec protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration or argument
    InvalidParameter(String),

    /// IKE SA referenced by a task handle no longer exists
    SaNotFound(u64),

    /// Role or version combination without an implementation
    NotImplemented(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::SaNotFound(id) => write!(f, "IKE SA not found: #{}", id),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for WardenError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotImplemented(msg) => WardenError::NotImplemented(msg),
            Error::InvalidParameter(msg) => WardenError::Config(msg),
            other => WardenError::Other(Box::new(other)),
        }
    }
}
