//! Error types for the Ohmyfin client

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Field-level validation messages reported by the API, keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Client errors
///
/// Every failed call yields exactly one of these variants.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration (e.g. missing API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request rejected locally before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Ohmyfin API reported a failure
    #[error("Ohmyfin API error {status_code}: {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
        /// Field-level errors (4xx validation failures only)
        errors: FieldErrors,
    },
}

impl Error {
    /// HTTP status code, when the API answered with a failure
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Field-level errors reported by the API, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Api { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    /// True for transport failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Transport-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request exceeded the configured timeout
    #[error("Timeout after {timeout:?}: {operation}")]
    Timeout {
        /// Timeout duration
        timeout: Duration,
        /// Operation
        operation: String,
    },

    /// Could not connect (refused, DNS failure, TLS handshake)
    #[error("Connection error: {0}")]
    Connect(String),

    /// Call was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// Any other failure while sending or reading the body
    #[error("HTTP client error: {0}")]
    Request(String),
}
