//! NetSuite Error Types
//!
//! Error hierarchy for the RESTlet integration. Expected call failures are
//! reported through [`CallResult`](crate::types::CallResult); these types cover
//! the conditions that escape that path (configuration, client construction,
//! request shaping).

use std::time::Duration;
use thiserror::Error;

/// Root error type for the NetSuite integration.
#[derive(Error, Debug)]
pub enum NetSuiteError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

impl NetSuiteError {
    /// Stable code for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "NETSUITE_CONFIG",
            Self::Network(_) => "NETSUITE_NETWORK",
            Self::Protocol(_) => "NETSUITE_PROTOCOL",
            Self::Request(_) => "NETSUITE_REQUEST",
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Configuration error. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Failure to complete an HTTP exchange.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl NetworkError {
    /// Everything except client construction is worth retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ClientBuild { .. })
    }
}

/// Protocol/response error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Failed to serialize request body: {message}")]
    Serialization { message: String },
}

/// Request shaping error, raised before anything is sent.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid parameter '{field}': {message}")]
    InvalidParameter { field: String, message: String },
}

impl RequestError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for NetSuite operations.
pub type NetSuiteResult<T> = Result<T, NetSuiteError>;

impl From<serde_json::Error> for NetSuiteError {
    fn from(err: serde_json::Error) -> Self {
        NetSuiteError::Protocol(ProtocolError::Serialization {
            message: err.to_string(),
        })
    }
}
