//! Call Result
//!
//! The uniform shape every RESTlet call resolves to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NetSuiteError, RequestError};

/// Outcome of one logical RESTlet call.
///
/// `success` combines the HTTP-level outcome with the RESTlet's own
/// `success` flag, so a 200 response may still be a failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallResult {
    /// Successful call carrying the parsed body.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed call with an error message and no body.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Parse the body into a typed value.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|data| serde_json::from_value(data.clone()).ok())
    }

    /// Error message, or a generic one when none was reported.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}

impl From<NetSuiteError> for CallResult {
    fn from(err: NetSuiteError) -> Self {
        CallResult::failure(err.to_string())
    }
}

impl From<RequestError> for CallResult {
    fn from(err: RequestError) -> Self {
        CallResult::from(NetSuiteError::from(err))
    }
}

/// A read result annotated with whether it was served from cache.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CachedResult {
    #[serde(flatten)]
    pub result: CallResult,
    pub cached: bool,
}
