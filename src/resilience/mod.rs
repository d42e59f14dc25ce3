//! Resilience
//!
//! Timeout and exponential backoff retry for RESTlet calls.

pub mod retry;

pub use retry::{
    Executed, ExecutionFailure, OutcomeClass, RequestExecutor, ResponseStatus, RetryConfig,
    RetryState, DEFAULT_RETRY_CONFIG,
};
