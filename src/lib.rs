//! NetSuite Integration Module
//!
//! Client for a NetSuite RESTlet authenticated with token-based OAuth 1.0a.
//!
//! # Features
//!
//! - OAuth 1.0a HMAC-SHA256 request signing (RFC 5849)
//! - Per-attempt timeout with exponential backoff on 429, 5xx and network failures
//! - Uniform `CallResult` for HTTP-level and RESTlet-level outcomes
//! - One method per RESTlet action, with cached reference-data reads
//! - Record sync with ID extraction and per-record reporting
//!
//! # Example
//!
//! ```rust,ignore
//! use netsuite_integration::{netsuite_config, CreateCustomerParams, NetSuiteClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = netsuite_config()
//!         .account_id("1234567-sb1")
//!         .consumer("consumer-key", "consumer-secret")
//!         .token("token-id", "token-secret")
//!         .restlet_url("https://1234567-sb1.restlets.api.netsuite.com/app/site/hosting/restlet.nl?script=100&deploy=1")
//!         .build()?;
//!
//!     let client = NetSuiteClient::new(config)?;
//!
//!     let result = client.create_customer(CreateCustomerParams::new("Acme")).await;
//!     if result.success {
//!         println!("Created: {:?}", result.data);
//!     } else {
//!         println!("Failed: {}", result.error_message());
//!     }
//!
//!     let employees = client.cached_employees(false).await;
//!     println!("Employees (cached: {}): {:?}", employees.cached, employees.result.data);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, action parameters and `CallResult`
//! - `error`: error hierarchy for conditions outside `CallResult`
//! - `core`: percent-encoding, OAuth 1.0a signer, HTTP transport, response normalization
//! - `resilience`: timeout and retry executor
//! - `cache`: TTL cache for read actions
//! - `client`: RESTlet client tying signer, executor and normalizer together
//! - `services`: per-action read and write methods
//! - `sync`: ID extraction and batch record push
//! - `builders`: fluent configuration builder

pub mod builders;
pub mod cache;
pub mod client;
pub mod core;
pub mod error;
pub mod resilience;
pub mod services;
pub mod sync;
pub mod types;

// Re-export main client
pub use client::{build_url, shape_body, NetSuiteClient};

// Re-export builders
pub use builders::{netsuite_config, NetSuiteConfigBuilder};

// Re-export errors
pub use error::{
    ConfigurationError, NetSuiteError, NetSuiteResult, NetworkError, ProtocolError, RequestError,
};

// Re-export types
pub use types::{
    // Config
    NetSuiteConfig, NetSuiteCredentials,
    // Result
    CachedResult, CallResult,
    // Actions
    BatchCreateParams, CleanupParams, CreateCustomerParams, CreateEstimateParams,
    CreateProjectParams, CreateProjectTaskParams, CreateServiceItemParams, CreateTimeEntryParams,
    CreatedCustomer, CreatedProject, EstimateLineItem, ProjectTaskAssignee, QuickSetupData,
    QuickSetupParams, TemplateType,
};

// Re-export core components
pub use core::{
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Signing
    Clock, DefaultNonceGenerator, FixedClock, FixedNonceGenerator, NonceGenerator, OAuth1Signer,
    OAuthParameters, SignedRequest, SystemClock,
    // Normalization
    normalize_failure, normalize_response,
};

// Re-export resilience
pub use resilience::{
    Executed, ExecutionFailure, OutcomeClass, RequestExecutor, ResponseStatus, RetryConfig,
    RetryState, DEFAULT_RETRY_CONFIG,
};

// Re-export cache
pub use cache::{cache_key, ReadCache};

// Re-export sync
pub use sync::{extract_id, ProjectRecord, SyncFailure, SyncReport, SyncedRecord};
