//! Configuration Types
//!
//! NetSuite credentials and client configuration.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::time::Duration;

use crate::error::{ConfigurationError, NetSuiteError};
use crate::resilience::RetryConfig;

/// Environment variable names for NetSuite token-based authentication.
pub const NETSUITE_ACCOUNT_ID: &str = "NETSUITE_ACCOUNT_ID";
pub const NETSUITE_CONSUMER_KEY: &str = "NETSUITE_CONSUMER_KEY";
pub const NETSUITE_CONSUMER_SECRET: &str = "NETSUITE_CONSUMER_SECRET";
pub const NETSUITE_TOKEN_ID: &str = "NETSUITE_TOKEN_ID";
pub const NETSUITE_TOKEN_SECRET: &str = "NETSUITE_TOKEN_SECRET";
pub const NETSUITE_RESTLET_URL: &str = "NETSUITE_RESTLET_URL";

/// Default configuration values.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Token-based authentication credentials for one NetSuite account.
#[derive(Clone)]
pub struct NetSuiteCredentials {
    /// Account identifier, e.g. `1234567` or `1234567-sb1`.
    pub account_id: String,
    /// Integration record consumer key.
    pub consumer_key: String,
    /// Integration record consumer secret.
    pub consumer_secret: SecretString,
    /// Access token id.
    pub token_id: String,
    /// Access token secret.
    pub token_secret: SecretString,
    /// Deployed RESTlet URL, including its `script`/`deploy` query.
    pub restlet_url: String,
}

impl NetSuiteCredentials {
    /// Create credentials from their parts.
    pub fn new(
        account_id: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token_id: impl Into<String>,
        token_secret: impl Into<String>,
        restlet_url: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: SecretString::new(consumer_secret.into()),
            token_id: token_id.into(),
            token_secret: SecretString::new(token_secret.into()),
            restlet_url: restlet_url.into(),
        }
    }

    /// Read credentials from the `NETSUITE_*` environment variables.
    ///
    /// A variable that is unset or empty is a fatal configuration error.
    pub fn from_env() -> Result<Self, NetSuiteError> {
        Ok(Self::new(
            required_env(NETSUITE_ACCOUNT_ID)?,
            required_env(NETSUITE_CONSUMER_KEY)?,
            required_env(NETSUITE_CONSUMER_SECRET)?,
            required_env(NETSUITE_TOKEN_ID)?,
            required_env(NETSUITE_TOKEN_SECRET)?,
            required_env(NETSUITE_RESTLET_URL)?,
        ))
    }

    /// Check that no field is empty.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let fields = [
            (NETSUITE_ACCOUNT_ID, self.account_id.as_str()),
            (NETSUITE_CONSUMER_KEY, self.consumer_key.as_str()),
            (NETSUITE_CONSUMER_SECRET, self.consumer_secret.expose_secret().as_str()),
            (NETSUITE_TOKEN_ID, self.token_id.as_str()),
            (NETSUITE_TOKEN_SECRET, self.token_secret.expose_secret().as_str()),
            (NETSUITE_RESTLET_URL, self.restlet_url.as_str()),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingRequired {
                    field: field.to_string(),
                });
            }
        }

        url::Url::parse(&self.restlet_url).map_err(|_| ConfigurationError::InvalidEndpoint {
            url: self.restlet_url.clone(),
        })?;

        Ok(())
    }

    /// Realm rendered into the Authorization header.
    ///
    /// Sandbox accounts are named like `1234567-sb1`; the header expects
    /// `1234567_SB1`.
    pub fn realm(&self) -> String {
        self.account_id.to_uppercase().replace('-', "_")
    }
}

impl std::fmt::Debug for NetSuiteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetSuiteCredentials")
            .field("account_id", &self.account_id)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("token_id", &self.token_id)
            .field("token_secret", &"[REDACTED]")
            .field("restlet_url", &self.restlet_url)
            .finish()
    }
}

fn required_env(name: &str) -> Result<String, ConfigurationError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigurationError::MissingRequired {
            field: name.to_string(),
        }),
    }
}

/// NetSuite client configuration.
#[derive(Clone, Debug)]
pub struct NetSuiteConfig {
    /// Account credentials.
    pub credentials: NetSuiteCredentials,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Time-to-live for cached reads.
    pub cache_ttl: Duration,
}

impl NetSuiteConfig {
    /// Create configuration with default timeouts and retry policy.
    pub fn new(credentials: NetSuiteCredentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Load credentials from the environment and apply defaults.
    pub fn from_env() -> Result<Self, NetSuiteError> {
        let config = Self::new(NetSuiteCredentials::from_env()?);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.credentials.validate()?;
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
