//! Configuration Builder
//!
//! Fluent builder for NetSuite client configuration.

use std::time::Duration;

use crate::error::{ConfigurationError, NetSuiteError};
use crate::resilience::RetryConfig;
use crate::types::{NetSuiteConfig, NetSuiteCredentials, DEFAULT_CACHE_TTL_SECS, DEFAULT_TIMEOUT_SECS};

/// NetSuite configuration builder.
#[derive(Default)]
pub struct NetSuiteConfigBuilder {
    account_id: Option<String>,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    token_id: Option<String>,
    token_secret: Option<String>,
    restlet_url: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    cache_ttl: Duration,
}

impl NetSuiteConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            ..Default::default()
        }
    }

    /// Set account ID.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Set consumer key and secret from the integration record.
    pub fn consumer(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Set access token ID and secret.
    pub fn token(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.token_id = Some(id.into());
        self.token_secret = Some(secret.into());
        self
    }

    /// Set deployed RESTlet URL.
    pub fn restlet_url(mut self, url: impl Into<String>) -> Self {
        self.restlet_url = Some(url.into());
        self
    }

    /// Set per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set maximum retries, keeping the rest of the policy.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Set read cache time-to-live.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Start from existing credentials.
    pub fn from_credentials(mut self, credentials: NetSuiteCredentials) -> Self {
        use secrecy::ExposeSecret;
        self.account_id = Some(credentials.account_id);
        self.consumer_key = Some(credentials.consumer_key);
        self.consumer_secret = Some(credentials.consumer_secret.expose_secret().to_string());
        self.token_id = Some(credentials.token_id);
        self.token_secret = Some(credentials.token_secret.expose_secret().to_string());
        self.restlet_url = Some(credentials.restlet_url);
        self
    }

    /// Build the NetSuite configuration.
    pub fn build(self) -> Result<NetSuiteConfig, NetSuiteError> {
        let credentials = NetSuiteCredentials::new(
            required(self.account_id, "account_id")?,
            required(self.consumer_key, "consumer_key")?,
            required(self.consumer_secret, "consumer_secret")?,
            required(self.token_id, "token_id")?,
            required(self.token_secret, "token_secret")?,
            required(self.restlet_url, "restlet_url")?,
        );

        let config = NetSuiteConfig {
            credentials,
            timeout: self.timeout,
            retry: self.retry,
            cache_ttl: self.cache_ttl,
        };
        config.validate()?;
        Ok(config)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, NetSuiteError> {
    value.ok_or_else(|| {
        NetSuiteError::Configuration(ConfigurationError::MissingRequired {
            field: field.to_string(),
        })
    })
}

/// Create a new NetSuite configuration builder.
pub fn netsuite_config() -> NetSuiteConfigBuilder {
    NetSuiteConfigBuilder::new()
}
