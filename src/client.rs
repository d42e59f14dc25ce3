//! NetSuite Client
//!
//! Signed, retried RESTlet calls returning a uniform [`CallResult`]. Typed
//! per-action methods live in [`crate::services`].

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::{cache_key, ReadCache};
use crate::core::{
    encode_query, normalize_failure, normalize_response, HttpMethod, HttpRequest, HttpTransport,
    OAuth1Signer, ReqwestHttpTransport, DEFAULT_MAX_RESPONSE_SIZE,
};
use crate::error::NetSuiteResult;
use crate::resilience::RequestExecutor;
use crate::types::{CachedResult, CallResult, NetSuiteConfig};

/// Client for one deployed RESTlet.
pub struct NetSuiteClient<T: HttpTransport = ReqwestHttpTransport> {
    config: NetSuiteConfig,
    signer: Arc<OAuth1Signer>,
    executor: RequestExecutor<T>,
    cache: ReadCache,
}

impl NetSuiteClient<ReqwestHttpTransport> {
    /// Create a client with the reqwest transport.
    pub fn new(config: NetSuiteConfig) -> NetSuiteResult<Self> {
        config.validate()?;
        let transport = ReqwestHttpTransport::with_options(config.timeout, DEFAULT_MAX_RESPONSE_SIZE)?;
        let signer = OAuth1Signer::new(config.credentials.clone());
        Ok(Self::with_components(config, transport, signer))
    }

    /// Create a client from `NETSUITE_*` environment variables.
    pub fn from_env() -> NetSuiteResult<Self> {
        Self::new(NetSuiteConfig::from_env()?)
    }
}

impl<T: HttpTransport> NetSuiteClient<T> {
    /// Create a client with custom implementations.
    pub fn with_components(config: NetSuiteConfig, transport: T, signer: OAuth1Signer) -> Self {
        let executor = RequestExecutor::new(Arc::new(transport), config.retry.clone(), config.timeout);
        let cache = ReadCache::new(config.cache_ttl);
        Self {
            config,
            signer: Arc::new(signer),
            executor,
            cache,
        }
    }

    /// Create a client with a custom transport and the default signer.
    pub fn with_transport(config: NetSuiteConfig, transport: T) -> Self {
        let signer = OAuth1Signer::new(config.credentials.clone());
        Self::with_components(config, transport, signer)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &NetSuiteConfig {
        &self.config
    }

    /// Get the read cache.
    pub fn cache(&self) -> &ReadCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn executor_transport(&self) -> &T {
        self.executor.transport()
    }

    /// Call the RESTlet.
    ///
    /// `query` is appended to the endpoint URL for every method; `payload` is
    /// sent as a JSON body only for methods that carry one, shaped by
    /// [`shape_body`].
    pub async fn call_restlet(
        &self,
        method: HttpMethod,
        payload: Option<Value>,
        query: &[(&str, &str)],
    ) -> CallResult {
        match self.try_call(method, payload, query).await {
            Ok(result) => result,
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "RESTlet call could not be made");
                CallResult::from(err)
            }
        }
    }

    async fn try_call(
        &self,
        method: HttpMethod,
        payload: Option<Value>,
        query: &[(&str, &str)],
    ) -> NetSuiteResult<CallResult> {
        let url = build_url(&self.config.credentials.restlet_url, query);

        let body = match payload {
            Some(payload) if method.carries_body() => Some(serde_json::to_string(&shape_body(payload))?),
            _ => None,
        };

        let outcome = self
            .executor
            .execute(|| {
                let mut request = HttpRequest::new(method, url.clone())
                    .header("Authorization", self.signer.authorization_header(method, &url))
                    .header("Content-Type", "application/json");
                request.body = body.clone();
                request.timeout = Some(self.config.timeout);
                request
            })
            .await;

        let result = match outcome {
            Ok(executed) => {
                let result = normalize_response(&executed.response);
                info!(
                    method = method.as_str(),
                    status = executed.response.status,
                    attempts = executed.retry.attempts,
                    success = result.success,
                    "RESTlet call completed"
                );
                result
            }
            Err(failure) => {
                warn!(
                    method = method.as_str(),
                    status = %failure.status,
                    attempts = failure.retry.attempts,
                    "RESTlet call failed"
                );
                normalize_failure(&failure)
            }
        };

        Ok(result)
    }

    /// GET an action with query parameters.
    pub async fn get_action(&self, action: &str, params: &[(&str, &str)]) -> CallResult {
        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("action", action));
        query.extend_from_slice(params);
        self.call_restlet(HttpMethod::Get, None, &query).await
    }

    /// POST an action; serializable parameters are enveloped under `data`.
    pub async fn post_action<P: serde::Serialize>(&self, action: &str, params: &P) -> CallResult {
        match action_payload(action, params) {
            Ok(payload) => self.call_restlet(HttpMethod::Post, Some(payload), &[]).await,
            Err(err) => CallResult::from(err),
        }
    }

    /// GET an action through the read cache.
    ///
    /// The cache key is the action plus its non-empty parameters.
    pub async fn get_action_cached(
        &self,
        action: &str,
        params: &[(&str, Option<String>)],
        force_refresh: bool,
    ) -> CachedResult {
        let key = cache_key(action, params);
        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();

        self.cache
            .get_or_fetch(&key, force_refresh, || self.get_action(action, &present))
            .await
    }
}

/// Append encoded query pairs to the endpoint URL.
///
/// Uses `&` when the URL already has a query string (deployed RESTlet URLs
/// carry `script` and `deploy`), otherwise `?`.
pub fn build_url(base: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, encode_query(query.iter().copied()))
}

/// Shape a POST body.
///
/// An object with a non-null `action` and no non-null `data` is wrapped as
/// `{action, data: {..rest}}`, with `data` omitted when nothing remains.
/// Everything else passes through unchanged.
pub fn shape_body(payload: Value) -> Value {
    let mut obj = match payload {
        Value::Object(obj) => obj,
        other => return other,
    };

    let has_action = obj.get("action").is_some_and(|a| !a.is_null());
    let has_data = obj.get("data").is_some_and(|d| !d.is_null());
    if !has_action || has_data {
        return Value::Object(obj);
    }

    let action = obj.remove("action").unwrap_or(Value::Null);
    obj.remove("data");

    let mut envelope = Map::new();
    envelope.insert("action".to_string(), action);
    if !obj.is_empty() {
        envelope.insert("data".to_string(), Value::Object(obj));
    }
    Value::Object(envelope)
}

/// Serialize parameters and tag them with the action name.
fn action_payload<P: serde::Serialize>(action: &str, params: &P) -> NetSuiteResult<Value> {
    let mut payload = match serde_json::to_value(params)? {
        Value::Object(obj) => obj,
        Value::Null => Map::new(),
        other => {
            let mut obj = Map::new();
            obj.insert("data".to_string(), other);
            obj
        }
    };
    payload.insert("action".to_string(), Value::String(action.to_string()));
    Ok(Value::Object(payload))
}
