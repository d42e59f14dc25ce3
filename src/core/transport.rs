//! HTTP Transport
//!
//! The seam between the retry executor and the network. Everything above it
//! works with [`HttpRequest`]/[`HttpResponse`] values, so tests swap in
//! [`MockHttpTransport`] and never open a socket.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{NetSuiteError, NetworkError, ProtocolError};

/// Default cap on a RESTlet response body.
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// One outbound RESTlet request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full URL, including the deployment's `script`/`deploy` query.
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Serialized JSON body, for methods that carry one.
    pub body: Option<String>,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Methods a RESTlet deployment can expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a JSON body is sent with this method.
    pub fn carries_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A completed exchange, whatever its status.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase, empty for unknown codes.
    pub status_text: String,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    /// Body as text; invalid UTF-8 is replaced.
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

/// HTTP transport interface (for dependency injection).
///
/// Implementations report any received response as `Ok`, including 4xx and
/// 5xx; only failures to complete the exchange are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetSuiteError>;
}

/// reqwest-backed transport over rustls.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Duration,
    max_response_size: usize,
}

impl ReqwestHttpTransport {
    pub fn new() -> Result<Self, NetSuiteError> {
        Self::with_options(
            Duration::from_secs(crate::types::DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_RESPONSE_SIZE,
        )
    }

    pub fn with_options(timeout: Duration, max_response_size: usize) -> Result<Self, NetSuiteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
            max_response_size,
        })
    }

    fn too_large(&self, size: usize) -> NetSuiteError {
        ProtocolError::InvalidResponse {
            message: format!(
                "response body of {} bytes exceeds limit of {}",
                size, self.max_response_size
            ),
        }
        .into()
    }
}

/// Any failure to complete the exchange, including a connection dropped
/// while the body is read, is a connection failure and so retryable.
fn send_error(err: reqwest::Error, timeout: Duration) -> NetSuiteError {
    if err.is_timeout() {
        NetworkError::Timeout { timeout }.into()
    } else {
        NetworkError::ConnectionFailed {
            message: err.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetSuiteError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| send_error(e, timeout))?;

        if let Some(len) = response.content_length() {
            if len as usize > self.max_response_size {
                return Err(self.too_large(len as usize));
            }
        }

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        let bytes = response.bytes().await.map_err(|e| send_error(e, timeout))?;
        if bytes.len() > self.max_response_size {
            return Err(self.too_large(bytes.len()));
        }

        Ok(HttpResponse {
            status,
            status_text: reason_phrase(status),
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Scripted reply for [`MockHttpTransport`].
#[derive(Debug)]
enum MockReply {
    Response(HttpResponse),
    ConnectionError(String),
}

/// Mock HTTP transport for testing. Replies are served in the order queued,
/// then the default response if one is set.
#[derive(Default)]
pub struct MockHttpTransport {
    replies: Mutex<VecDeque<MockReply>>,
    request_history: Mutex<Vec<HttpRequest>>,
    default_response: Mutex<Option<HttpResponse>>,
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Response(response));
        self
    }

    /// Queue a JSON response with a `content-type` header.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        let body = serde_json::to_string(body).unwrap_or_default();
        let mut response = HttpResponse::new(status, body);
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        self.queue_response(response)
    }

    /// Queue a failure to connect.
    pub fn queue_connection_error(&self, message: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::ConnectionError(message.into()));
        self
    }

    /// Reply used once the queue is empty.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *self.default_response.lock().unwrap() = Some(response);
        self
    }

    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    pub fn get_last_request(&self) -> Option<HttpRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.request_history.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetSuiteError> {
        self.request_history.lock().unwrap().push(request);

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::ConnectionError(message)) => {
                Err(NetworkError::ConnectionFailed { message }.into())
            }
            None => self.default_response.lock().unwrap().clone().ok_or_else(|| {
                NetworkError::ConnectionFailed {
                    message: "no mock reply queued".to_string(),
                }
                .into()
            }),
        }
    }
}
