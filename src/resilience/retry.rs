//! Retry Logic
//!
//! Per-attempt timeout, outcome classification and exponential backoff for
//! RESTlet calls. The executor knows nothing about request bodies.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{HttpRequest, HttpResponse, HttpTransport};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Jitter factor (0.0-1.0).
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        DEFAULT_RETRY_CONFIG
    }
}

/// Default retry configuration.
pub const DEFAULT_RETRY_CONFIG: RetryConfig = RetryConfig {
    max_retries: 2,
    initial_backoff: Duration::from_secs(1),
    max_backoff: Duration::from_secs(4),
    multiplier: 2.0,
    jitter: 0.0,
};

impl RetryConfig {
    /// Configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let base_delay =
            self.initial_backoff.as_millis() as f64 * self.multiplier.powi(retry as i32);
        let capped_delay = base_delay.min(self.max_backoff.as_millis() as f64);

        let jitter_range = capped_delay * self.jitter;
        let jitter = if jitter_range > 0.0 {
            (rand::random::<f64>() - 0.5) * 2.0 * jitter_range
        } else {
            0.0
        };

        Duration::from_millis((capped_delay + jitter).max(0.0) as u64)
    }
}

/// Status observed for one attempt.
///
/// `NetworkFailure` stands in for timeouts, refused connections and aborts.
/// It is not an HTTP code and is never reported as one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStatus {
    Http(u16),
    NetworkFailure,
}

impl ResponseStatus {
    /// The real HTTP status, if one was received.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            Self::Http(code) => Some(*code),
            Self::NetworkFailure => None,
        }
    }

    pub fn classify(&self) -> OutcomeClass {
        match self {
            Self::Http(code) if (200..300).contains(code) => OutcomeClass::Success,
            Self::Http(429) => OutcomeClass::Transient,
            Self::Http(code) if (500..600).contains(code) => OutcomeClass::Transient,
            Self::Http(_) => OutcomeClass::Terminal,
            Self::NetworkFailure => OutcomeClass::Transient,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::NetworkFailure => write!(f, "network failure"),
        }
    }
}

/// How an attempt's outcome affects the retry loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeClass {
    Success,
    Transient,
    Terminal,
}

/// Bookkeeping for one logical call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Attempts made so far.
    pub attempts: u32,
    /// Attempts allowed.
    pub max_attempts: u32,
    /// Total time spent sleeping between attempts.
    pub elapsed_backoff: Duration,
    /// Each delay taken, in order.
    pub delays: Vec<Duration>,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    fn record_backoff(&mut self, delay: Duration) {
        self.elapsed_backoff += delay;
        self.delays.push(delay);
    }
}

/// A 2xx response together with the retry history that produced it.
#[derive(Clone, Debug)]
pub struct Executed {
    pub response: HttpResponse,
    pub retry: RetryState,
}

/// Terminal or exhausted failure.
#[derive(Clone, Debug)]
pub struct ExecutionFailure {
    /// Last observed status.
    pub status: ResponseStatus,
    /// Status text or transport error message.
    pub message: String,
    /// Last response body; empty for network failures.
    pub body: String,
    pub retry: RetryState,
}

enum AttemptFailure {
    Response(HttpResponse),
    Network { message: String, retryable: bool },
}

impl AttemptFailure {
    fn is_transient(&self) -> bool {
        match self {
            Self::Response(response) => {
                ResponseStatus::Http(response.status).classify() == OutcomeClass::Transient
            }
            Self::Network { retryable, .. } => *retryable,
        }
    }

    fn status(&self) -> ResponseStatus {
        match self {
            Self::Response(response) => ResponseStatus::Http(response.status),
            Self::Network { .. } => ResponseStatus::NetworkFailure,
        }
    }

    fn into_failure(self, retry: RetryState) -> ExecutionFailure {
        match self {
            Self::Response(response) => ExecutionFailure {
                status: ResponseStatus::Http(response.status),
                message: response.status_text,
                body: response.body,
                retry,
            },
            Self::Network { message, .. } => ExecutionFailure {
                status: ResponseStatus::NetworkFailure,
                message,
                body: String::new(),
                retry,
            },
        }
    }
}

/// Signed-HTTP-call-with-retry primitive.
pub struct RequestExecutor<T: HttpTransport> {
    transport: Arc<T>,
    config: RetryConfig,
    timeout: Duration,
}

impl<T: HttpTransport> RequestExecutor<T> {
    /// Create new executor.
    pub fn new(transport: Arc<T>, config: RetryConfig, timeout: Duration) -> Self {
        Self {
            transport,
            config,
            timeout,
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Execute a request, building it afresh for every attempt.
    ///
    /// Rebuilding lets each attempt carry its own nonce and timestamp.
    pub async fn execute<F>(&self, build_request: F) -> Result<Executed, ExecutionFailure>
    where
        F: Fn() -> HttpRequest,
    {
        let mut state = RetryState::new(self.config.max_attempts());

        loop {
            state.attempts += 1;
            let request = build_request();
            debug!(
                method = request.method.as_str(),
                attempt = state.attempts,
                max_attempts = state.max_attempts,
                "Sending RESTlet request"
            );

            let failure = match self.attempt(request).await {
                Ok(response) if response.is_success() => {
                    debug!(status = response.status, attempt = state.attempts, "RESTlet request succeeded");
                    return Ok(Executed {
                        response,
                        retry: state,
                    });
                }
                Ok(response) => AttemptFailure::Response(response),
                Err(failure) => failure,
            };

            if !failure.is_transient() {
                debug!(status = %failure.status(), "Terminal RESTlet failure, not retrying");
                return Err(failure.into_failure(state));
            }

            if state.exhausted() {
                warn!(
                    status = %failure.status(),
                    attempts = state.attempts,
                    "RESTlet retries exhausted"
                );
                return Err(failure.into_failure(state));
            }

            let delay = self.config.backoff_for(state.attempts - 1);
            warn!(
                status = %failure.status(),
                attempt = state.attempts,
                delay_ms = delay.as_millis() as u64,
                "Transient RESTlet failure, backing off"
            );
            tokio::time::sleep(delay).await;
            state.record_backoff(delay);
        }
    }

    /// Execute a prebuilt request; retries resend it unchanged.
    pub async fn execute_request(
        &self,
        request: HttpRequest,
    ) -> Result<Executed, ExecutionFailure> {
        self.execute(|| request.clone()).await
    }

    async fn attempt(&self, request: HttpRequest) -> Result<HttpResponse, AttemptFailure> {
        with_timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|(message, retryable)| AttemptFailure::Network { message, retryable })
    }
}

async fn with_timeout<Fut>(timeout: Duration, send: Fut) -> Result<HttpResponse, (String, bool)>
where
    Fut: Future<Output = Result<HttpResponse, crate::error::NetSuiteError>>,
{
    match tokio::time::timeout(timeout, send).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(err)) => Err((err.to_string(), err.is_retryable())),
        Err(_) => Err((format!("Request timeout after {:?}", timeout), true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpMethod, MockHttpTransport};
    use crate::error::NetSuiteError;
    use async_trait::async_trait;
    use tokio::time::Instant;

    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "elapsed {:?}, expected about {:?}",
            elapsed,
            expected
        );
    }

    fn request() -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, "https://example.com/restlet.nl?script=1&deploy=1")
    }

    fn executor(transport: Arc<MockHttpTransport>) -> RequestExecutor<MockHttpTransport> {
        RequestExecutor::new(transport, RetryConfig::default(), Duration::from_secs(15))
    }

    struct HangingTransport;

    #[async_trait]
    impl HttpTransport for HangingTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, NetSuiteError> {
            futures::future::pending().await
        }
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.backoff_for(0), Duration::from_secs(1));
        assert_eq!(config.backoff_for(1), Duration::from_secs(2));
        assert_eq!(config.backoff_for(2), Duration::from_secs(4));
        assert_eq!(config.backoff_for(5), Duration::from_secs(4));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let config = RetryConfig {
            jitter: 0.1,
            ..RetryConfig::default()
        };
        for _ in 0..50 {
            let delay = config.backoff_for(0);
            assert!(delay >= Duration::from_millis(900) && delay <= Duration::from_millis(1100));
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(ResponseStatus::Http(200).classify(), OutcomeClass::Success);
        assert_eq!(ResponseStatus::Http(204).classify(), OutcomeClass::Success);
        assert_eq!(ResponseStatus::Http(429).classify(), OutcomeClass::Transient);
        assert_eq!(ResponseStatus::Http(502).classify(), OutcomeClass::Transient);
        assert_eq!(ResponseStatus::Http(400).classify(), OutcomeClass::Terminal);
        assert_eq!(ResponseStatus::Http(404).classify(), OutcomeClass::Terminal);
        assert_eq!(ResponseStatus::Http(302).classify(), OutcomeClass::Terminal);
        assert_eq!(ResponseStatus::NetworkFailure.classify(), OutcomeClass::Transient);
        assert_eq!(ResponseStatus::NetworkFailure.http_code(), None);
        assert_eq!(ResponseStatus::NetworkFailure.to_string(), "network failure");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(503, "busy"));
        transport.queue_response(HttpResponse::new(503, "busy"));
        transport.queue_response(HttpResponse::new(200, r#"{"success":true}"#));

        let start = Instant::now();
        let executed = executor(transport.clone()).execute_request(request()).await.unwrap();

        assert_eq!(executed.response.status, 200);
        assert_eq!(transport.request_count(), 3);
        assert_eq!(executed.retry.attempts, 3);
        assert_eq!(
            executed.retry.delays,
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(executed.retry.elapsed_backoff, Duration::from_secs(3));
        assert_elapsed(start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_not_retried() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(404, "missing"));
        transport.set_default_response(HttpResponse::new(200, "{}"));

        let failure = executor(transport.clone())
            .execute_request(request())
            .await
            .unwrap_err();

        assert_eq!(transport.request_count(), 1);
        assert_eq!(failure.status, ResponseStatus::Http(404));
        assert_eq!(failure.body, "missing");
        assert!(failure.retry.delays.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_last_status_without_trailing_delay() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(500, "first"));
        transport.queue_response(HttpResponse::new(502, "second"));
        transport.queue_response(HttpResponse::new(429, "third"));

        let start = Instant::now();
        let failure = executor(transport.clone())
            .execute_request(request())
            .await
            .unwrap_err();

        assert_eq!(transport.request_count(), 3);
        assert_eq!(failure.status, ResponseStatus::Http(429));
        assert_eq!(failure.body, "third");
        assert_eq!(failure.retry.delays.len(), 2);
        assert_elapsed(start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_is_retried() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_connection_error("connection refused");
        transport.queue_response(HttpResponse::new(200, "{}"));

        let executed = executor(transport.clone()).execute_request(request()).await.unwrap();
        assert_eq!(executed.retry.attempts, 2);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_transport_times_out() {
        let executor = RequestExecutor::new(
            Arc::new(HangingTransport),
            RetryConfig::no_retry(),
            Duration::from_secs(15),
        );

        let start = Instant::now();
        let failure = executor.execute_request(request()).await.unwrap_err();

        assert_eq!(failure.status, ResponseStatus::NetworkFailure);
        assert!(failure.message.contains("timeout"));
        assert_elapsed(start, Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_follow_retry_policy() {
        let executor = RequestExecutor::new(
            Arc::new(HangingTransport),
            RetryConfig::default(),
            Duration::from_secs(15),
        );

        let start = Instant::now();
        let failure = executor.execute_request(request()).await.unwrap_err();

        assert_eq!(failure.retry.attempts, 3);
        assert_elapsed(start, Duration::from_secs(15 * 3 + 1 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_rebuilt_per_attempt() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse::new(503, ""));
        transport.queue_response(HttpResponse::new(200, "{}"));

        let counter = std::sync::atomic::AtomicU32::new(0);
        executor(transport.clone())
            .execute(|| {
                let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                request().header("Authorization", format!("attempt-{}", n))
            })
            .await
            .unwrap();

        let sent = transport.get_requests();
        assert_eq!(sent[0].headers["Authorization"], "attempt-0");
        assert_eq!(sent[1].headers["Authorization"], "attempt-1");
    }
}
