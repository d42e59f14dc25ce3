//! Integration tests using WireMock
//!
//! Exercise the full client against a mock RESTlet: signing, query building,
//! POST envelopes, retry and response normalization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use netsuite_integration::*;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESTLET_PATH: &str = "/app/site/hosting/restlet.nl";
const NONCE: &str = "integration-nonce";
const TIMESTAMP: i64 = 1_700_000_000;

fn restlet_url(server: &MockServer) -> String {
    restlet_url_at(&server.uri())
}

fn restlet_url_at(base: &str) -> String {
    format!("{}{}?script=123&deploy=1", base, RESTLET_PATH)
}

fn config(server: &MockServer) -> NetSuiteConfig {
    config_at(&server.uri())
}

fn config_at(base: &str) -> NetSuiteConfig {
    netsuite_config()
        .account_id("1234567-sb1")
        .consumer("consumer-key", "consumer-secret")
        .token("token-id", "token-secret")
        .restlet_url(restlet_url_at(base))
        .timeout(Duration::from_secs(2))
        .retry(RetryConfig {
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
            ..RetryConfig::default()
        })
        .build()
        .expect("valid config")
}

fn fixed_signer(config: &NetSuiteConfig) -> OAuth1Signer {
    OAuth1Signer::with_sources(
        config.credentials.clone(),
        Arc::new(FixedNonceGenerator(NONCE.to_string())),
        Arc::new(FixedClock(TIMESTAMP)),
    )
}

fn client(config: NetSuiteConfig) -> NetSuiteClient {
    let signer = fixed_signer(&config);
    let transport = ReqwestHttpTransport::with_options(config.timeout, 1024 * 1024)
        .expect("transport");
    NetSuiteClient::with_components(config, transport, signer)
}

#[tokio::test]
async fn test_get_read_is_signed_over_full_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .and(query_param("action", "listCustomers"))
        .and(query_param("prefix", "Demo"))
        .and(query_param("script", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "customers": [{"id": 1, "name": "Demo Co"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let expected_signer = fixed_signer(&config);
    let client = client(config.clone());

    let result = client.list_customers(None).await;
    assert!(result.success);
    assert_eq!(result.data.unwrap()["customers"][0]["name"], "Demo Co");

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let signed_url = format!("{}&action=listCustomers&prefix=Demo", restlet_url(&server));
    let expected = expected_signer.sign_with(HttpMethod::Get, &signed_url, NONCE, TIMESTAMP);
    assert_eq!(authorization, expected.authorization);
    assert!(authorization.starts_with("OAuth realm=\"1234567_SB1\", "));
    assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA256\""));
}

#[tokio::test]
async fn test_post_write_sends_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "action": "createCustomer",
            "data": {"companyName": "Acme", "subsidiary": 1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"customerId": 4321}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client.create_customer(CreateCustomerParams::new("Acme")).await;

    assert!(result.success);
    assert_eq!(
        extract_id(result.data.as_ref().unwrap(), &["customerId"]),
        Some("4321".to_string())
    );
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "employees": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client.employees().await;

    assert!(result.success);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_terminal_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "SSS_INVALID_SCRIPTLET_ID", "message": "That Suitelet is invalid"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client.templates().await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("NetSuite API error: 404 - That Suitelet is invalid")
    );
    assert!(result.data.is_some());
}

#[tokio::test]
async fn test_exhausted_retries_report_last_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string(""))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client.get_info().await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("NetSuite API error: 502 - Bad Gateway")
    );
    assert!(result.data.is_none());
}

#[tokio::test]
async fn test_logical_failure_in_ok_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Customer 99 not found"
        })))
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client
        .create_project(CreateProjectParams::new("Rollout", 99))
        .await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Customer 99 not found"));
    assert_eq!(result.data.unwrap()["success"], Value::Bool(false));
}

#[tokio::test]
async fn test_non_json_body_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client(config(&server));
    let result = client.billing_types().await;

    assert!(result.success);
    assert_eq!(result.data, Some(json!({"raw": "<html>maintenance</html>"})));
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.timeout = Duration::from_millis(100);
    config.retry = RetryConfig::no_retry();
    let client = client(config);

    let result = client.unit_types().await;
    assert!(!result.success);
    assert!(result.error_message().contains("network failure"));
}

#[tokio::test]
async fn test_cached_read_hits_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .and(query_param("action", "serviceItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "items": []})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(config(&server));

    assert!(!client.cached_service_items(false).await.cached);
    assert!(client.cached_service_items(false).await.cached);
    assert!(!client.cached_service_items(true).await.cached);
}

#[tokio::test]
async fn test_push_customers_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .and(body_json(json!({
            "action": "createCustomer",
            "data": {"companyName": "Acme", "subsidiary": 1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": 11})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .and(body_json(json!({
            "action": "createCustomer",
            "data": {"companyName": "Globex", "subsidiary": 1}
        })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Duplicate"})))
        .mount(&server)
        .await;

    let client = client(config(&server));
    let report = client
        .push_customers(
            vec![
                CreateCustomerParams::new("Acme"),
                CreateCustomerParams::new("Globex"),
            ],
            2,
        )
        .await;

    assert_eq!(report.summary(), "Pushed 1 customers to NetSuite, 1 failed");
    assert_eq!(report.created[0].remote_id, "11");
    assert_eq!(report.failures[0].name, "Globex");
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// Serves one response that promises 100 bytes and hangs up after 10, then
/// well-formed replies.
async fn truncating_server(hits: Arc<AtomicUsize>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let hit = hits.fetch_add(1, Ordering::SeqCst);
            read_request_head(&mut socket).await;

            let reply = if hit == 0 {
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"success\""
                    .to_string()
            } else {
                let body = r#"{"success":true}"#;
                format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                )
            };
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_truncated_body_is_retryable_connection_failure() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = truncating_server(hits.clone()).await;

    let transport = ReqwestHttpTransport::with_options(Duration::from_secs(2), 1024).unwrap();
    let err = transport
        .send(HttpRequest::new(HttpMethod::Get, restlet_url_at(&base)))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "NETSUITE_NETWORK");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_dropped_mid_body_is_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = truncating_server(hits.clone()).await;

    let client = client(config_at(&base));
    let result = client.employees().await;

    assert!(result.success, "{:?}", result);
    assert_eq!(result.data, Some(json!({"success": true})));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
