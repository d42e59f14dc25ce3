//! Response Normalization
//!
//! Folds HTTP-level and RESTlet-level outcomes into one [`CallResult`].

use serde_json::{json, Map, Value};

use crate::core::HttpResponse;
use crate::resilience::ExecutionFailure;
use crate::types::CallResult;

/// Key under which a non-JSON body is wrapped.
pub const RAW_BODY_FIELD: &str = "raw";

/// Parse a response body, wrapping non-JSON text as `{"raw": text}`.
///
/// An empty body parses as `{}`.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ RAW_BODY_FIELD: text }))
}

/// The RESTlet's own verdict, if the body carries an explicit boolean.
pub fn body_success(body: &Value) -> Option<bool> {
    body.get("success").and_then(Value::as_bool)
}

/// Error message reported inside a body.
pub fn body_error(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| match body.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Object(inner)) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
}

/// Normalize a 2xx response.
pub fn normalize_response(response: &HttpResponse) -> CallResult {
    let data = parse_body(&response.body);

    match body_success(&data) {
        Some(false) => {
            let error = body_error(&data).unwrap_or_else(|| "RESTlet reported failure".to_string());
            CallResult {
                success: false,
                data: Some(data),
                error: Some(error),
            }
        }
        _ => CallResult::ok(data),
    }
}

/// Normalize a terminal or exhausted failure.
///
/// The message reads `NetSuite API error: <status> - <detail>`, where detail
/// is the body's own error, else the raw body, else the status text.
pub fn normalize_failure(failure: &ExecutionFailure) -> CallResult {
    let data = (!failure.body.trim().is_empty()).then(|| parse_body(&failure.body));

    let detail = data
        .as_ref()
        .and_then(body_error)
        .or_else(|| (!failure.body.trim().is_empty()).then(|| failure.body.clone()))
        .or_else(|| (!failure.message.is_empty()).then(|| failure.message.clone()))
        .unwrap_or_else(|| "Unknown".to_string());

    CallResult {
        success: false,
        data,
        error: Some(format!("NetSuite API error: {} - {}", failure.status, detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::{ResponseStatus, RetryState};

    fn failure(status: ResponseStatus, message: &str, body: &str) -> ExecutionFailure {
        ExecutionFailure {
            status,
            message: message.to_string(),
            body: body.to_string(),
            retry: RetryState::default(),
        }
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), json!({}));
        assert_eq!(parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body("[1,2]"), json!([1, 2]));
        assert_eq!(parse_body("<html>oops</html>"), json!({"raw": "<html>oops</html>"}));
    }

    #[test]
    fn test_logical_failure_in_200() {
        let result = normalize_response(&HttpResponse::new(200, r#"{"success":false,"error":"X"}"#));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("X"));
        assert_eq!(result.data, Some(json!({"success": false, "error": "X"})));
    }

    #[test]
    fn test_success_defaults_true() {
        let result = normalize_response(&HttpResponse::new(200, r#"{"customers":[]}"#));
        assert!(result.success);
        assert_eq!(result.error, None);

        let result = normalize_response(&HttpResponse::new(200, r#"{"success":true,"customerId":5}"#));
        assert!(result.success);
        assert_eq!(result.data.unwrap()["customerId"], 5);
    }

    #[test]
    fn test_non_boolean_success_does_not_govern() {
        let result = normalize_response(&HttpResponse::new(200, r#"{"success":"no"}"#));
        assert!(result.success);
    }

    #[test]
    fn test_raw_text_body_is_success() {
        let result = normalize_response(&HttpResponse::new(200, "OK"));
        assert!(result.success);
        assert_eq!(result.data, Some(json!({"raw": "OK"})));
    }

    #[test]
    fn test_error_object_message() {
        let body = json!({"success": false, "error": {"code": "INVALID_FLD", "message": "bad field"}});
        assert_eq!(body_error(&body).as_deref(), Some("bad field"));
    }

    #[test]
    fn test_failure_message_from_body_error() {
        let result = normalize_failure(&failure(
            ResponseStatus::Http(400),
            "Bad Request",
            r#"{"error":"Missing action"}"#,
        ));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("NetSuite API error: 400 - Missing action")
        );
    }

    #[test]
    fn test_failure_message_from_raw_body_and_status_text() {
        let result = normalize_failure(&failure(ResponseStatus::Http(503), "Service Unavailable", "down"));
        assert_eq!(result.error.as_deref(), Some("NetSuite API error: 503 - down"));

        let result = normalize_failure(&failure(ResponseStatus::Http(404), "Not Found", ""));
        assert_eq!(result.error.as_deref(), Some("NetSuite API error: 404 - Not Found"));
        assert_eq!(result.data, None);
    }

    #[test]
    fn test_network_failure_has_no_numeric_status() {
        let result = normalize_failure(&failure(
            ResponseStatus::NetworkFailure,
            "Request timeout after 15s",
            "",
        ));
        assert_eq!(
            result.error.as_deref(),
            Some("NetSuite API error: network failure - Request timeout after 15s")
        );
    }
}
