/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for straddle-adapter tests

use serde_json::{Value, json};
use straddle_adapter::{ClientConfig, StraddleClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server with the given retry budget
pub fn test_client(server: &MockServer, max_retries: u32) -> StraddleClient {
    let config = ClientConfig::new("sk_test_key").with_max_retries(max_retries);
    StraddleClient::with_base_url(config, &server.uri()).expect("client should build")
}

pub fn customer_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Ada Lovelace",
        "type": "individual",
        "email": "ada@example.com",
        "phone": "+12125550123",
        "status": "pending",
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-01T12:00:00Z"
    })
}

/// Single-object envelope
pub fn object_response(data: Value) -> Value {
    json!({
        "meta": { "api_request_id": "req-1", "api_request_timestamp": "2024-03-01T12:00:00Z" },
        "response_type": "object",
        "data": data
    })
}

/// Validation error body in the API's error format
#[allow(dead_code)]
pub fn error_response(status: u16, title: &str, detail: &str) -> Value {
    json!({
        "error": {
            "status": status,
            "title": title,
            "type": "validation_error",
            "detail": detail,
            "items": [{ "reference": "email", "detail": "is invalid" }]
        },
        "response_type": "error"
    })
}
