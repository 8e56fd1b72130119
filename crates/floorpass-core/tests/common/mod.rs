// Shared fixtures for the core flow tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use floorpass_api::{ApiClient, MemoryTokenStore, RetryPolicy, TokenPair};
use floorpass_core::ClientConfig;

pub fn api_path(suffix: &str) -> String {
    format!("/api/v1/{suffix}")
}

pub async fn setup() -> (MockServer, Arc<ApiClient>, ClientConfig) {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(Url::parse(&format!("{}/api/v1", server.uri())).unwrap());
    config.retry = RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(5),
    };
    config.gateway_key_id = Some("rzp_test_key".into());

    let tokens = Arc::new(MemoryTokenStore::with_tokens(TokenPair::new(
        "access-1",
        "refresh-1",
    )));
    let client = config.build_client(tokens, None).unwrap();
    (server, Arc::new(client), config)
}

pub fn envelope(data: Value) -> Value {
    json!({ "data": data, "success": true })
}

pub fn booking_json(id: &str, code: &str, status: &str) -> Value {
    json!({
        "id": id,
        "bookingCode": code,
        "spaceId": "space-1",
        "spaceName": "Loft 4B",
        "customerName": "Asha Rao",
        "customerEmail": "asha@example.com",
        "customerPhone": "+919876543210",
        "date": "2026-10-20",
        "startTime": "10:00",
        "endTime": "12:00",
        "duration": 2,
        "baseAmount": 847.46,
        "discountAmount": 0,
        "taxAmount": 152.54,
        "totalAmount": 1000.0,
        "paymentStatus": if status == "pending" { "pending" } else { "paid" },
        "status": status
    })
}

pub fn error_body(status: u16, error: &str, message: &str, path: &str) -> Value {
    json!({
        "statusCode": status,
        "message": message,
        "error": error,
        "timestamp": "2026-10-20T09:00:00.000Z",
        "path": path
    })
}
