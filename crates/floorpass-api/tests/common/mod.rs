// Shared fixtures for the wiremock-backed client tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

use floorpass_api::{ApiClient, MemoryTokenStore, RetryPolicy, TokenPair, TokenStore};

pub const API_PREFIX: &str = "/api/v1";

pub fn api_path(suffix: &str) -> String {
    format!("{API_PREFIX}/{suffix}")
}

/// Fast backoff so retry tests don't sleep for seconds.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
    }
}

pub async fn setup_with_store(store: Arc<MemoryTokenStore>) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        &format!("{}{API_PREFIX}", server.uri()),
        store as Arc<dyn TokenStore>,
    )
    .unwrap()
    .with_retry_policy(fast_retry());
    (server, client)
}

/// A client already holding `access-1` / `refresh-1`.
pub async fn setup() -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair::new(
        "access-1",
        "refresh-1",
    )));
    let (server, client) = setup_with_store(Arc::clone(&store)).await;
    (server, client, store)
}

pub fn envelope(data: Value) -> Value {
    json!({
        "data": data,
        "success": true,
        "message": "OK",
        "timestamp": "2026-10-20T09:00:00.000Z"
    })
}

pub fn booking_json(id: &str, code: &str, status: &str) -> Value {
    json!({
        "id": id,
        "bookingCode": code,
        "spaceId": "space-1",
        "spaceName": "Loft 4B",
        "customerId": "user-1",
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
        "status": status,
        "createdAt": "2026-10-19T08:00:00Z"
    })
}

pub fn error_body(status: u16, error: &str, message: Value, path: &str) -> Value {
    json!({
        "statusCode": status,
        "message": message,
        "error": error,
        "timestamp": "2026-10-20T09:00:00.000Z",
        "path": path
    })
}
