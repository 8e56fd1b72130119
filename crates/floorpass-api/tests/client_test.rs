#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` request handling using wiremock.

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{api_path, booking_json, envelope, error_body, setup, setup_with_store};
use floorpass_api::{
    ApiClient, BookingQuery, BookingStatus, CreateBookingInput, Error, MemoryTokenStore,
    RetryPolicy, TokenPair, TokenStore, TokenStoreError,
};

fn booking_input() -> CreateBookingInput {
    CreateBookingInput {
        space_id: "space-1".into(),
        date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        customer_name: "Asha Rao".into(),
        customer_email: "asha@example.com".into(),
        customer_phone: "+919876543210".into(),
        promo_code: None,
        notes: None,
    }
}

// ── Envelopes & auth header ─────────────────────────────────────────

#[tokio::test]
async fn test_get_booking_unwraps_envelope_and_sends_bearer() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/b-1")))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "FP12345678", "confirmed"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = client.get_booking("b-1").await.unwrap();
    assert_eq!(booking.booking_code, "FP12345678");
    assert_eq!(booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_booking_code_lookup_is_uppercased() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/code/FP12345678")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "FP12345678", "confirmed"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = client.get_booking_by_code("fp12345678").await.unwrap();
    assert_eq!(booking.id, "b-1");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_an_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("spaces/space-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "space-1", "name": "Loft 4B", "pricePerHour": 500.0 },
            "success": false,
            "message": "Space is not available"
        })))
        .mount(&server)
        .await;

    let err = client.get_space("space-1").await.unwrap_err();
    assert_eq!(err.to_string(), "Space is not available");
    assert_eq!(err.status_code(), 400);
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_conflict_body_is_preserved() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("bookings")))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body(
            409,
            "Conflict",
            json!("Time slot is no longer available"),
            "/api/v1/bookings",
        )))
        .mount(&server)
        .await;

    let err = client.create_booking(&booking_input()).await.unwrap_err();
    let Error::Api(resp) = &err else {
        panic!("expected Api error, got: {err:?}");
    };
    assert_eq!(resp.status_code, 409);
    assert_eq!(resp.error, "Conflict");
    assert_eq!(resp.message, "Time slot is no longer available");
    assert_eq!(resp.path, "/api/v1/bookings");
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_validation_message_array_is_joined() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("bookings")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Bad Request",
            json!(["date must be in the future", "spaceId must be a UUID"]),
            "/api/v1/bookings",
        )))
        .mount(&server)
        .await;

    let err = client.create_booking(&booking_input()).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.to_string(),
        "date must be in the future; spaceId must be a UUID"
    );
}

#[tokio::test]
async fn test_non_json_error_is_synthesized() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/b-1")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client.with_retry_policy(RetryPolicy::none());
    let err = client.get_booking("b-1").await.unwrap_err();
    let resp = err.to_error_response("/bookings/b-1");
    assert_eq!(resp.status_code, 502);
    assert_eq!(resp.error, "Bad Gateway");
    assert_eq!(resp.path, "/api/v1/bookings/b-1");
    assert!(!resp.timestamp.is_empty());
}

#[tokio::test]
async fn test_network_failure_has_status_zero() {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9/api/v1", store)
        .unwrap()
        .with_retry_policy(RetryPolicy::none());

    let err = client.get_booking("b-1").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(err.status_code(), 0);

    let resp = err.to_error_response("/bookings/b-1");
    assert_eq!(resp.status_code, 0);
    assert_eq!(resp.error, "Network Error");
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_is_retried_after_server_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/b-1")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("bookings/b-1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "FP12345678", "confirmed"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = client.get_booking("b-1").await.unwrap();
    assert_eq!(booking.id, "b-1");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "Not Found",
            json!("Booking not found"),
            "/api/v1/bookings/missing",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_booking("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_booking_is_not_retried() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("bookings")))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "Internal Server Error",
            json!("Internal server error"),
            "/api/v1/bookings",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.create_booking(&booking_input()).await.unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_invalid_booking_input_never_reaches_server() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("bookings")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut input = booking_input();
    input.customer_email = "not-an-email".into();
    let err = client.create_booking(&input).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "email", .. }));
}

// ── Bookings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_booking_sends_camel_case_body() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("bookings")))
        .and(body_partial_json(json!({
            "spaceId": "space-1",
            "date": "2026-10-20",
            "startTime": "10:00",
            "endTime": "12:00",
            "customerEmail": "asha@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope(booking_json("b-1", "FP12345678", "pending"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = client.create_booking(&booking_input()).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_cancel_refusal_keeps_server_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(api_path("bookings/b-1/cancel")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Bad Request",
            json!("Bookings can only be cancelled up to 24 hours before the start time"),
            "/api/v1/bookings/b-1/cancel",
        )))
        .mount(&server)
        .await;

    let err = client
        .cancel_booking("b-1", Some("plans changed"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Bookings can only be cancelled up to 24 hours before the start time"
    );
}

#[tokio::test]
async fn test_cancel_returns_updated_booking() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(api_path("bookings/b-1/cancel")))
        .and(body_partial_json(json!({ "reason": "plans changed" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "FP12345678", "cancelled"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = client
        .cancel_booking("b-1", Some("plans changed"))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_list_bookings_sends_query_and_reads_pagination() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("bookings/my-bookings")))
        .and(query_param("page", "2"))
        .and(query_param("status", "confirmed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                booking_json("b-3", "FP00000003", "confirmed"),
                booking_json("b-4", "FP00000004", "confirmed")
            ],
            "pagination": { "page": 2, "limit": 2, "total": 5, "totalPages": 3 },
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_my_bookings(&BookingQuery {
            page: Some(2),
            limit: None,
            status: Some(BookingStatus::Confirmed),
        })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert!(page.has_next_page());
}

// ── Staff ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_todays_bookings_and_check_in() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("staff/bookings/today")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            booking_json("b-1", "ABC123", "confirmed"),
            booking_json("b-2", "XYZ789", "checked_in")
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(api_path("staff/bookings/b-1/check-in")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "ABC123", "checked_in"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let today = client.todays_bookings().await.unwrap();
    assert_eq!(today.len(), 2);

    let updated = client.check_in_guest("b-1").await.unwrap();
    assert_eq!(updated.status, BookingStatus::CheckedIn);
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_tokens() {
    let store = Arc::new(MemoryTokenStore::new());
    let (server, client) = setup_with_store(Arc::clone(&store)).await;

    Mock::given(method("POST"))
        .and(path(api_path("auth/login")))
        .and(body_partial_json(json!({ "email": "staff@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": "access-new",
            "refreshToken": "refresh-new",
            "user": {
                "id": "user-9",
                "email": "staff@example.com",
                "name": "Front Desk",
                "role": "staff"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let password = SecretString::from("hunter2".to_owned());
    let user = client.login("staff@example.com", &password).await.unwrap();
    assert!(user.role.is_staff());

    let tokens = store.get().unwrap();
    assert_eq!(tokens.access_token.expose_secret(), "access-new");
    assert_eq!(tokens.refresh_token.expose_secret(), "refresh-new");
}

#[tokio::test]
async fn test_failed_login_does_not_refresh() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("auth/login")))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            401,
            "Unauthorized",
            json!("Invalid credentials"),
            "/api/v1/auth/login",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("auth/refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let password = SecretString::from("wrong".to_owned());
    let err = client.login("staff@example.com", &password).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.status_code(), 401);
}

/// A store whose writes always fail, like a locked keyring.
struct LockedStore;

impl TokenStore for LockedStore {
    fn get(&self) -> Option<TokenPair> {
        None
    }

    fn set(&self, _tokens: &TokenPair) -> Result<(), TokenStoreError> {
        Err(TokenStoreError("keyring is locked".into()))
    }

    fn clear(&self) {}
}

#[tokio::test]
async fn test_login_fails_when_tokens_cannot_be_saved() {
    let server = wiremock::MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        &format!("{}/api/v1", server.uri()),
        Arc::new(LockedStore) as Arc<dyn TokenStore>,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path(api_path("auth/login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": "access-new",
            "refreshToken": "refresh-new",
            "user": {
                "id": "user-9",
                "email": "staff@example.com",
                "name": "Front Desk",
                "role": "staff"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let password = SecretString::from("hunter2".to_owned());
    let err = client.login("staff@example.com", &password).await.unwrap_err();
    assert!(matches!(err, Error::TokenStore(_)), "got: {err:?}");
    assert_eq!(err.to_string(), "cannot save session: keyring is locked");
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_server_fails() {
    let (server, client, store) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("auth/logout")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await;
    assert!(store.get().is_none());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_current_user_requires_tokens() {
    let store = Arc::new(MemoryTokenStore::new());
    let (_server, client) = setup_with_store(store).await;

    let err = client.current_user().await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
}

// ── Promo codes ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_promo_code_is_an_answer_not_an_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("promo-codes/validate")))
        .and(body_partial_json(json!({
            "code": "WELCOME10",
            "amount": 1000.0,
            "spaceId": "space-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "valid": false,
            "message": "Promo code has expired"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .validate_promo_code(" WELCOME10 ", 1000.0, Some("space-1"))
        .await
        .unwrap();
    assert!(!result.valid);
    assert!(result.discount_amount.abs() < f64::EPSILON);
    assert_eq!(result.message.as_deref(), Some("Promo code has expired"));
}

#[tokio::test]
async fn test_blank_promo_code_is_rejected_locally() {
    let (server, client, _) = setup().await;

    let err = client.validate_promo_code("   ", 1000.0, None).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "promo code", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
