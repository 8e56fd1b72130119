#![allow(clippy::unwrap_used)]
// Staff desk against a mock booking service.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_path, booking_json, envelope, error_body, setup};
use floorpass_api::BookingStatus;
use floorpass_core::{CoreError, ScanResult, StaffAction, StaffDesk};

async fn mount_today(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api_path("staff/bookings/today")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            booking_json("b-1", "ABC123", "confirmed"),
            booking_json("b-2", "FP55501234", "checked_in"),
            booking_json("b-3", "FP55509876", "checked_out"),
            booking_json("b-4", "FP55507777", "no_show")
        ]))))
        .mount(server)
        .await;
}

async fn desk() -> (MockServer, StaffDesk) {
    let (server, client, _) = setup().await;
    mount_today(&server).await;
    let mut desk = StaffDesk::new(client);
    desk.load_today().await.unwrap();
    (server, desk)
}

#[tokio::test]
async fn test_scan_then_check_in_updates_list() {
    let (server, mut desk) = desk().await;
    Mock::given(method("PATCH"))
        .and(path(api_path("staff/bookings/b-1/check-in")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(booking_json("b-1", "ABC123", "checked_in"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ScanResult::Selected(hit) = desk.search("abc123") else {
        panic!("expected ABC123 to be selected");
    };
    assert_eq!(hit.status, BookingStatus::Confirmed);
    assert_eq!(
        desk.actions_for("b-1"),
        &[StaffAction::CheckIn, StaffAction::NoShow]
    );

    let updated = desk.check_in("b-1").await.unwrap();
    assert_eq!(updated.status, BookingStatus::CheckedIn);
    assert_eq!(desk.actions_for("b-1"), &[StaffAction::CheckOut]);
    assert_eq!(desk.summary().checked_in, 2);
}

#[tokio::test]
async fn test_unknown_code_selects_nothing() {
    let (_server, desk) = desk().await;
    assert_eq!(desk.search("ZZZNOPE"), ScanResult::NotFound);
}

#[tokio::test]
async fn test_finished_bookings_offer_no_actions() {
    let (server, mut desk) = desk().await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/api/v1/staff/bookings/.+"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(desk.actions_for("b-3").is_empty());
    assert!(desk.actions_for("b-4").is_empty());

    let err = desk.check_out("b-3").await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::ActionNotPermitted {
            action: StaffAction::CheckOut,
            status: BookingStatus::CheckedOut
        }
    ));
    let err = desk.check_in("b-4").await.unwrap_err();
    assert!(err.is_conflict());

    // Confirmed guests cannot be checked out before they arrive.
    let err = desk.check_out("b-1").await.unwrap_err();
    assert!(matches!(err, CoreError::ActionNotPermitted { .. }));
}

#[tokio::test]
async fn test_server_refusal_leaves_list_untouched() {
    let (server, mut desk) = desk().await;
    Mock::given(method("PATCH"))
        .and(path(api_path("staff/bookings/b-1/no-show")))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Bad Request",
            "Cannot mark as no-show before the booking start time",
            "/api/v1/staff/bookings/b-1/no-show",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let before = desk.bookings().to_vec();
    let err = desk.mark_no_show("b-1").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot mark as no-show before the booking start time"
    );
    assert_eq!(desk.bookings(), before.as_slice());
}

#[tokio::test]
async fn test_booking_outside_todays_list_is_not_found() {
    let (_server, mut desk) = desk().await;
    let err = desk.check_in("b-99").await.unwrap_err();
    assert!(err.is_not_found());
}
