// Staff endpoints
//
// Check-in, check-out and no-show are time-gated to the booking's date by
// the server. Each call returns the full updated booking so callers can
// re-render from it instead of guessing the next status.

use reqwest::Method;
use tracing::info;

use crate::bookings::require_id;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::Booking;

impl ApiClient {
    /// Bookings scheduled for "today", as the server defines it.
    pub async fn todays_bookings(&self) -> Result<Vec<Booking>, Error> {
        self.get_data("staff/bookings/today", &RequestOptions::default())
            .await
    }

    pub async fn check_in_guest(&self, booking_id: &str) -> Result<Booking, Error> {
        self.staff_transition(booking_id, "check-in").await
    }

    pub async fn check_out_guest(&self, booking_id: &str) -> Result<Booking, Error> {
        self.staff_transition(booking_id, "check-out").await
    }

    pub async fn mark_no_show(&self, booking_id: &str) -> Result<Booking, Error> {
        self.staff_transition(booking_id, "no-show").await
    }

    async fn staff_transition(&self, booking_id: &str, action: &str) -> Result<Booking, Error> {
        let id = require_id("booking id", booking_id)?;
        let booking: Booking = self
            .send_data(
                Method::PATCH,
                &format!("staff/bookings/{id}/{action}"),
                &serde_json::json!({}),
                &RequestOptions::default(),
            )
            .await?;
        info!(booking = %booking.booking_code, action, status = %booking.status, "staff action recorded");
        Ok(booking)
    }
}
