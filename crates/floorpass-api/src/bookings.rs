// Booking endpoints
//
// Create, read and cancel. Eligibility rules (cancellation window, state
// conflicts) belong to the server; the client only rejects input that is
// structurally incomplete.

use reqwest::Method;
use tracing::{debug, info};

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{Booking, BookingQuery, CancelRequest, CreateBookingInput, Paginated};

impl CreateBookingInput {
    /// Boundary checks before anything is sent.
    pub fn validate(&self) -> Result<(), Error> {
        if self.space_id.trim().is_empty() {
            return Err(invalid("space", "a space must be selected"));
        }
        if self.end_time <= self.start_time {
            return Err(invalid("time range", "end time must be after start time"));
        }
        if self.customer_name.trim().is_empty() {
            return Err(invalid("name", "name is required"));
        }
        if !looks_like_email(&self.customer_email) {
            return Err(invalid("email", "a valid email address is required"));
        }
        let digits = self
            .customer_phone
            .chars()
            .filter(|c| !matches!(c, '+' | ' ' | '-'))
            .collect::<String>();
        if !(10..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("phone", "a 10-15 digit phone number is required"));
        }
        Ok(())
    }
}

fn looks_like_email(raw: &str) -> bool {
    match raw.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn invalid(field: &'static str, reason: &str) -> Error {
    Error::Validation {
        field,
        reason: reason.to_owned(),
    }
}

pub(crate) fn require_id<'a>(field: &'static str, id: &'a str) -> Result<&'a str, Error> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(invalid(field, "must be a non-empty identifier"));
    }
    Ok(id)
}

impl ApiClient {
    /// Submit a booking. The returned booking is `pending` until its
    /// payment is verified.
    pub async fn create_booking(&self, input: &CreateBookingInput) -> Result<Booking, Error> {
        input.validate()?;
        let booking: Booking = self
            .send_data(Method::POST, "bookings", input, &RequestOptions::default())
            .await?;
        info!(
            booking = %booking.booking_code,
            status = %booking.status,
            total = booking.total_amount,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, Error> {
        let id = require_id("booking id", id)?;
        self.get_data(&format!("bookings/{id}"), &RequestOptions::default())
            .await
    }

    /// Look up a booking by its shareable code (e.g. `FP12345678`).
    pub async fn get_booking_by_code(&self, code: &str) -> Result<Booking, Error> {
        let code = require_id("booking code", code)?.to_ascii_uppercase();
        self.get_data(&format!("bookings/code/{code}"), &RequestOptions::default())
            .await
    }

    /// The signed-in customer's bookings, newest first.
    pub async fn list_my_bookings(&self, query: &BookingQuery) -> Result<Paginated<Booking>, Error> {
        debug!(?query, "listing bookings");
        self.get_page(
            "bookings/my-bookings",
            &RequestOptions::with_query(query.to_params()),
        )
        .await
    }

    /// Ask the server to cancel a booking.
    ///
    /// Not pre-checked locally: a stale local clock or status must not
    /// block a cancellation the server would accept. The server's refusal
    /// comes back as [`Error::Api`] with its message intact.
    pub async fn cancel_booking(&self, id: &str, reason: Option<&str>) -> Result<Booking, Error> {
        let id = require_id("booking id", id)?;
        let booking: Booking = self
            .send_data(
                Method::PATCH,
                &format!("bookings/{id}/cancel"),
                &CancelRequest { reason },
                &RequestOptions::default(),
            )
            .await?;
        info!(booking = %booking.booking_code, status = %booking.status, "booking cancelled");
        Ok(booking)
    }
}
