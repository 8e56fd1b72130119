// ── Staff check-in desk ──
//
// Holds the server's list of today's bookings, filters it locally as staff
// type, and pushes check-in / check-out / no-show to the server. The list
// is only ever updated from booking objects the server returns.

use std::sync::Arc;

use floorpass_api::{ApiClient, Booking, BookingStatus};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::lifecycle::{BookingLifecycle, StaffAction, observe_transition};

/// What a desk search resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult<'a> {
    /// Blank query, or nothing matched.
    NotFound,
    /// Exactly one booking matched; select it.
    Selected(&'a Booking),
    /// Several matched; staff must pick one.
    Ambiguous(Vec<&'a Booking>),
}

/// Case-insensitive substring match over booking code, guest name and email.
pub fn search<'a>(bookings: &'a [Booking], query: &str) -> ScanResult<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return ScanResult::NotFound;
    }

    let mut hits: Vec<&Booking> = bookings.iter().filter(|b| is_match(b, &needle)).collect();
    match hits.len() {
        0 => ScanResult::NotFound,
        1 => ScanResult::Selected(hits.remove(0)),
        _ => ScanResult::Ambiguous(hits),
    }
}

fn is_match(booking: &Booking, needle: &str) -> bool {
    [
        booking.booking_code.as_str(),
        booking.customer_name.as_str(),
        booking.customer_email.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Headcount for the desk header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeskSummary {
    pub total: usize,
    pub awaiting_arrival: usize,
    pub checked_in: usize,
    pub checked_out: usize,
    pub no_show: usize,
}

impl DeskSummary {
    pub fn tally(bookings: &[Booking]) -> Self {
        bookings.iter().fold(
            Self {
                total: bookings.len(),
                ..Self::default()
            },
            |mut acc, b| {
                match b.status {
                    BookingStatus::Confirmed => acc.awaiting_arrival += 1,
                    BookingStatus::CheckedIn => acc.checked_in += 1,
                    BookingStatus::CheckedOut => acc.checked_out += 1,
                    BookingStatus::NoShow => acc.no_show += 1,
                    _ => {}
                }
                acc
            },
        )
    }
}

pub struct StaffDesk {
    client: Arc<ApiClient>,
    bookings: Vec<Booking>,
}

impl StaffDesk {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            bookings: Vec::new(),
        }
    }

    /// Replace the local list with the server's view of today.
    pub async fn load_today(&mut self) -> Result<&[Booking], CoreError> {
        self.bookings = self.client.todays_bookings().await?;
        debug!(count = self.bookings.len(), "loaded today's bookings");
        Ok(&self.bookings)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn search(&self, query: &str) -> ScanResult<'_> {
        search(&self.bookings, query)
    }

    pub fn summary(&self) -> DeskSummary {
        DeskSummary::tally(&self.bookings)
    }

    /// Actions offered for a booking in the local list.
    pub fn actions_for(&self, booking_id: &str) -> &'static [StaffAction] {
        self.find(booking_id)
            .map_or(&[], |b| b.status.staff_actions())
    }

    pub async fn check_in(&mut self, booking_id: &str) -> Result<&Booking, CoreError> {
        self.perform(booking_id, StaffAction::CheckIn).await
    }

    pub async fn check_out(&mut self, booking_id: &str) -> Result<&Booking, CoreError> {
        self.perform(booking_id, StaffAction::CheckOut).await
    }

    pub async fn mark_no_show(&mut self, booking_id: &str) -> Result<&Booking, CoreError> {
        self.perform(booking_id, StaffAction::NoShow).await
    }

    /// Gate `action` on the booking's local status, send it, and replace
    /// the local entry with the server's answer.
    ///
    /// A refused action (locally or by the server) leaves the list as it was.
    pub async fn perform(
        &mut self,
        booking_id: &str,
        action: StaffAction,
    ) -> Result<&Booking, CoreError> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or_else(|| CoreError::BookingNotFound {
                query: booking_id.to_owned(),
            })?;

        let status = self.bookings[index].status;
        if !action.permitted_for(status) {
            return Err(CoreError::ActionNotPermitted { action, status });
        }

        let updated = action.apply(&self.client, booking_id).await?;
        observe_transition(&self.bookings[index], &updated);
        info!(
            booking = %updated.booking_code,
            %action,
            status = %updated.status,
            "desk action recorded"
        );
        self.bookings[index] = updated;
        Ok(&self.bookings[index])
    }

    fn find(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }
}
