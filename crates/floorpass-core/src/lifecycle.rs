// ── Booking lifecycle ──
//
//   pending ──► confirmed ──► checked_in ──► checked_out
//      │            │  │
//      │            │  └──► no_show
//      └──► cancelled ◄┘
//                   └──► refunded
//
// The server owns every transition. This module only answers "is this
// move on the graph" and "what may staff do now", so local views can gate
// buttons and flag server answers that look wrong.

use floorpass_api::{ApiClient, Booking, BookingStatus};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::warn;

/// Lifecycle queries on [`BookingStatus`].
pub trait BookingLifecycle: Copy {
    /// Whether `next` is a legal successor of `self`. Staying put is not a
    /// transition.
    fn can_transition_to(self, next: BookingStatus) -> bool;

    /// No further transitions are possible.
    fn is_terminal(self) -> bool;

    /// Staff actions available at the desk for a booking in this status.
    fn staff_actions(self) -> &'static [StaffAction];
}

impl BookingLifecycle for BookingStatus {
    fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::{Cancelled, CheckedIn, CheckedOut, Confirmed, NoShow, Pending, Refunded};

        matches!(
            (self, next),
            (Pending, Confirmed | Cancelled)
                | (Confirmed, CheckedIn | NoShow | Cancelled | Refunded)
                | (CheckedIn, CheckedOut)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CheckedOut | Self::NoShow | Self::Cancelled | Self::Refunded
        )
    }

    fn staff_actions(self) -> &'static [StaffAction] {
        match self {
            Self::Confirmed => &[StaffAction::CheckIn, StaffAction::NoShow],
            Self::CheckedIn => &[StaffAction::CheckOut],
            Self::Pending
            | Self::CheckedOut
            | Self::NoShow
            | Self::Cancelled
            | Self::Refunded => &[],
        }
    }
}

/// A state change recorded by staff at the venue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum StaffAction {
    #[strum(serialize = "check in")]
    CheckIn,
    #[strum(serialize = "check out")]
    CheckOut,
    #[strum(serialize = "mark as no-show")]
    NoShow,
}

impl StaffAction {
    /// The status a booking lands in when the server accepts the action.
    pub fn target_status(self) -> BookingStatus {
        match self {
            Self::CheckIn => BookingStatus::CheckedIn,
            Self::CheckOut => BookingStatus::CheckedOut,
            Self::NoShow => BookingStatus::NoShow,
        }
    }

    pub fn permitted_for(self, status: BookingStatus) -> bool {
        status.staff_actions().contains(&self)
    }

    /// Send the action to the server and return the booking it answers with.
    pub(crate) async fn apply(
        self,
        client: &ApiClient,
        booking_id: &str,
    ) -> Result<Booking, floorpass_api::Error> {
        match self {
            Self::CheckIn => client.check_in_guest(booking_id).await,
            Self::CheckOut => client.check_out_guest(booking_id).await,
            Self::NoShow => client.mark_no_show(booking_id).await,
        }
    }
}

/// Record that `updated` replaces `previous`.
///
/// The server's value always wins. A move that is off the graph is logged
/// so a misbehaving backend is visible, never corrected.
pub(crate) fn observe_transition(previous: &Booking, updated: &Booking) {
    if previous.status != updated.status && !previous.status.can_transition_to(updated.status) {
        warn!(
            booking = %updated.booking_code,
            from = %previous.status,
            to = %updated.status,
            "server reported an unexpected status transition"
        );
    }
}
