//! Booking flows on top of `floorpass-api`.
//!
//! - **[`CheckoutOrchestrator`]**: create booking → create order → payment
//!   gateway → server verification, with observable progress and retry
//!   that reuses the pending booking. The gateway is injected through
//!   [`PaymentGateway`].
//!
//! - **[`StaffDesk`]**: today's bookings, local search by code / name /
//!   email, and status-gated check-in, check-out and no-show.
//!
//! - **Lifecycle** ([`BookingLifecycle`]): the booking status graph and
//!   the staff actions each status allows.
//!
//! - **[`PriceBreakdown`]**: a display quote in paise with 18% tax.

pub mod checkout;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pricing;
pub mod scanner;

pub use checkout::{
    CheckoutOrchestrator, CheckoutOutcome, CheckoutState, CheckoutStep, GatewayOutcome,
    GatewayRequest, PaymentGateway,
};
pub use config::{ClientConfig, DEFAULT_CURRENCY};
pub use error::CoreError;
pub use lifecycle::{BookingLifecycle, StaffAction};
pub use pricing::{PriceBreakdown, TAX_RATE_PERCENT, duration_hours, format_rupees};
pub use scanner::{DeskSummary, ScanResult, StaffDesk};
