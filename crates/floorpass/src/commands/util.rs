//! Shared helpers for command handlers.

use chrono::{NaiveDate, NaiveTime};
use floorpass_api::{Booking, BookingStatus};
use tabled::Tabled;

use crate::cli::StatusFilter;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, CliError> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, "%H:%M:%S"))
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("expected HH:MM, got '{raw}'"),
        })
}

impl From<StatusFilter> for BookingStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Pending => Self::Pending,
            StatusFilter::Confirmed => Self::Confirmed,
            StatusFilter::CheckedIn => Self::CheckedIn,
            StatusFilter::CheckedOut => Self::CheckedOut,
            StatusFilter::Cancelled => Self::Cancelled,
            StatusFilter::NoShow => Self::NoShow,
            StatusFilter::Refunded => Self::Refunded,
        }
    }
}

// ── Booking rendering ───────────────────────────────────────────────

#[derive(Tabled)]
pub struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Space")]
    space: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl BookingRow {
    pub fn new(b: &Booking, color: bool) -> Self {
        Self {
            id: b.id.clone(),
            code: b.booking_code.clone(),
            space: b.space_name.clone().unwrap_or_else(|| b.space_id.clone()),
            date: b.date.to_string(),
            time: time_range(b),
            guest: b.customer_name.clone(),
            status: output::status_label(b.status, color),
            payment: b.payment_status.to_string(),
            total: format!("₹{:.2}", b.total_amount),
        }
    }
}

fn time_range(b: &Booking) -> String {
    format!("{}-{}", b.start_time.format("%H:%M"), b.end_time.format("%H:%M"))
}

/// Key/value view of one booking.
pub fn booking_detail(b: &Booking, color: bool) -> String {
    output::detail_block(&[
        ("ID", b.id.clone()),
        ("Code", b.booking_code.clone()),
        (
            "Space",
            b.space_name.clone().unwrap_or_else(|| b.space_id.clone()),
        ),
        ("Date", b.date.to_string()),
        ("Time", time_range(b)),
        ("Hours", format!("{}", b.duration)),
        (
            "Guest",
            format!("{} <{}>", b.customer_name, b.customer_email),
        ),
        ("Phone", b.customer_phone.clone().unwrap_or_default()),
        ("Status", output::status_label(b.status, color)),
        ("Payment", b.payment_status.to_string()),
        ("Subtotal", format!("₹{:.2}", b.base_amount)),
        ("Discount", format!("₹{:.2}", b.discount_amount)),
        ("Tax", format!("₹{:.2}", b.tax_amount)),
        ("Total", format!("₹{:.2}", b.total_amount)),
        ("Promo", b.promo_code.clone().unwrap_or_default()),
        (
            "Cancelled",
            b.cancellation_reason.clone().unwrap_or_default(),
        ),
        (
            "Checked in",
            b.checked_in_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
        (
            "Checked out",
            b.checked_out_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
    ])
}
