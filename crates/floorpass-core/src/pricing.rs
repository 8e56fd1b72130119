// Client-side price breakdown for display.
//
// All arithmetic is in paise. The server's total is authoritative; this
// exists so a quote can be shown before the booking is created.

use chrono::NaiveTime;
use floorpass_api::{Booking, to_minor_units};
use serde::Serialize;

use crate::error::CoreError;

/// GST applied to every booking.
pub const TAX_RATE_PERCENT: u64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: u64,
    pub discount: u64,
    pub tax: u64,
    pub total: u64,
}

impl PriceBreakdown {
    /// Quote `hours` at `price_per_hour` rupees with a rupee `discount`.
    ///
    /// The discount is capped at the subtotal; tax is charged on what
    /// remains and rounded half up to the paisa.
    pub fn compute(price_per_hour: f64, hours: f64, discount: f64) -> Result<Self, CoreError> {
        let subtotal = rupees_to_paise(price_per_hour * hours)?;
        let discount = rupees_to_paise(discount)?;
        Ok(Self::from_paise(subtotal, discount))
    }

    pub fn from_paise(subtotal: u64, discount: u64) -> Self {
        let discount = discount.min(subtotal);
        let taxable = subtotal - discount;
        let tax = (taxable * TAX_RATE_PERCENT + 50) / 100;
        Self {
            subtotal,
            discount,
            tax,
            total: taxable + tax,
        }
    }

    /// The amounts the server stored on a booking, in paise.
    pub fn from_booking(booking: &Booking) -> Result<Self, CoreError> {
        Ok(Self {
            subtotal: rupees_to_paise(booking.base_amount)?,
            discount: rupees_to_paise(booking.discount_amount)?,
            tax: rupees_to_paise(booking.tax_amount)?,
            total: rupees_to_paise(booking.total_amount)?,
        })
    }

    pub fn total_rupees(&self) -> f64 {
        paise_to_rupees(self.total)
    }
}

/// Billable hours between two clock times, or `None` if the range is empty.
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> Option<f64> {
    let minutes = (end - start).num_minutes();
    if minutes <= 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    Some(minutes as f64 / 60.0)
}

/// `118000` → `"₹1180.00"`.
pub fn format_rupees(paise: u64) -> String {
    format!("₹{}.{:02}", paise / 100, paise % 100)
}

fn rupees_to_paise(amount: f64) -> Result<u64, CoreError> {
    to_minor_units(amount).map_err(|_| CoreError::InvalidAmount { amount })
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn paise_to_rupees(paise: u64) -> f64 {
    paise as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn two_hours_at_five_hundred() {
        let price = PriceBreakdown::compute(500.0, 2.0, 0.0).unwrap();
        assert_eq!(
            price,
            PriceBreakdown {
                subtotal: 100_000,
                discount: 0,
                tax: 18_000,
                total: 118_000,
            }
        );
        assert!((price.total_rupees() - 1180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tax_is_charged_after_discount() {
        let price = PriceBreakdown::compute(500.0, 2.0, 100.0).unwrap();
        assert_eq!(price.discount, 10_000);
        assert_eq!(price.tax, 16_200);
        assert_eq!(price.total, 106_200);
    }

    #[test]
    fn tax_rounds_half_up() {
        // 25 paise * 18% = 4.5 paise
        assert_eq!(PriceBreakdown::from_paise(25, 0).tax, 5);
        // 3 paise * 18% = 0.54 paise
        assert_eq!(PriceBreakdown::from_paise(3, 0).tax, 1);
        // 2 paise * 18% = 0.36 paise
        assert_eq!(PriceBreakdown::from_paise(2, 0).tax, 0);
    }

    #[test]
    fn discount_is_capped_at_subtotal() {
        let price = PriceBreakdown::from_paise(10_000, 50_000);
        assert_eq!(price.discount, 10_000);
        assert_eq!(price.tax, 0);
        assert_eq!(price.total, 0);
    }

    #[test]
    fn negative_rate_is_rejected() {
        assert!(matches!(
            PriceBreakdown::compute(-10.0, 2.0, 0.0),
            Err(CoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn durations_and_formatting() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(duration_hours(at(10, 0), at(12, 30)), Some(2.5));
        assert_eq!(duration_hours(at(12, 0), at(12, 0)), None);
        assert_eq!(format_rupees(118_000), "₹1180.00");
        assert_eq!(format_rupees(5), "₹0.05");
    }
}
