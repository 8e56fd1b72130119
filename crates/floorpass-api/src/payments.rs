// Payment order and verification endpoints
//
// Orders are created in the smallest currency unit. Verification is the
// only path that confirms a booking: the gateway's client-side success
// callback is forwarded here, never trusted on its own.

use reqwest::Method;
use tracing::info;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{
    CreateOrderRequest, GatewayCallback, PaymentOrder, PaymentVerification, VerifyPaymentRequest,
};
use crate::retry::with_retry;

/// Largest rupee amount that still converts to a `u64` paise value exactly.
const MAX_CONVERTIBLE: f64 = 9.0e13;

/// Convert a displayed amount (e.g. rupees) into minor units (paise).
///
/// `1000.00` becomes `100000`. The value is rounded to the nearest unit so
/// binary float drift never shifts the amount by a paisa.
pub fn to_minor_units(amount: f64) -> Result<u64, Error> {
    if !amount.is_finite() || amount < 0.0 || amount > MAX_CONVERTIBLE {
        return Err(Error::Validation {
            field: "amount",
            reason: format!("{amount} is not a payable amount"),
        });
    }
    let minor = (amount * 100.0).round();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    Ok(minor as u64)
}

impl ApiClient {
    /// Create a gateway order for a pending booking.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<PaymentOrder, Error> {
        if request.amount == 0 {
            return Err(Error::Validation {
                field: "amount",
                reason: "order amount must be greater than zero".into(),
            });
        }
        let order: PaymentOrder = self
            .send_data(
                Method::POST,
                "payments/create-order",
                request,
                &RequestOptions::default(),
            )
            .await?;
        info!(
            order = %order.order_id,
            booking = %order.booking_id,
            amount = order.amount,
            currency = %order.currency,
            "payment order created"
        );
        Ok(order)
    }

    /// Submit the gateway callback for server-side signature verification.
    ///
    /// The server treats `(order, payment, signature)` idempotently, so this
    /// call is retried on transient failures like a read.
    pub async fn verify_payment(
        &self,
        callback: &GatewayCallback,
        booking_id: &str,
    ) -> Result<PaymentVerification, Error> {
        let body = VerifyPaymentRequest {
            callback,
            booking_id,
        };
        let options = RequestOptions::default();
        let verification: PaymentVerification = with_retry(self.retry_policy(), || {
            self.send_data(Method::POST, "payments/verify", &body, &options)
        })
        .await?;
        info!(
            order = %callback.razorpay_order_id,
            verified = verification.verified,
            status = %verification.booking.status,
            "payment verification returned"
        );
        Ok(verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_rupees_become_paise() {
        assert_eq!(to_minor_units(1000.00).unwrap(), 100_000);
        assert_eq!(to_minor_units(1.0).unwrap(), 100);
        assert_eq!(to_minor_units(0.0).unwrap(), 0);
    }

    #[test]
    fn float_drift_is_rounded_away() {
        assert_eq!(to_minor_units(1179.99).unwrap(), 117_999);
        assert_eq!(to_minor_units(0.1 + 0.2).unwrap(), 30);
    }

    #[test]
    fn non_payable_amounts_are_rejected() {
        for amount in [f64::NAN, f64::INFINITY, -1.0, 1.0e15] {
            assert!(
                matches!(to_minor_units(amount), Err(Error::Validation { field: "amount", .. })),
                "{amount} should be rejected"
            );
        }
    }
}
