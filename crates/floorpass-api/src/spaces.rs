// Space lookup and promo code validation.

use reqwest::Method;

use crate::bookings::require_id;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{PromoCodeRequest, PromoValidation, Space};

impl ApiClient {
    pub async fn get_space(&self, id: &str) -> Result<Space, Error> {
        let id = require_id("space id", id)?;
        self.get_data(&format!("spaces/{id}"), &RequestOptions::default())
            .await
    }

    /// Check a promo code against a booking subtotal (rupees).
    ///
    /// An unknown or expired code is a normal answer (`valid: false`),
    /// not an error.
    pub async fn validate_promo_code(
        &self,
        code: &str,
        amount: f64,
        space_id: Option<&str>,
    ) -> Result<PromoValidation, Error> {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::Validation {
                field: "promo code",
                reason: "code is empty".into(),
            });
        }
        self.send_data(
            Method::POST,
            "promo-codes/validate",
            &PromoCodeRequest {
                code,
                amount,
                space_id,
            },
            &RequestOptions::default(),
        )
        .await
    }
}
