// ── Checkout orchestration ──
//
// create booking (pending) → create order → gateway → verify → confirmed
//
// Steps run strictly in sequence. The observable state is a `watch`
// channel so a front end can render progress without polling. A booking
// created by a failed or dismissed attempt is kept and paid for on the
// next attempt instead of being created again.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use floorpass_api::{
    ApiClient, Booking, BookingStatus, CreateBookingInput, CreateOrderRequest, CustomerDetails,
    GatewayCallback, PaymentOrder, to_minor_units,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::lifecycle::observe_transition;

// ── Gateway seam ─────────────────────────────────────────────────────

/// Everything the gateway needs to open its payment sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub key_id: Option<String>,
    pub order_id: String,
    /// Smallest currency unit.
    pub amount: u64,
    pub currency: String,
    pub booking_code: String,
    pub description: String,
    pub prefill: CustomerDetails,
}

/// How the payment sheet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The gateway reports a captured payment. Not trusted until verified.
    Success(GatewayCallback),
    /// Declined, errored, or the gateway itself could not be loaded.
    Failed { code: String, description: String },
    /// The customer closed the sheet without paying.
    Dismissed,
}

/// The external payment gateway.
pub trait PaymentGateway: Send + Sync {
    fn collect(&self, request: &GatewayRequest) -> impl Future<Output = GatewayOutcome> + Send;
}

impl<G: PaymentGateway> PaymentGateway for Arc<G> {
    fn collect(&self, request: &GatewayRequest) -> impl Future<Output = GatewayOutcome> + Send {
        (**self).collect(request)
    }
}

// ── Observable state ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "title_case")]
pub enum CheckoutStep {
    CreatingBooking,
    CreatingOrder,
    AwaitingPayment,
    VerifyingPayment,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Processing {
        step: CheckoutStep,
    },
    Success {
        booking: Box<Booking>,
    },
    Failed {
        message: String,
    },
}

impl CheckoutState {
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }
}

/// The result of a checkout that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Payment verified; the booking is the server's confirmed copy.
    Confirmed(Booking),
    /// The customer closed the gateway. The booking is still pending and
    /// will be reused by the next attempt.
    Dismissed(Booking),
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Drives one booking from form submission to a verified payment.
///
/// One orchestrator per booking attempt: the pending booking it creates is
/// remembered so retries pay for the same booking.
pub struct CheckoutOrchestrator<G> {
    client: Arc<ApiClient>,
    gateway: G,
    currency: String,
    gateway_key_id: Option<String>,
    state: watch::Sender<CheckoutState>,
    pending: Mutex<Option<Booking>>,
}

impl<G: PaymentGateway> CheckoutOrchestrator<G> {
    pub fn new(client: Arc<ApiClient>, gateway: G, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            client,
            gateway,
            currency: config.currency.clone(),
            gateway_key_id: config.gateway_key_id.clone(),
            state,
            pending: Mutex::new(None),
        }
    }

    /// Pay for a booking that already exists (e.g. created earlier and
    /// left pending).
    pub fn for_pending_booking(
        client: Arc<ApiClient>,
        gateway: G,
        config: &ClientConfig,
        booking: Booking,
    ) -> Result<Self, CoreError> {
        if booking.status != BookingStatus::Pending {
            return Err(CoreError::ValidationFailed {
                field: "booking",
                reason: format!(
                    "{} is {}, only pending bookings can be paid",
                    booking.booking_code, booking.status
                ),
            });
        }
        let orchestrator = Self::new(client, gateway, config);
        *orchestrator.pending_slot() = Some(booking);
        Ok(orchestrator)
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// The booking awaiting payment, if one has been created.
    pub fn pending_booking(&self) -> Option<Booking> {
        self.pending_slot().clone()
    }

    /// Return a failed checkout to `Idle`. Returns `false` in any other state.
    pub fn dismiss_failure(&self) -> bool {
        self.state.send_if_modified(|state| {
            if matches!(state, CheckoutState::Failed { .. }) {
                *state = CheckoutState::Idle;
                true
            } else {
                false
            }
        })
    }

    /// Run the whole checkout.
    ///
    /// Rejected while another run is processing or after a success. On
    /// error the state is `Failed` with the most specific message
    /// available; on dismissal it is back to `Idle`.
    pub async fn checkout(&self, input: &CreateBookingInput) -> Result<CheckoutOutcome, CoreError> {
        let first = if self.pending_slot().is_some() {
            CheckoutStep::CreatingOrder
        } else {
            CheckoutStep::CreatingBooking
        };
        self.begin(first)?;
        let result = self.run(input).await;
        self.finish(result)
    }

    /// Run the payment half for the remembered pending booking.
    pub async fn pay(&self) -> Result<CheckoutOutcome, CoreError> {
        self.begin(CheckoutStep::CreatingOrder)?;
        let result = match self.pending_booking() {
            Some(booking) => self.pay_for(booking).await,
            None => Err(CoreError::ValidationFailed {
                field: "booking",
                reason: "no pending booking to pay for".into(),
            }),
        };
        self.finish(result)
    }

    // ── Steps ────────────────────────────────────────────────────────

    /// Claim the orchestrator, publishing `first` as the opening step.
    fn begin(&self, first: CheckoutStep) -> Result<(), CoreError> {
        let mut rejection = None;
        self.state.send_if_modified(|state| match state {
            CheckoutState::Processing { .. } => {
                rejection = Some(CoreError::CheckoutInProgress);
                false
            }
            CheckoutState::Success { .. } => {
                rejection = Some(CoreError::CheckoutAlreadyCompleted);
                false
            }
            CheckoutState::Idle | CheckoutState::Failed { .. } => {
                *state = CheckoutState::Processing { step: first };
                true
            }
        });
        rejection.map_or(Ok(()), Err)
    }

    async fn run(&self, input: &CreateBookingInput) -> Result<CheckoutOutcome, CoreError> {
        let booking = match self.pending_booking() {
            Some(existing) => {
                debug!(booking = %existing.booking_code, "reusing pending booking");
                existing
            }
            None => {
                let created = self.client.create_booking(input).await?;
                *self.pending_slot() = Some(created.clone());
                created
            }
        };
        self.pay_for(booking).await
    }

    async fn pay_for(&self, booking: Booking) -> Result<CheckoutOutcome, CoreError> {
        self.step(CheckoutStep::CreatingOrder);
        let order = self.create_order(&booking).await?;

        self.step(CheckoutStep::AwaitingPayment);
        let request = self.gateway_request(&booking, &order);
        let callback = match self.gateway.collect(&request).await {
            GatewayOutcome::Success(callback) => callback,
            GatewayOutcome::Failed { code, description } => {
                warn!(booking = %booking.booking_code, code = %code, "payment gateway reported failure");
                return Err(CoreError::PaymentFailed {
                    code,
                    message: description,
                });
            }
            GatewayOutcome::Dismissed => {
                info!(booking = %booking.booking_code, "payment dismissed, booking left pending");
                return Ok(CheckoutOutcome::Dismissed(booking));
            }
        };

        self.step(CheckoutStep::VerifyingPayment);
        let verification = self
            .client
            .verify_payment(&callback, &booking.id)
            .await
            .map_err(verification_error)?;
        if !verification.verified {
            return Err(CoreError::VerificationFailed {
                message: verification
                    .message
                    .unwrap_or_else(|| "the payment signature was not accepted".into()),
            });
        }

        let confirmed = verification.booking;
        observe_transition(&booking, &confirmed);
        if confirmed.status != BookingStatus::Confirmed {
            warn!(
                booking = %confirmed.booking_code,
                status = %confirmed.status,
                "verified payment did not confirm booking"
            );
            return Err(CoreError::VerificationFailed {
                message: format!(
                    "payment accepted but booking {} is still {}",
                    confirmed.booking_code, confirmed.status
                ),
            });
        }
        info!(booking = %confirmed.booking_code, "booking confirmed");
        *self.pending_slot() = None;
        Ok(CheckoutOutcome::Confirmed(confirmed))
    }

    /// A new order every attempt; it supersedes whatever an earlier,
    /// failed attempt created.
    async fn create_order(&self, booking: &Booking) -> Result<PaymentOrder, CoreError> {
        let amount = to_minor_units(booking.total_amount).map_err(|_| CoreError::InvalidAmount {
            amount: booking.total_amount,
        })?;
        let request = CreateOrderRequest {
            booking_id: booking.id.clone(),
            amount,
            currency: self.currency.clone(),
            customer_details: customer_details(booking),
        };
        Ok(self.client.create_order(&request).await?)
    }

    fn gateway_request(&self, booking: &Booking, order: &PaymentOrder) -> GatewayRequest {
        GatewayRequest {
            key_id: order.key_id.clone().or_else(|| self.gateway_key_id.clone()),
            order_id: order.order_id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            booking_code: booking.booking_code.clone(),
            description: format!(
                "{} on {}",
                booking.space_name.as_deref().unwrap_or("Space booking"),
                booking.date
            ),
            prefill: customer_details(booking),
        }
    }

    fn finish(
        &self,
        result: Result<CheckoutOutcome, CoreError>,
    ) -> Result<CheckoutOutcome, CoreError> {
        let next = match &result {
            Ok(CheckoutOutcome::Confirmed(booking)) => CheckoutState::Success {
                booking: Box::new(booking.clone()),
            },
            Ok(CheckoutOutcome::Dismissed(_)) => CheckoutState::Idle,
            Err(e) => CheckoutState::Failed {
                message: e.user_message(),
            },
        };
        self.state.send_replace(next);
        result
    }

    fn step(&self, step: CheckoutStep) {
        debug!(%step, "checkout step");
        let next = CheckoutState::Processing { step };
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<Booking>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The server's answer about the payment is a verification failure;
/// session, network and local errors keep their own meaning.
fn verification_error(err: floorpass_api::Error) -> CoreError {
    match err {
        floorpass_api::Error::Api(resp) if resp.status_code != 401 && resp.status_code != 403 => {
            let message = if resp.message.trim().is_empty() {
                "the payment signature was not accepted".to_owned()
            } else {
                resp.message
            };
            CoreError::VerificationFailed { message }
        }
        other => CoreError::from(other),
    }
}

fn customer_details(booking: &Booking) -> CustomerDetails {
    CustomerDetails {
        name: booking.customer_name.clone(),
        email: booking.customer_email.clone(),
        contact: booking.customer_phone.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_render_for_humans() {
        assert_eq!(CheckoutStep::AwaitingPayment.to_string(), "Awaiting Payment");
    }

    #[test]
    fn only_processing_counts_as_busy() {
        assert!(
            CheckoutState::Processing {
                step: CheckoutStep::CreatingOrder
            }
            .is_processing()
        );
        assert!(!CheckoutState::Idle.is_processing());
        assert!(
            !CheckoutState::Failed {
                message: "x".into()
            }
            .is_processing()
        );
    }
}
