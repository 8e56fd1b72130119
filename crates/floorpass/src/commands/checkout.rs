//! Checkout: create a booking, collect payment in the terminal, verify.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use dialoguer::{Input, Select};
use floorpass_api::{Booking, CreateBookingInput, GatewayCallback};
use floorpass_core::{
    CheckoutOrchestrator, CheckoutOutcome, CheckoutState, CheckoutStep, GatewayOutcome,
    GatewayRequest, PaymentGateway, format_rupees,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cli::{BookingForm, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Terminal gateway ────────────────────────────────────────────────

/// Collects the gateway callback by prompting in the terminal.
///
/// Payment happens out of band (the gateway's hosted page, a test card);
/// the operator pastes back the ids it returns. Closing the prompt, or
/// leaving the payment id blank, counts as dismissal.
pub struct TerminalGateway;

impl PaymentGateway for TerminalGateway {
    fn collect(&self, request: &GatewayRequest) -> impl Future<Output = GatewayOutcome> + Send {
        let request = request.clone();
        async move {
            if !std::io::stdin().is_terminal() {
                return GatewayOutcome::Failed {
                    code: "NO_TERMINAL".into(),
                    description: "collecting a payment needs an interactive terminal".into(),
                };
            }
            match tokio::task::spawn_blocking(move || prompt_for_payment(&request)).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => GatewayOutcome::Failed {
                    code: "PROMPT_FAILED".into(),
                    description: e.to_string(),
                },
                Err(e) => GatewayOutcome::Failed {
                    code: "GATEWAY_CRASHED".into(),
                    description: format!("payment prompt stopped unexpectedly: {e}"),
                },
            }
        }
    }
}

fn prompt_for_payment(request: &GatewayRequest) -> Result<GatewayOutcome, dialoguer::Error> {
    eprintln!();
    eprintln!("  {}", request.description);
    eprintln!("  Amount:  {} {}", format_rupees(request.amount), request.currency);
    eprintln!("  Order:   {}", request.order_id);
    if let Some(key) = &request.key_id {
        eprintln!("  Key:     {key}");
    }
    eprintln!(
        "  Prefill: {} <{}> {}",
        request.prefill.name, request.prefill.email, request.prefill.contact
    );
    eprintln!();

    let choices = [
        "Enter the payment details returned by the gateway",
        "The payment failed",
        "Close without paying",
    ];
    let choice = Select::new()
        .with_prompt("Payment")
        .items(&choices)
        .default(0)
        .interact_opt()?;

    match choice {
        Some(0) => {
            let payment_id: String = Input::new()
                .with_prompt("Payment id (blank to close)")
                .allow_empty(true)
                .interact_text()?;
            if payment_id.trim().is_empty() {
                return Ok(GatewayOutcome::Dismissed);
            }
            let signature: String = Input::new().with_prompt("Signature").interact_text()?;
            let order_id: String = Input::new()
                .with_prompt("Order id")
                .default(request.order_id.clone())
                .interact_text()?;
            Ok(GatewayOutcome::Success(GatewayCallback {
                razorpay_order_id: order_id.trim().to_owned(),
                razorpay_payment_id: payment_id.trim().to_owned(),
                razorpay_signature: signature.trim().to_owned(),
            }))
        }
        Some(1) => {
            let description: String = Input::new()
                .with_prompt("Reason shown by the gateway")
                .default("Payment declined".into())
                .interact_text()?;
            Ok(GatewayOutcome::Failed {
                code: "PAYMENT_FAILED".into(),
                description,
            })
        }
        _ => Ok(GatewayOutcome::Dismissed),
    }
}

// ── Progress ────────────────────────────────────────────────────────

/// Drive `work` while mirroring the checkout state on a spinner.
///
/// The spinner is hidden while the payment prompt is up.
async fn with_progress<G, F, T>(checkout: &CheckoutOrchestrator<G>, quiet: bool, work: F) -> T
where
    G: PaymentGateway,
    F: Future<Output = T>,
{
    let mut states = checkout.subscribe();
    let mut spinner: Option<ProgressBar> = None;
    tokio::pin!(work);

    let result = loop {
        tokio::select! {
            result = &mut work => break result,
            changed = states.changed() => {
                if changed.is_err() {
                    break (&mut work).await;
                }
                let state = states.borrow_and_update().clone();
                debug!(?state, "checkout state");
                if !quiet {
                    show_state(&mut spinner, &state);
                }
            }
        }
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result
}

fn show_state(spinner: &mut Option<ProgressBar>, state: &CheckoutState) {
    match state {
        CheckoutState::Processing {
            step: CheckoutStep::AwaitingPayment,
        }
        | CheckoutState::Idle
        | CheckoutState::Success { .. }
        | CheckoutState::Failed { .. } => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
        CheckoutState::Processing { step } => {
            let pb = spinner.get_or_insert_with(|| {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    pb.set_style(style);
                }
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            });
            pb.set_message(format!("{step}..."));
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// Turn the form into a booking request, prompting for missing guest details.
pub fn booking_input(form: &BookingForm, session: &Session) -> Result<CreateBookingInput, CliError> {
    let name = match &form.name {
        Some(name) => name.clone(),
        None => Input::new()
            .with_prompt("Guest name")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let email = match form.email.as_ref().or(session.profile.email.as_ref()) {
        Some(email) => email.clone(),
        None => Input::new()
            .with_prompt("Guest email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let phone = match &form.phone {
        Some(phone) => phone.clone(),
        None => Input::new()
            .with_prompt("Guest phone")
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    Ok(CreateBookingInput {
        space_id: form.space.trim().to_owned(),
        date: util::parse_date("date", &form.date)?,
        start_time: util::parse_time("start", &form.start)?,
        end_time: util::parse_time("end", &form.end)?,
        customer_name: name,
        customer_email: email,
        customer_phone: phone,
        promo_code: form.promo.clone(),
        notes: form.notes.clone(),
    })
}

/// `floorpass checkout`: the whole flow from form to confirmed booking.
pub async fn handle(session: &Session, form: &BookingForm, global: &GlobalOpts) -> Result<(), CliError> {
    let input = booking_input(form, session)?;
    let checkout = CheckoutOrchestrator::new(
        session.client.clone(),
        TerminalGateway,
        &session.client_config,
    );
    let outcome = with_progress(&checkout, global.quiet, checkout.checkout(&input)).await?;
    report(outcome, global)
}

/// `floorpass bookings pay`: the payment half for an existing pending booking.
pub async fn pay(session: &Session, booking: Booking, global: &GlobalOpts) -> Result<(), CliError> {
    let checkout = CheckoutOrchestrator::for_pending_booking(
        session.client.clone(),
        TerminalGateway,
        &session.client_config,
        booking,
    )?;
    let outcome = with_progress(&checkout, global.quiet, checkout.pay()).await?;
    report(outcome, global)
}

fn report(outcome: CheckoutOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match outcome {
        CheckoutOutcome::Confirmed(booking) => {
            if !global.quiet {
                eprintln!("Payment verified. Booking {} is confirmed.", booking.booking_code);
            }
            let out = output::render_single(
                &global.output,
                &booking,
                |b| util::booking_detail(b, color),
                |b| b.booking_code.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }
        CheckoutOutcome::Dismissed(booking) => {
            if !global.quiet {
                eprintln!(
                    "Payment not completed. Booking {} is still pending.\n\
                     Pay for it later with: floorpass bookings pay {}",
                    booking.booking_code, booking.id
                );
            }
        }
    }
    Ok(())
}
