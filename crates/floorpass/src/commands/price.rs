//! Price quote handler.

use floorpass_core::{PriceBreakdown, TAX_RATE_PERCENT, duration_hours, format_rupees};
use serde::Serialize;

use crate::cli::{GlobalOpts, PriceArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    space_id: String,
    space_name: String,
    hours: f64,
    price_per_hour: f64,
    promo_code: Option<String>,
    /// Paise.
    #[serde(flatten)]
    breakdown: PriceBreakdown,
}

fn quote_detail(q: &Quote) -> String {
    output::detail_block(&[
        ("Space", q.space_name.clone()),
        ("Hours", format!("{}", q.hours)),
        ("Rate", format!("₹{:.2}/hour", q.price_per_hour)),
        ("Subtotal", format_rupees(q.breakdown.subtotal)),
        ("Discount", format_rupees(q.breakdown.discount)),
        (
            "Tax",
            format!("{} ({TAX_RATE_PERCENT}% GST)", format_rupees(q.breakdown.tax)),
        ),
        ("Total", format_rupees(q.breakdown.total)),
        ("Promo", q.promo_code.clone().unwrap_or_default()),
    ])
}

pub async fn handle(session: &Session, args: &PriceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let start = util::parse_time("start", &args.start)?;
    let end = util::parse_time("end", &args.end)?;
    let hours = duration_hours(start, end).ok_or_else(|| CliError::Validation {
        field: "time range".into(),
        reason: "end time must be after start time".into(),
    })?;

    let space = session.client.get_space(&args.space).await?;

    let discount = match &args.promo {
        Some(code) => {
            let promo = session
                .client
                .validate_promo_code(code, space.price_per_hour * hours, Some(space.id.as_str()))
                .await?;
            if !promo.valid {
                return Err(CliError::Validation {
                    field: "promo".into(),
                    reason: promo
                        .message
                        .unwrap_or_else(|| format!("'{code}' is not a valid promo code")),
                });
            }
            promo.discount_amount
        }
        None => 0.0,
    };

    let quote = Quote {
        breakdown: PriceBreakdown::compute(space.price_per_hour, hours, discount)?,
        space_id: space.id,
        space_name: space.name,
        hours,
        price_per_hour: space.price_per_hour,
        promo_code: args.promo.clone(),
    };
    let out = output::render_single(&global.output, &quote, quote_detail, |q| {
        format!("{:.2}", q.breakdown.total_rupees())
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
