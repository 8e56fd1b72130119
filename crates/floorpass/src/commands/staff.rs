//! Venue desk handlers: today's list, lookup, check-in / check-out / no-show.

use floorpass_api::Booking;
use floorpass_core::{BookingLifecycle, ScanResult, StaffAction, StaffDesk};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat, StaffArgs, StaffCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeskRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Space")]
    space: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl DeskRow {
    fn new(b: &Booking, color: bool) -> Self {
        Self {
            code: b.booking_code.clone(),
            guest: b.customer_name.clone(),
            space: b.space_name.clone().unwrap_or_else(|| b.space_id.clone()),
            time: format!("{}-{}", b.start_time.format("%H:%M"), b.end_time.format("%H:%M")),
            status: output::status_label(b.status, color),
            actions: action_list(b),
        }
    }
}

fn action_list(b: &Booking) -> String {
    b.status
        .staff_actions()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a desk query to exactly one booking in today's list.
fn select<'a>(desk: &'a StaffDesk, query: &str) -> Result<&'a Booking, CliError> {
    match desk.search(query) {
        ScanResult::Selected(booking) => Ok(booking),
        ScanResult::NotFound => Err(CliError::NotFound {
            resource_type: "booking".into(),
            identifier: query.into(),
            list_command: "staff today".into(),
        }),
        ScanResult::Ambiguous(hits) => Err(CliError::Ambiguous {
            query: query.into(),
            count: hits.len(),
            candidates: hits
                .iter()
                .map(|b| format!("  {}  {}  {}", b.booking_code, b.customer_name, b.status))
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: StaffArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut desk = StaffDesk::new(session.client.clone());
    desk.load_today().await?;

    match args.command {
        StaffCommand::Today => {
            let out = output::render_list(
                &global.output,
                desk.bookings(),
                |b| DeskRow::new(b, color),
                |b| b.booking_code.clone(),
            )?;
            output::print_output(&out, global.quiet);

            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                let s = desk.summary();
                eprintln!(
                    "{} bookings: {} expected, {} in, {} out, {} no-show",
                    s.total, s.awaiting_arrival, s.checked_in, s.checked_out, s.no_show
                );
            }
            Ok(())
        }

        StaffCommand::Find { query } => {
            match desk.search(&query) {
                ScanResult::Selected(booking) => {
                    let out = output::render_single(
                        &global.output,
                        booking,
                        |b| {
                            let mut detail = util::booking_detail(b, color);
                            let actions = action_list(b);
                            if !actions.is_empty() {
                                detail.push_str(&format!("\n\nAvailable: {actions}"));
                            }
                            detail
                        },
                        |b| b.id.clone(),
                    )?;
                    output::print_output(&out, global.quiet);
                }
                ScanResult::Ambiguous(hits) => {
                    let hits: Vec<Booking> = hits.into_iter().cloned().collect();
                    let out = output::render_list(
                        &global.output,
                        &hits,
                        |b| DeskRow::new(b, color),
                        |b| b.booking_code.clone(),
                    )?;
                    output::print_output(&out, global.quiet);
                }
                ScanResult::NotFound => {
                    return Err(CliError::NotFound {
                        resource_type: "booking".into(),
                        identifier: query,
                        list_command: "staff today".into(),
                    });
                }
            }
            Ok(())
        }

        StaffCommand::CheckIn { query } => {
            record(&mut desk, &query, StaffAction::CheckIn, global).await
        }
        StaffCommand::CheckOut { query } => {
            record(&mut desk, &query, StaffAction::CheckOut, global).await
        }
        StaffCommand::NoShow { query } => {
            record(&mut desk, &query, StaffAction::NoShow, global).await
        }
    }
}

async fn record(
    desk: &mut StaffDesk,
    query: &str,
    action: StaffAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selected = select(desk, query)?;
    let id = selected.id.clone();

    if action == StaffAction::NoShow
        && !util::confirm(
            &format!(
                "Mark {} ({}) as a no-show?",
                selected.booking_code, selected.customer_name
            ),
            global.yes,
        )?
    {
        return Ok(());
    }

    let updated = desk.perform(&id, action).await?;
    if !global.quiet {
        eprintln!(
            "{}: {} is now {}",
            updated.booking_code, updated.customer_name, updated.status
        );
    }
    let out = output::render_single(
        &global.output,
        updated,
        |b| util::booking_detail(b, output::should_color(&global.color)),
        |b| b.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
