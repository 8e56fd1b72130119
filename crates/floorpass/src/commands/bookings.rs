//! Booking command handlers.

use floorpass_api::BookingQuery;

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts, OutputFormat};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::{checkout, util};

pub async fn handle(
    session: &Session,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = &session.client;
    let color = output::should_color(&global.color);

    match args.command {
        BookingsCommand::List {
            page,
            limit,
            status,
        } => {
            let query = BookingQuery {
                page: Some(page),
                limit: Some(limit),
                status: status.map(Into::into),
            };
            let result = client.list_my_bookings(&query).await?;
            let out = output::render_list(
                &global.output,
                &result.data,
                |b| util::BookingRow::new(b, color),
                |b| b.id.clone(),
            )?;
            output::print_output(&out, global.quiet);

            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                let p = &result.pagination;
                eprintln!("Page {} of {} ({} bookings)", p.page, p.total_pages.max(1), p.total);
                if result.has_next_page() {
                    eprintln!("Next page: floorpass bookings list --page {}", p.page + 1);
                }
            }
            Ok(())
        }

        BookingsCommand::Get { id, code } => {
            let booking = if code {
                client.get_booking_by_code(&id).await?
            } else {
                client.get_booking(&id).await?
            };
            let out = output::render_single(
                &global.output,
                &booking,
                |b| util::booking_detail(b, color),
                |b| b.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Create(form) => {
            let input = checkout::booking_input(&form, session)?;
            let booking = client.create_booking(&input).await?;
            let out = output::render_single(
                &global.output,
                &booking,
                |b| util::booking_detail(b, color),
                |b| b.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if !global.quiet {
                eprintln!(
                    "Booking {} created and awaiting payment.\n\
                     Pay with: floorpass bookings pay {}",
                    booking.booking_code, booking.id
                );
            }
            Ok(())
        }

        BookingsCommand::Cancel { id, reason } => {
            if !util::confirm(&format!("Cancel booking {id}?"), global.yes)? {
                return Ok(());
            }
            let booking = client.cancel_booking(&id, reason.as_deref()).await?;
            if !global.quiet {
                eprintln!("Booking {} is {}", booking.booking_code, booking.status);
            }
            let out = output::render_single(
                &global.output,
                &booking,
                |b| util::booking_detail(b, color),
                |b| b.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Pay { id } => {
            let booking = client.get_booking(&id).await?;
            checkout::pay(session, booking, global).await
        }
    }
}
