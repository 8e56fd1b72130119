//! Command dispatch: bridges CLI args -> core flows -> output formatting.

pub mod auth;
pub mod bookings;
pub mod checkout;
pub mod config_cmd;
pub mod price;
pub mod staff;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(session, args, global).await,
        Command::Bookings(args) => bookings::handle(session, args, global).await,
        Command::Checkout(form) => checkout::handle(session, &form, global).await,
        Command::Staff(args) => staff::handle(session, args, global).await,
        Command::Price(args) => price::handle(session, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend session".into(),
        )),
    }
}
