//! Sign-in command handlers.

use dialoguer::Input;
use floorpass_api::User;
use secrecy::SecretString;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(user: &User) -> String {
    output::detail_block(&[
        ("ID", user.id.clone()),
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Phone", user.phone.clone().unwrap_or_default()),
        ("Role", user.role.to_string()),
    ])
}

pub async fn handle(session: &Session, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = &session.client;

    match args.command {
        AuthCommand::Login { email } => {
            let email = match email.or_else(|| session.profile.email.clone()) {
                Some(email) => email,
                None => Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(util::prompt_err)?,
            };
            let password = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            let user = client.login(&email, &SecretString::from(password)).await?;
            if !global.quiet {
                eprintln!(
                    "Signed in as {} ({}) on profile '{}'",
                    user.name, user.role, session.profile_name
                );
            }
            Ok(())
        }

        AuthCommand::Logout => {
            client.logout().await;
            if !global.quiet {
                eprintln!("Signed out of profile '{}'", session.profile_name);
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = client.current_user().await?;
            let out = output::render_single(&global.output, &user, user_detail, |u| u.email.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
