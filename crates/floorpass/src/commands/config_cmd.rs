//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

/// Format config for display, one TOML-like section per profile.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "retry_attempts = {}", cfg.defaults.retry_attempts);
    let _ = writeln!(out, "retry_delay_ms = {}", cfg.defaults.retry_delay_ms);
    let _ = writeln!(out, "currency = \"{}\"", cfg.defaults.currency);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref key) = p.gateway_key_id {
            let _ = writeln!(out, "gateway_key_id = \"{key}\"");
        }
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(ref currency) = p.currency {
            let _ = writeln!(out, "currency = \"{currency}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(attempts) = p.retry_attempts {
            let _ = writeln!(out, "retry_attempts = {attempts}");
        }
        if let Some(delay) = p.retry_delay_ms {
            let _ = writeln!(out, "retry_delay_ms = {delay}");
        }
    }

    out.trim_end().to_owned()
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let mut cfg = config::load_config()?;
            let name: String = Input::new()
                .with_prompt("Profile name")
                .default(cfg.active_profile_name(global.profile.as_deref()))
                .interact_text()
                .map_err(util::prompt_err)?;
            let existing = cfg.profiles.get(&name).cloned().unwrap_or_default();

            let api_url: String = Input::new()
                .with_prompt("API URL (e.g. https://api.floorpass.in/api/v1)")
                .with_initial_text(global.api_url.clone().unwrap_or_else(|| existing.api_url.clone()))
                .interact_text()
                .map_err(util::prompt_err)?;
            let gateway_key_id: String = Input::new()
                .with_prompt("Payment gateway key id (optional)")
                .with_initial_text(existing.gateway_key_id.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;
            let email: String = Input::new()
                .with_prompt("Sign-in email (optional)")
                .with_initial_text(existing.email.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;

            let profile = Profile {
                api_url: api_url.trim().to_owned(),
                gateway_key_id: optional(&gateway_key_id),
                email: optional(&email),
                ..existing
            };
            // Reject a profile that could not build a client.
            floorpass_config::profile_to_client_config(&profile, &cfg.defaults)?;

            let first = cfg.profiles.is_empty();
            cfg.profiles.insert(name.clone(), profile);
            if first || cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }
            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Profile '{name}' saved to {}", path.display());
                eprintln!("Sign in with: floorpass auth login --profile {name}");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.active_profile_name(global.profile.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
