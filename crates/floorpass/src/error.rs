//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use floorpass_config::ConfigError;
use floorpass_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the booking service")]
    #[diagnostic(
        code(floorpass::connection_failed),
        help(
            "{reason}\n\
             Check your network and the profile's api_url: floorpass config show"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("The booking service did not answer in time")]
    #[diagnostic(
        code(floorpass::timeout),
        help("Increase the timeout with --timeout or try again shortly.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(floorpass::not_signed_in),
        help("Run: floorpass auth login --profile {profile}")
    )]
    NotSignedIn { profile: String },

    #[error("Session expired")]
    #[diagnostic(
        code(floorpass::session_expired),
        help("Sign in again with: floorpass auth login --profile {profile}")
    )]
    SessionExpired { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(floorpass::not_found),
        help("Run: floorpass {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("'{query}' matches {count} bookings")]
    #[diagnostic(
        code(floorpass::ambiguous),
        help("Narrow the search, e.g. with the full booking code:\n{candidates}")
    )]
    Ambiguous {
        query: String,
        count: usize,
        candidates: String,
    },

    // ── Server / state ───────────────────────────────────────────────
    /// Server message, passed through verbatim.
    #[error("{message}")]
    #[diagnostic(code(floorpass::api_error))]
    Api { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(code(floorpass::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(floorpass::payment_failed),
        help(
            "The booking is still pending. Retry the payment with:\n\
             floorpass bookings pay <BOOKING_ID>"
        )
    )]
    PaymentFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(floorpass::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(floorpass::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: floorpass config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(floorpass::no_config),
        help(
            "Create one with: floorpass config init\n\
             Or pass --api-url / set FLOORPASS_API_URL.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(floorpass::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(floorpass::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("{0}")]
    #[diagnostic(code(floorpass::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot render YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotSignedIn { .. } | Self::SessionExpired { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Api { status, .. } => match status {
                401 => exit_code::AUTH,
                403 => exit_code::PERMISSION,
                404 => exit_code::NOT_FOUND,
                409 => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::Validation { .. }
            | Self::Ambiguous { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile to auth errors so the help text names it.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::NotSignedIn { .. } => Self::NotSignedIn {
                profile: profile.into(),
            },
            Self::SessionExpired { .. } => Self::SessionExpired {
                profile: profile.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout => CliError::Timeout,

            CoreError::SessionExpired => CliError::SessionExpired {
                profile: "default".into(),
            },
            CoreError::NotSignedIn => CliError::NotSignedIn {
                profile: "default".into(),
            },

            CoreError::BookingNotFound { query } => CliError::NotFound {
                resource_type: "booking".into(),
                identifier: query,
                list_command: "staff today".into(),
            },

            CoreError::ValidationFailed { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },
            ref e @ CoreError::InvalidAmount { .. } => CliError::Validation {
                field: "amount".into(),
                reason: e.to_string(),
            },

            ref e @ (CoreError::CheckoutInProgress
            | CoreError::CheckoutAlreadyCompleted
            | CoreError::ActionNotPermitted { .. }) => CliError::Conflict {
                message: e.to_string(),
            },

            ref e @ (CoreError::PaymentFailed { .. } | CoreError::VerificationFailed { .. }) => {
                CliError::PaymentFailed {
                    message: e.to_string(),
                }
            }

            ref e @ CoreError::Api(ref resp) => CliError::Api {
                status: resp.status_code,
                message: e.user_message(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },

            CoreError::CredentialStore { message } => {
                CliError::Config(ConfigError::Keyring(format!("cannot save session: {message}")))
            }

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<floorpass_api::Error> for CliError {
    fn from(err: floorpass_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use floorpass_api::{BookingStatus, ErrorResponse};
    use floorpass_core::StaffAction;

    use super::*;

    fn server_error(status: u16, message: &str) -> CoreError {
        CoreError::Api(ErrorResponse {
            status_code: status,
            message: message.into(),
            error: "Error".into(),
            timestamp: "2026-10-20T09:00:00.000Z".into(),
            path: "/api/v1/bookings/b-1".into(),
        })
    }

    #[test]
    fn server_statuses_pick_exit_codes() {
        let cases = [
            (401, exit_code::AUTH),
            (403, exit_code::PERMISSION),
            (404, exit_code::NOT_FOUND),
            (409, exit_code::CONFLICT),
            (500, exit_code::GENERAL),
        ];
        for (status, code) in cases {
            let err = CliError::from(server_error(status, "nope"));
            assert_eq!(err.exit_code(), code, "status {status}");
        }
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = CliError::from(server_error(400, "Booking cannot be cancelled"));
        assert_eq!(err.to_string(), "Booking cannot be cancelled");

        let blank = CliError::from(server_error(500, "  "));
        assert_eq!(blank.to_string(), "Something went wrong. Please try again.");
    }

    #[test]
    fn refused_desk_action_is_a_conflict() {
        let err = CliError::from(CoreError::ActionNotPermitted {
            action: StaffAction::CheckIn,
            status: BookingStatus::NoShow,
        });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
        assert_eq!(err.to_string(), "Cannot check in: booking is no_show");
    }

    #[test]
    fn auth_errors_name_the_profile() {
        let err = CliError::from(CoreError::SessionExpired).for_profile("staging");
        assert!(matches!(&err, CliError::SessionExpired { profile } if profile == "staging"));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn network_failures_are_connection_errors() {
        let err = CliError::from(CoreError::ConnectionFailed {
            reason: "connection refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn unsaved_session_is_reported() {
        let err = CliError::from(floorpass_api::Error::TokenStore(
            floorpass_api::TokenStoreError("keyring is locked".into()),
        ));
        assert!(matches!(err, CliError::Config(ConfigError::Keyring(_))));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(err.to_string(), "keyring error: cannot save session: keyring is locked");
    }

    #[test]
    fn expired_session_while_verifying_keeps_auth_exit_code() {
        let err = CliError::from(CoreError::SessionExpired).for_profile("default");
        assert_eq!(err.exit_code(), exit_code::AUTH);
        let err = CliError::from(CoreError::VerificationFailed {
            message: "Invalid payment signature".into(),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
