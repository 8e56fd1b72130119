// ── Core error types ──
//
// What callers of the booking flows see. Server refusals keep their
// normalized body so the message is rendered verbatim; transport-level
// failures are folded into connection variants. The
// `From<floorpass_api::Error>` impl is the only translation point.

use floorpass_api::{BookingStatus, ErrorResponse};
use thiserror::Error;

use crate::lifecycle::StaffAction;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Server ───────────────────────────────────────────────────────
    /// The booking service refused the request. Display is its message.
    #[error("{}", .0.message)]
    Api(ErrorResponse),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach the booking service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("The booking service did not answer in time")]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Session expired -- sign in again")]
    SessionExpired,

    #[error("Not signed in")]
    NotSignedIn,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },

    #[error("{amount} is not a payable amount")]
    InvalidAmount { amount: f64 },

    // ── Checkout ─────────────────────────────────────────────────────
    #[error("A checkout is already being processed")]
    CheckoutInProgress,

    #[error("This checkout has already completed")]
    CheckoutAlreadyCompleted,

    /// The payment gateway declined or errored before producing a callback.
    #[error("Payment failed: {message}")]
    PaymentFailed { code: String, message: String },

    /// The gateway reported success but the server did not confirm it.
    #[error("Payment could not be verified: {message}")]
    VerificationFailed { message: String },

    // ── Staff desk ───────────────────────────────────────────────────
    #[error("Cannot {action}: booking is {status}")]
    ActionNotPermitted {
        action: StaffAction,
        status: BookingStatus,
    },

    #[error("No booking matching {query:?} in today's list")]
    BookingNotFound { query: String },

    // ── Configuration / internal ─────────────────────────────────────
    /// Issued tokens could not be saved; the user is not signed in.
    #[error("Cannot save the session: {message}")]
    CredentialStore { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status when the failure came from (or stands in for) a server
    /// answer; `0` when no response was received; `None` for purely local
    /// refusals.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(resp) => Some(resp.status_code),
            Self::ConnectionFailed { .. } | Self::Timeout => Some(0),
            Self::SessionExpired | Self::NotSignedIn => Some(401),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotSignedIn) || self.status_code() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BookingNotFound { .. }) || self.status_code() == Some(404)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// The booking is not in a state that allows the operation, whether the
    /// server or the local gate said so.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ActionNotPermitted { .. }
                | Self::CheckoutInProgress
                | Self::CheckoutAlreadyCompleted
        ) || self.status_code() == Some(409)
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    /// The message a user should see. Server messages are passed through;
    /// an empty one falls back to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(resp) if resp.message.trim().is_empty() => {
                "Something went wrong. Please try again.".into()
            }
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<floorpass_api::Error> for CoreError {
    fn from(err: floorpass_api::Error) -> Self {
        use floorpass_api::Error as ApiError;

        match err {
            ApiError::Api(resp) => CoreError::Api(resp),
            ApiError::SessionExpired => CoreError::SessionExpired,
            ApiError::NotAuthenticated => CoreError::NotSignedIn,
            ApiError::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            ApiError::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid API URL: {e}"),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from the booking service: {message}"))
            }
            ApiError::Validation { field, reason } => CoreError::ValidationFailed { field, reason },
            ApiError::TokenStore(e) => CoreError::CredentialStore { message: e.0 },
        }
    }
}
