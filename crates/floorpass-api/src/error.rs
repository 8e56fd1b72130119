use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Normalized error body, matching what the booking service returns
/// for every non-2xx response.
///
/// Failures that never produced a response (connection refused, DNS,
/// timeout) are synthesized into this shape with `status_code: 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub error: String,
    pub timestamp: String,
    pub path: String,
}

impl ErrorResponse {
    pub(crate) fn synthesize(status_code: u16, error: &str, message: String, path: &str) -> Self {
        Self {
            status_code,
            message,
            error: error.to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            path: path.to_owned(),
        }
    }
}

/// Lenient view of an error body. Every field is optional because proxies
/// and load balancers in front of the API do not follow the contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawErrorBody {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default, deserialize_with = "message_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Validation failures arrive as `message: ["a", "b"]`; everything else
/// as a plain string.
fn message_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Message {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<Message>::deserialize(deserializer)?.map(|m| match m {
        Message::One(s) => s,
        Message::Many(v) => v.join("; "),
    }))
}

/// Top-level error type for the `floorpass-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server ──────────────────────────────────────────────────────
    /// The API answered with a non-2xx status. Display is the server's
    /// message, verbatim.
    #[error("{}", .0.message)]
    Api(ErrorResponse),

    // ── Authentication ──────────────────────────────────────────────
    /// The access token was rejected and the refresh token could not
    /// renew it. Stored credentials have been cleared.
    #[error("Session expired -- sign in again")]
    SessionExpired,

    /// An operation that needs a signed-in user was attempted without tokens.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Issued tokens could not be written to the token store.
    #[error(transparent)]
    TokenStore(#[from] crate::auth::TokenStoreError),

    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Input rejected before it was sent.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl Error {
    /// HTTP status associated with this error. `0` means no response
    /// was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api(resp) => resp.status_code,
            Self::SessionExpired | Self::NotAuthenticated => 401,
            Self::Transport(e) => e.status().map_or(0, |s| s.as_u16()),
            Self::Validation { .. } => 400,
            Self::InvalidUrl(_)
            | Self::Tls(_)
            | Self::Deserialization { .. }
            | Self::TokenStore(_) => 0,
        }
    }

    /// The error in the wire shape, synthesizing one for client-side failures.
    pub fn to_error_response(&self, path: &str) -> ErrorResponse {
        match self {
            Self::Api(resp) => resp.clone(),
            Self::SessionExpired | Self::NotAuthenticated => {
                ErrorResponse::synthesize(401, "Unauthorized", self.to_string(), path)
            }
            Self::Validation { .. } => {
                ErrorResponse::synthesize(400, "Bad Request", self.to_string(), path)
            }
            Self::TokenStore(_) => {
                ErrorResponse::synthesize(0, "Client Error", self.to_string(), path)
            }
            Self::Transport(_)
            | Self::InvalidUrl(_)
            | Self::Tls(_)
            | Self::Deserialization { .. } => {
                ErrorResponse::synthesize(
                    self.status_code(),
                    "Network Error",
                    self.to_string(),
                    path,
                )
            }
        }
    }

    /// The message a user should see.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(resp) if !resp.message.is_empty() => resp.message.clone(),
            Self::Api(_) => "Something went wrong. Please try again.".into(),
            Self::Transport(_) => "Network error. Check your connection and try again.".into(),
            other => other.to_string(),
        }
    }

    /// 5xx, 429 and requests that never got a response are worth retrying;
    /// other client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => match e.status() {
                Some(status) => status.as_u16() == 429 || status.is_server_error(),
                None => !e.is_builder() && !e.is_decode(),
            },
            Self::Api(resp) => resp.status_code == 429 || resp.status_code >= 500,
            _ => false,
        }
    }

    /// Returns `true` if signing in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
            || matches!(self, Self::Api(resp) if resp.status_code == 401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    /// The resource is not in a state that allows the operation (409).
    pub fn is_conflict(&self) -> bool {
        self.status_code() == 409
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code() == 403
    }
}
