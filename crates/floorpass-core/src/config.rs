// ── Runtime client configuration ──
//
// Describes how to reach the booking service and how patient to be with
// it. Never touches disk: the CLI resolves a profile into a
// `ClientConfig` and hands it in.

use std::sync::Arc;
use std::time::Duration;

use floorpass_api::{
    ApiClient, RetryPolicy, SessionListener, TlsMode, TokenStore, TransportConfig,
};
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base, e.g. `https://api.floorpass.in/api/v1`.
    pub api_url: Url,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// ISO 4217 code used for payment orders.
    pub currency: String,
    /// Public key passed to the payment gateway. The server may echo its
    /// own in the order, which takes precedence.
    pub gateway_key_id: Option<String>,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsMode::default(),
            timeout: floorpass_api::transport::DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            currency: DEFAULT_CURRENCY.to_owned(),
            gateway_key_id: None,
        }
    }

    /// Build an [`ApiClient`] wired to `tokens` and, optionally, a
    /// session-expiry hook.
    pub fn build_client(
        &self,
        tokens: Arc<dyn TokenStore>,
        listener: Option<Arc<dyn SessionListener>>,
    ) -> Result<ApiClient, CoreError> {
        let transport = TransportConfig {
            tls: self.tls.clone(),
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout);

        let mut client =
            ApiClient::new(self.api_url.as_str(), &transport, tokens)?.with_retry_policy(self.retry);
        if let Some(listener) = listener {
            client = client.with_session_listener(listener);
        }
        Ok(client)
    }
}
