// Booking service HTTP client
//
// Wraps `reqwest::Client` with bearer-token attachment, envelope
// unwrapping, error normalization and transparent token refresh.
// Endpoint groups (bookings, payments, staff, ...) are inherent methods
// implemented in sibling modules to keep this one about transport.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{SessionListener, TokenPair, TokenStore};
use crate::error::{Error, ErrorResponse, RawErrorBody};
use crate::models::{ApiResponse, Paginated};
use crate::retry::{RetryPolicy, with_retry};
use crate::transport::TransportConfig;

/// Per-request knobs.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// Do not attempt a token refresh on `401`. Set for the auth
    /// endpoints themselves.
    pub skip_refresh: bool,
}

impl RequestOptions {
    pub fn with_query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn no_refresh() -> Self {
        Self {
            skip_refresh: true,
            ..Self::default()
        }
    }
}

/// Async client for the booking service REST API.
///
/// Safe to share across tasks (`Arc<ApiClient>`). Concurrent requests that
/// hit an expired access token share a single refresh.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    listener: Option<Arc<dyn SessionListener>>,
    retry: RetryPolicy,
    /// Held for the duration of a refresh; callers that saw a `401`
    /// queue here and are released once the outcome is stored.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL (e.g. `https://api.example.com/api/v1`)
    /// and a transport config.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, tokens)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            tokens,
            listener: None,
            retry: RetryPolicy::default(),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Register the hook fired when the session cannot be renewed.
    pub fn with_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"bookings/abc"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Generic request ──────────────────────────────────────────────

    /// Send a request and deserialize the whole response body.
    ///
    /// Any non-2xx becomes [`Error::Api`] carrying the normalized body. A
    /// `401` on a request that carried an access token triggers one
    /// refresh-and-replay.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        let resp = self.send_authorized(&method, &url, body, options).await?;
        handle_response(resp).await
    }

    // ── Envelope helpers ─────────────────────────────────────────────

    /// `GET` and unwrap `data`. Retried per the client's policy.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, Error> {
        with_retry(self.retry, || async {
            let envelope: ApiResponse<T> = self
                .request(Method::GET, path, None::<&()>, options)
                .await?;
            unwrap_envelope(envelope, path)
        })
        .await
    }

    /// `GET` a paginated list. Retried per the client's policy.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Paginated<T>, Error> {
        with_retry(self.retry, || {
            self.request::<Paginated<T>, ()>(Method::GET, path, None, options)
        })
        .await
    }

    /// Send a write and unwrap `data`. Never retried.
    pub(crate) async fn send_data<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let envelope: ApiResponse<T> = self.request(method, path, Some(body), options).await?;
        unwrap_envelope(envelope, path)
    }

    // ── Auth-aware send ──────────────────────────────────────────────

    async fn send_authorized<B>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let sent_token = self.tokens.get().map(|t| t.access_token);
        let resp = self
            .send_once(method, url, body, &options.query, sent_token.as_ref())
            .await?;

        if resp.status() != StatusCode::UNAUTHORIZED || options.skip_refresh {
            return Ok(resp);
        }
        // Nothing to refresh: surface the 401 as-is.
        let Some(sent_token) = sent_token else {
            return Ok(resp);
        };

        self.refresh_after_unauthorized(&sent_token).await?;

        let replay_token = self.tokens.get().map(|t| t.access_token);
        debug!("replaying {method} {url} after refresh");
        self.send_once(method, url, body, &options.query, replay_token.as_ref())
            .await
    }

    /// Single-flight refresh.
    ///
    /// The first caller through the gate refreshes; everyone queued behind
    /// it compares the token they were rejected with against the stored one
    /// and either replays (already rotated) or fails (store cleared).
    async fn refresh_after_unauthorized(&self, rejected: &SecretString) -> Result<(), Error> {
        let _gate = self.refresh_gate.lock().await;

        let Some(current) = self.tokens.get() else {
            return Err(Error::SessionExpired);
        };
        if !current.same_access_token(rejected) {
            debug!("access token already rotated by a concurrent refresh");
            return Ok(());
        }

        info!("access token rejected, refreshing session");
        match self.exchange_refresh_token(&current.refresh_token).await {
            Ok(tokens) => {
                if let Err(e) = self.tokens.set(&tokens) {
                    warn!(error = %e, "refreshed session could not be stored");
                    return Err(e.into());
                }
                debug!("session refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed, clearing credentials");
                self.tokens.clear();
                if let Some(listener) = &self.listener {
                    listener.session_expired();
                }
                Err(Error::SessionExpired)
            }
        }
    }

    /// `POST auth/refresh` without going through the refresh machinery.
    pub(crate) async fn exchange_refresh_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<TokenPair, Error> {
        let path = "auth/refresh";
        let url = self.url(path)?;
        let body = crate::models::RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        let resp = self
            .send_once(&Method::POST, &url, Some(&body), &[], None)
            .await?;
        let envelope: ApiResponse<crate::models::IssuedTokens> = handle_response(resp).await?;
        let issued = unwrap_envelope(envelope, path)?;

        Ok(TokenPair {
            access_token: SecretString::from(issued.access_token),
            refresh_token: issued
                .refresh_token
                .map_or_else(|| refresh_token.clone(), SecretString::from),
        })
    }

    async fn send_once<B>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        query: &[(String, String)],
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!("{method} {url}");

        let mut builder = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let path = resp.url().path().to_owned();

    if !status.is_success() {
        return Err(Error::Api(parse_error(status, &path, resp).await));
    }

    let body = resp.text().await?;
    // 204s and empty 200s deserialize as JSON null.
    let text = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(text).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

async fn parse_error(status: StatusCode, path: &str, resp: reqwest::Response) -> ErrorResponse {
    let raw = resp.text().await.unwrap_or_default();
    let reason = status.canonical_reason().unwrap_or("Error");

    match serde_json::from_str::<RawErrorBody>(&raw) {
        Ok(body) => ErrorResponse {
            status_code: body.status_code.unwrap_or_else(|| status.as_u16()),
            message: body.message.unwrap_or_else(|| reason.to_owned()),
            error: body.error.unwrap_or_else(|| reason.to_owned()),
            timestamp: body
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            path: body.path.unwrap_or_else(|| path.to_owned()),
        },
        Err(_) => {
            let message = if raw.trim().is_empty() {
                reason.to_owned()
            } else {
                raw.chars().take(200).collect()
            };
            ErrorResponse::synthesize(status.as_u16(), reason, message, path)
        }
    }
}

/// A 2xx with `success: false` is still a failure.
fn unwrap_envelope<T>(envelope: ApiResponse<T>, path: &str) -> Result<T, Error> {
    if envelope.success == Some(false) {
        return Err(Error::Api(ErrorResponse::synthesize(
            400,
            "Bad Request",
            envelope
                .message
                .unwrap_or_else(|| "Request was not successful".into()),
            path,
        )));
    }
    Ok(envelope.data)
}

/// Ensure the base ends with `/` so relative joins append instead of replace.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
