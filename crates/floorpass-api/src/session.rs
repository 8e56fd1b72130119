// Session endpoints
//
// Login stores the issued token pair; logout always clears it, even when
// the server call fails.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::auth::TokenPair;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, User};

impl ApiClient {
    /// Sign in with email and password.
    ///
    /// On success the token pair is written to the token store and the
    /// signed-in user is returned.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, Error> {
        debug!(email, "logging in");

        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let session: LoginResponse = self
            .send_data(
                Method::POST,
                "auth/login",
                &body,
                &RequestOptions::no_refresh(),
            )
            .await?;

        self.token_store()
            .set(&TokenPair::new(session.access_token, session.refresh_token))?;
        info!(user = %session.user.id, role = %session.user.role, "signed in");
        Ok(session.user)
    }

    /// End the session.
    ///
    /// The server call is best-effort; local tokens are cleared regardless.
    pub async fn logout(&self) {
        if self.is_authenticated() {
            let result: Result<serde_json::Value, Error> = self
                .request(
                    Method::POST,
                    "auth/logout",
                    None::<&()>,
                    &RequestOptions::no_refresh(),
                )
                .await;
            if let Err(e) = result {
                warn!(error = %e, "server logout failed, clearing local session anyway");
            }
        }
        self.token_store().clear();
        debug!("local session cleared");
    }

    /// The signed-in user.
    pub async fn current_user(&self) -> Result<User, Error> {
        if !self.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }
        self.get_data("auth/me", &RequestOptions::default()).await
    }

    /// Exchange the stored refresh token for a new pair without waiting
    /// for a `401`.
    pub async fn refresh_session(&self) -> Result<(), Error> {
        let current = self.token_store().get().ok_or(Error::NotAuthenticated)?;
        let tokens = self.exchange_refresh_token(&current.refresh_token).await?;
        self.token_store().set(&tokens)?;
        Ok(())
    }
}
