// Keyring-backed session storage.
//
// The access/refresh pair lives in one keyring entry as a small JSON
// document so it is always replaced as a unit.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use floorpass_api::{TokenPair, TokenStore, TokenStoreError};

use crate::ConfigError;

const SERVICE: &str = "floorpass";

#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
}

/// [`TokenStore`] backed by the OS keyring under `floorpass/<profile>`.
///
/// Read and removal failures are logged and treated as "no session".
/// A failed write is reported, since the issued tokens would be lost.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    profile: String,
}

impl KeyringTokenStore {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    fn entry(&self) -> Result<keyring::Entry, ConfigError> {
        keyring::Entry::new(SERVICE, &self.profile).map_err(|e| ConfigError::Keyring(e.to_string()))
    }

    fn read(&self) -> Result<Option<TokenPair>, ConfigError> {
        let raw = match self.entry()?.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(ConfigError::Keyring(e.to_string())),
        };
        let stored: StoredTokens = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Keyring(format!("corrupt session entry: {e}")))?;
        Ok(Some(TokenPair {
            access_token: SecretString::from(stored.access_token),
            refresh_token: SecretString::from(stored.refresh_token),
        }))
    }

    fn write(&self, tokens: &TokenPair) -> Result<(), ConfigError> {
        let stored = StoredTokens {
            access_token: tokens.access_token.expose_secret().to_owned(),
            refresh_token: tokens.refresh_token.expose_secret().to_owned(),
        };
        let raw = serde_json::to_string(&stored)
            .map_err(|e| ConfigError::Keyring(format!("cannot encode session: {e}")))?;
        self.entry()?
            .set_password(&raw)
            .map_err(|e| ConfigError::Keyring(e.to_string()))
    }

    fn remove(&self) -> Result<(), ConfigError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ConfigError::Keyring(e.to_string())),
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<TokenPair> {
        self.read().unwrap_or_else(|e| {
            warn!(profile = %self.profile, error = %e, "cannot read session from keyring");
            None
        })
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        match self.write(tokens) {
            Ok(()) => {
                debug!(profile = %self.profile, "session saved to keyring");
                Ok(())
            }
            Err(e) => {
                warn!(profile = %self.profile, error = %e, "cannot save session to keyring");
                Err(TokenStoreError(match e {
                    ConfigError::Keyring(reason) => reason,
                    other => other.to_string(),
                }))
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = self.remove() {
            warn!(profile = %self.profile, error = %e, "cannot remove session from keyring");
        }
    }
}
