use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};

/// The access/refresh token pair issued at login.
///
/// Always read and written as a unit so no request can observe a
/// half-rotated pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    pub(crate) fn same_access_token(&self, other: &SecretString) -> bool {
        self.access_token.expose_secret() == other.expose_secret()
    }
}

/// Where the client keeps its tokens between requests.
///
/// The CLI backs this with the OS keyring; tests and short-lived
/// processes use [`MemoryTokenStore`].
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<TokenPair>;
    /// Persist a new pair. A failure here means the session is lost.
    fn set(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;
    fn clear(&self);
}

/// A token pair could not be persisted.
#[derive(Debug, thiserror::Error)]
#[error("cannot save session: {0}")]
pub struct TokenStoreError(pub String);

/// Notified when the session can no longer be renewed.
///
/// This is the redirect-to-login hook: by the time it fires the token
/// store has already been cleared.
pub trait SessionListener: Send + Sync {
    fn session_expired(&self);
}

/// In-process token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<TokenPair> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set(&TokenPair::new("access-1", "refresh-1")).unwrap();
        let pair = store.get().unwrap();
        assert_eq!(pair.access_token.expose_secret(), "access-1");
        assert_eq!(pair.refresh_token.expose_secret(), "refresh-1");

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn token_debug_output_is_redacted() {
        let pair = TokenPair::new("super-secret-access", "super-secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("super-secret"));
    }
}
