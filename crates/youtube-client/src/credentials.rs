//! Credential persistence and the provider used by request handlers.
//!
//! Tokens live in a single JSON file under the data directory; a missing
//! file means the user has not authorized the application yet.

use std::path::PathBuf;

use crate::auth::GoogleAuth;
use crate::{Token, YouTubeError};

/// Storage seam for OAuth tokens, fakeable in tests.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Token>, YouTubeError>;
    fn save(&self, token: &Token) -> Result<(), YouTubeError>;
    fn clear(&self) -> Result<(), YouTubeError>;
}

/// Token store backed by a JSON file at a fixed path.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, YouTubeError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token = serde_json::from_str(&raw)?;
        Ok(Some(token))
    }

    fn save(&self, token: &Token) -> Result<(), YouTubeError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, raw)?;
        tracing::info!(path = %self.path.display(), "Saved credential");
        Ok(())
    }

    fn clear(&self) -> Result<(), YouTubeError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store for tests.
pub struct MemoryTokenStore {
    token: std::sync::Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token: std::sync::Mutex::new(token),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, YouTubeError> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn save(&self, token: &Token) -> Result<(), YouTubeError> {
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), YouTubeError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

/// Hands out usable API credentials to request handlers.
///
/// Loads the persisted token, refreshes it through [`GoogleAuth`] when it
/// is close to expiry, and persists the refreshed token back to the store.
pub struct CredentialProvider {
    store: Box<dyn TokenStore>,
    auth: GoogleAuth,
}

impl CredentialProvider {
    pub fn new(store: Box<dyn TokenStore>, auth: GoogleAuth) -> Self {
        Self { store, auth }
    }

    /// Whether a credential is currently persisted.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(), Ok(Some(_)))
    }

    /// The URL the user must visit to authorize the application.
    pub fn authorization_url(&self) -> Result<String, YouTubeError> {
        self.auth.get_auth_url()
    }

    /// Exchange an authorization code and persist the resulting token.
    pub async fn complete_authorization(&self, code: &str) -> Result<Token, YouTubeError> {
        let token = self.auth.exchange_code(code).await?;
        self.store.save(&token)?;
        tracing::info!(expires_at = token.expires_at, "OAuth token saved");
        Ok(token)
    }

    /// Return a usable token, or fail with [`YouTubeError::AuthRequired`].
    pub async fn get_handle(&self) -> Result<Token, YouTubeError> {
        let current = self.store.load()?.ok_or(YouTubeError::AuthRequired)?;

        match self.auth.get_or_refresh_token(&current).await? {
            Some(refreshed) => {
                self.store.save(&refreshed)?;
                tracing::info!(expires_at = refreshed.expires_at, "Token auto-refreshed");
                Ok(refreshed)
            }
            None => Ok(current),
        }
    }

    /// Drop the persisted credential.
    pub fn logout(&self) -> Result<(), YouTubeError> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_token() -> Token {
        Token {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            scope: "read".into(),
            expires_at: Utc::now().timestamp() + 3600,
        }
    }

    fn provider(token: Option<Token>) -> CredentialProvider {
        CredentialProvider::new(
            Box::new(MemoryTokenStore::new(token)),
            GoogleAuth::new("id".into(), "secret".into(), "http://localhost".into()),
        )
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new(None);
        assert!(store.load().unwrap().is_none());

        store.save(&valid_token()).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "access");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_get_handle_without_token() {
        let provider = provider(None);
        assert!(!provider.is_authenticated());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(provider.get_handle());
        assert!(matches!(result, Err(YouTubeError::AuthRequired)));
    }

    #[test]
    fn test_get_handle_with_valid_token() {
        let provider = provider(Some(valid_token()));
        assert!(provider.is_authenticated());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let token = rt.block_on(provider.get_handle()).unwrap();
        assert_eq!(token.access_token, "access");
    }

    #[test]
    fn test_logout_clears_token() {
        let provider = provider(Some(valid_token()));
        provider.logout().unwrap();
        assert!(!provider.is_authenticated());
    }
}
