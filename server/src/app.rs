use std::sync::Arc;

use subs_db::Database;
use youtube_client::auth::GoogleAuth;
use youtube_client::credentials::{CredentialProvider, FileTokenStore};

use crate::config::AppConfig;

/// Fixed filename of the persisted OAuth token inside the data directory.
const TOKEN_FILE: &str = "token.json";

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: AppConfig,
    /// Database handle
    db: Database,
    /// OAuth credential provider
    credentials: CredentialProvider,
}

impl SharedState {
    /// Create shared state from an already-opened database and loaded config.
    pub fn new(db: Database, config: AppConfig) -> Self {
        let auth = GoogleAuth::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri(),
        );
        let store = FileTokenStore::new(config.data_dir.join(TOKEN_FILE));
        let credentials = CredentialProvider::new(Box::new(store), auth);

        Self {
            inner: Arc::new(SharedStateInner {
                config,
                db,
                credentials,
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn credentials(&self) -> &CredentialProvider {
        &self.inner.credentials
    }
}
