//! Google / YouTube Data API integration.
//!
//! Provides OAuth authentication, credential persistence, and a typed
//! client for the subscription endpoints of the YouTube Data API v3.

pub mod api;
pub mod auth;
pub mod credentials;

use serde::{Deserialize, Serialize};

/// Token data for OAuth authentication.
///
/// Persisted by a [`credentials::TokenStore`] implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

/// Unified error type for the youtube-client crate.
#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication required: no valid token")]
    AuthRequired,

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("YouTube API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
}

/// OAuth scopes required by this application.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/youtube.readonly"];
