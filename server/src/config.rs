//! Runtime application configuration loaded from .env / environment.

use std::path::PathBuf;

/// Runtime configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub server_port: u16,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from .env files and environment variables.
    pub fn load() -> Self {
        load_dotenv();

        Self {
            client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            server_port: parse_u16(&std::env::var("SERVER_PORT").unwrap_or_default(), 8080),
            data_dir: data_dir(),
        }
    }

    /// OAuth redirect URI derived from the server port.
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.server_port)
    }
}

/// Determine the data directory for the application.
/// Priority: SUBDECK_DATA_DIR env var > ~/.subdeck
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SUBDECK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".subdeck")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
