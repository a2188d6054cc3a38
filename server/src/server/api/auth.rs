//! OAuth endpoints: consent redirect, code callback, status, logout.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::SharedState;

use super::{ApiResult, err_json, map_youtube_error};

fn require_credentials(
    state: &SharedState,
) -> Result<(), (axum::http::StatusCode, Json<Value>)> {
    let config = state.config();
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(err_json(400, "Google credentials not configured"));
    }
    Ok(())
}

/// GET /auth – Redirect to the Google consent screen.
pub async fn auth_redirect(
    State(state): State<SharedState>,
) -> Result<Redirect, (axum::http::StatusCode, Json<Value>)> {
    require_credentials(&state)?;
    let url = state
        .credentials()
        .authorization_url()
        .map_err(|e| err_json(500, &e.to_string()))?;
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /callback – Exchange OAuth code for tokens.
pub async fn callback(
    State(state): State<SharedState>,
    Query(q): Query<CallbackQuery>,
) -> Result<Html<String>, (axum::http::StatusCode, Json<Value>)> {
    if let Some(error) = q.error {
        let desc = q.error_description.unwrap_or_default();
        return Ok(Html(format!(
            r#"<!DOCTYPE html><html><body><h2>Authorization error</h2><p>{error}: {desc}</p>
            <script>setTimeout(()=>window.close(),5000)</script></body></html>"#
        )));
    }
    let code = q
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| err_json(400, "OAuth code missing"))?;
    require_credentials(&state)?;
    state
        .credentials()
        .complete_authorization(&code)
        .await
        .map_err(map_youtube_error)?;

    Ok(Html(
        r#"<!DOCTYPE html><html><body>
<h2>Authorization successful!</h2><p>You can close this window and return to the dashboard.</p>
<script>setTimeout(()=>window.close(),2000)</script></body></html>"#
            .to_string(),
    ))
}

/// GET /api/auth/status
pub async fn auth_status(State(state): State<SharedState>) -> ApiResult {
    let auth_url = state.credentials().authorization_url().unwrap_or_default();
    Ok(Json(json!({
        "authenticated": state.credentials().is_authenticated(),
        "auth_url": auth_url,
    })))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<SharedState>) -> ApiResult {
    state
        .credentials()
        .logout()
        .map_err(|e| err_json(500, &e.to_string()))?;
    tracing::info!("Credential cleared");
    Ok(Json(json!({ "success": true })))
}
