use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::{api, assets};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- OAuth ---
        .route("/auth", get(api::auth::auth_redirect))
        .route("/callback", get(api::auth::callback))
        .route("/api/auth/status", get(api::auth::auth_status))
        .route("/api/auth/logout", post(api::auth::logout))
        // --- Channels & sync ---
        .route("/api/channels", get(api::sync::get_channels))
        .route("/refresh_from_youtube", post(api::sync::refresh_from_youtube))
        // --- Tags & ratings ---
        .route("/api/tags/{channel_id}", post(api::channels::update_tags))
        .route("/api/tags/color/{tag_name}", post(api::channels::update_tag_color))
        .route("/api/rating/{channel_id}", post(api::channels::update_rating))
        // --- Dashboard static files ---
        .route("/", get(assets::dashboard_index))
        .route("/static/{*path}", get(assets::static_handler))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": "1.0.0"
    }))
}
