//! REST API handlers grouped by domain.

pub mod auth;
pub mod channels;
pub mod sync;

use axum::Json;
use serde_json::{Value, json};
use subs_db::DbError;
use youtube_client::YouTubeError;

pub type ApiResult = Result<Json<Value>, (axum::http::StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (axum::http::StatusCode, Json<Value>) {
    (
        axum::http::StatusCode::from_u16(status)
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "success": false, "message": message })),
    )
}

pub fn map_db_error(err: DbError) -> (axum::http::StatusCode, Json<Value>) {
    match err {
        DbError::InvalidData(msg) => err_json(400, &msg),
        DbError::NotFound(msg) => err_json(404, &msg),
        other => err_json(500, &other.to_string()),
    }
}

pub fn map_youtube_error(err: YouTubeError) -> (axum::http::StatusCode, Json<Value>) {
    match err {
        YouTubeError::AuthRequired => err_json(401, "Authentication failed or required."),
        YouTubeError::ApiError { status, message } => err_json(status, &message),
        other => err_json(500, &other.to_string()),
    }
}
