//! Static file serving for the embedded dashboard.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "static/"]
struct DashboardAssets;

/// Serve dashboard index for bare `/` requests.
pub async fn dashboard_index() -> Response {
    serve_embedded("index.html")
}

/// GET /static/*path
pub async fn static_handler(axum::extract::Path(path): axum::extract::Path<String>) -> Response {
    serve_embedded(&path)
}

fn serve_embedded(path: &str) -> Response {
    match DashboardAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": path,
            })),
        )
            .into_response(),
    }
}
