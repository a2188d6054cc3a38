//! Tag and rating edit endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::app::SharedState;

use super::{ApiResult, err_json, map_db_error};

/// POST /api/tags/:channel_id – body `{ "tags": "a, b, c" }`.
pub async fn update_tags(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let tags_string = body
        .get("tags")
        .and_then(|v| v.as_str())
        .ok_or_else(|| err_json(400, "Missing 'tags' in request data."))?;

    let tags: Vec<String> = tags_string.split(',').map(String::from).collect();
    let stored = state
        .db()
        .set_channel_tags(&channel_id, &tags)
        .map_err(map_db_error)?;

    let unique_tags = state.db().get_unique_tags().map_err(map_db_error)?;
    let tag_colors = state.db().get_tag_colors().map_err(map_db_error)?;
    Ok(Json(json!({
        "success": true,
        "channel_id": channel_id,
        "tags": stored,
        "unique_tags": unique_tags,
        "tag_colors": tag_colors,
    })))
}

/// POST /api/tags/color/:tag_name – body `{ "color": "#rrggbb" }`.
///
/// The tag name arrives percent-encoded; axum's `Path` extractor decodes it.
pub async fn update_tag_color(
    State(state): State<SharedState>,
    Path(tag_name): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let color = body
        .get("color")
        .and_then(|v| v.as_str())
        .ok_or_else(|| err_json(400, "Missing 'color' in request data."))?;

    state
        .db()
        .set_tag_color(&tag_name, color)
        .map_err(map_db_error)?;

    let all_colors = state.db().get_tag_colors().map_err(map_db_error)?;
    Ok(Json(json!({
        "success": true,
        "tag": tag_name,
        "color": color,
        "all_colors": all_colors,
    })))
}

/// POST /api/rating/:channel_id – body `{ "rating": 1..5 | null }`.
pub async fn update_rating(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let rating = match body.get("rating") {
        None => return Err(err_json(400, "Missing 'rating' in request data.")),
        Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(r) => Some(r),
            None => {
                return Err(err_json(
                    400,
                    "Invalid rating value. Must be an integer between 1 and 5, or null.",
                ));
            }
        },
    };

    state
        .db()
        .set_channel_rating(&channel_id, rating)
        .map_err(map_db_error)?;

    let channels = state.db().get_all_channels().map_err(map_db_error)?;
    Ok(Json(json!({
        "success": true,
        "channel_id": channel_id,
        "rating": rating,
        "channels": channels,
    })))
}
