//! Channel listing and upstream re-sync endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use youtube_client::YouTubeError;
use youtube_client::api::YouTubeApiClient;

use crate::app::SharedState;
use crate::reconcile::reconcile_channels;

use super::{ApiResult, err_json, map_db_error, map_youtube_error};

/// GET /api/channels
///
/// Returns the stored channel list with tag/color maps. When the store is
/// empty, performs the first-time population from the YouTube API; that
/// path requires a credential and fails with 401 (carrying the auth URL)
/// when none is available.
pub async fn get_channels(State(state): State<SharedState>) -> ApiResult {
    let mut channels = state.db().get_all_channels().map_err(map_db_error)?;
    let mut user_channel_title: Option<String> = None;
    let authenticated = state.credentials().is_authenticated();

    if channels.is_empty() {
        let token = match state.credentials().get_handle().await {
            Ok(token) => token,
            Err(YouTubeError::AuthRequired) => {
                let auth_url = state.credentials().authorization_url().unwrap_or_default();
                return Err((
                    axum::http::StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "message": "Authentication required.",
                        "auth_url": auth_url,
                    })),
                ));
            }
            Err(e) => return Err(map_youtube_error(e)),
        };

        tracing::info!("Store is empty, fetching subscriptions for initial population");
        let client = YouTubeApiClient::new();
        let subscriptions = client
            .list_all_subscriptions(&token)
            .await
            .map_err(|e| fetch_failure(&e))?;
        reconcile_channels(state.db(), &subscriptions).map_err(map_db_error)?;
        channels = state.db().get_all_channels().map_err(map_db_error)?;
        user_channel_title = client.get_my_channel_title(&token).await.unwrap_or_else(|e| {
            tracing::warn!("Could not fetch user channel title: {e}");
            None
        });
    } else if authenticated {
        // Best-effort: the dashboard header shows whose subscriptions these are.
        if let Ok(token) = state.credentials().get_handle().await {
            let client = YouTubeApiClient::new();
            user_channel_title = client.get_my_channel_title(&token).await.unwrap_or_else(|e| {
                tracing::warn!("Could not fetch user channel title: {e}");
                None
            });
        }
    }

    let unique_tags = state.db().get_unique_tags().map_err(map_db_error)?;
    let tag_colors = state.db().get_tag_colors().map_err(map_db_error)?;
    Ok(Json(json!({
        "channels": channels,
        "unique_tags": unique_tags,
        "tag_colors": tag_colors,
        "user_channel_title": user_channel_title,
        "authenticated": state.credentials().is_authenticated(),
    })))
}

/// POST /refresh_from_youtube
///
/// Fetches the full subscription list, removes unsubscribed channels,
/// and upserts the rest. Partial fetches are never persisted.
pub async fn refresh_from_youtube(State(state): State<SharedState>) -> ApiResult {
    tracing::info!("Refreshing subscriptions from the YouTube API");
    let token = state
        .credentials()
        .get_handle()
        .await
        .map_err(map_youtube_error)?;

    let client = YouTubeApiClient::new();
    let subscriptions = client
        .list_all_subscriptions(&token)
        .await
        .map_err(|e| fetch_failure(&e))?;

    let outcome = reconcile_channels(state.db(), &subscriptions).map_err(map_db_error)?;
    tracing::info!(
        fetched = outcome.fetched,
        removed = outcome.removed,
        "Refresh complete"
    );

    let channels = state.db().get_all_channels().map_err(map_db_error)?;
    let unique_tags = state.db().get_unique_tags().map_err(map_db_error)?;
    let tag_colors = state.db().get_tag_colors().map_err(map_db_error)?;
    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Refresh complete. Found {} subs. Removed {}. Processed {}.",
            outcome.fetched, outcome.removed, outcome.processed
        ),
        "channels": channels,
        "unique_tags": unique_tags,
        "tag_colors": tag_colors,
    })))
}

fn fetch_failure(err: &YouTubeError) -> (axum::http::StatusCode, Json<Value>) {
    tracing::error!("Failed to fetch subscriptions: {err}");
    err_json(500, "Failed to fetch subscriptions from YouTube API.")
}
