//! YouTube Data API v3 client.
//!
//! Typed access to the subscription and channel endpoints with Bearer
//! token injection and bounded pagination.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{Token, YouTubeError};

const DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Page size for subscription listing (API maximum).
const PAGE_SIZE: u32 = 50;

/// Hard cap on pagination follows, as a runaway-loop guard.
const MAX_SUBSCRIPTION_PAGES: u32 = 50;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionListResponse {
    #[serde(default)]
    items: Vec<SubscriptionResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionResource {
    #[serde(default)]
    snippet: Option<SubscriptionSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionSnippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    resource_id: Option<ResourceId>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelResource>,
}

#[derive(Debug, Deserialize)]
struct ChannelResource {
    #[serde(default)]
    snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    #[serde(default)]
    title: Option<String>,
}

/// One subscribed channel as reported by the subscriptions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionItem {
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// YouTube Data API client with automatic auth header injection.
pub struct YouTubeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for YouTubeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeApiClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DATA_API_BASE.to_string(),
        }
    }

    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &Token) -> Result<HeaderMap, YouTubeError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.access_token);
        let value = HeaderValue::from_str(&bearer).map_err(|_| YouTubeError::ApiError {
            status: 400,
            message: "access token is not a valid header value".into(),
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Execute a GET request with auth headers.
    async fn authenticated_get(&self, url: &str, token: &Token) -> Result<String, YouTubeError> {
        let headers = self.auth_headers(token)?;
        let resp = self.http.get(url).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(url, "Got 401, caller should refresh token and retry");
            return Err(YouTubeError::ApiError {
                status: 401,
                message: body,
            });
        }

        if !status.is_success() {
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Get one page of the authenticated user's subscriptions.
    pub async fn list_subscriptions_page(
        &self,
        token: &Token,
        page_token: Option<&str>,
    ) -> Result<(Vec<SubscriptionItem>, Option<String>), YouTubeError> {
        let mut url = format!(
            "{}/subscriptions?part=snippet&mine=true&maxResults={}&order=alphabetical",
            self.base_url, PAGE_SIZE
        );
        if let Some(cursor) = page_token.filter(|v| !v.is_empty()) {
            url.push_str("&pageToken=");
            url.push_str(cursor);
        }
        let body = self.authenticated_get(&url, token).await?;
        let resp: SubscriptionListResponse = serde_json::from_str(&body)?;
        Ok((collect_items(resp.items), resp.next_page_token))
    }

    /// Get the complete subscription list by following pagination tokens.
    ///
    /// Any page failure aborts the whole fetch; partial results are never
    /// returned to the caller.
    pub async fn list_all_subscriptions(
        &self,
        token: &Token,
    ) -> Result<Vec<SubscriptionItem>, YouTubeError> {
        let mut subscriptions = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            page_count += 1;
            let (items, next) = self
                .list_subscriptions_page(token, page_token.as_deref())
                .await?;
            subscriptions.extend(items);

            match next {
                Some(cursor) if page_count < MAX_SUBSCRIPTION_PAGES => {
                    page_token = Some(cursor);
                }
                Some(_) => {
                    tracing::warn!(
                        pages = page_count,
                        "Stopped following subscription pages at the safety cap"
                    );
                    break;
                }
                None => break,
            }
        }

        tracing::info!(
            count = subscriptions.len(),
            pages = page_count,
            "Fetched subscriptions"
        );
        Ok(subscriptions)
    }

    /// Get the authenticated user's own channel title.
    pub async fn get_my_channel_title(
        &self,
        token: &Token,
    ) -> Result<Option<String>, YouTubeError> {
        let url = format!(
            "{}/channels?part=snippet&mine=true&maxResults=1",
            self.base_url
        );
        let body = self.authenticated_get(&url, token).await?;
        let resp: ChannelListResponse = serde_json::from_str(&body)?;

        let title = resp
            .items
            .into_iter()
            .next()
            .and_then(|c| c.snippet)
            .and_then(|s| s.title);
        if title.is_none() {
            tracing::warn!("No channel information for the authenticated user");
        }
        Ok(title)
    }
}

/// Flatten subscription resources, skipping items without an id or title.
fn collect_items(items: Vec<SubscriptionResource>) -> Vec<SubscriptionItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let snippet = item.snippet?;
            let channel_id = snippet.resource_id.and_then(|r| r.channel_id)?;
            let title = snippet.title?;
            let thumbnail_url = snippet
                .thumbnails
                .and_then(|t| t.default)
                .map(|t| t.url)
                .unwrap_or_default();
            Some(SubscriptionItem {
                channel_id,
                title,
                thumbnail_url,
            })
        })
        .collect()
}
