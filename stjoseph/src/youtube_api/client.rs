//! Low-level YouTube Data API handle bound to a single access token.

use crate::youtube_api::{
    broadcasts::{
        BroadcastStatus, BroadcastType, LiveBroadcast, LiveBroadcastListResponse,
        LiveBroadcastRequest,
    },
    channels::ChannelListResponse,
    error::ApiError,
};
use bytes::Bytes;
use eyre::Context;
use http::Method;
use jiff::Timestamp;
use serde::Serialize;
use tracing::instrument;

/// Root of every YouTube Data API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Page size requested from list endpoints (the API maximum).
const MAX_RESULTS: &str = "50";

/// An authenticated handle to the YouTube Data API.
///
/// The handle never refreshes its token. Once the token is stale (see [`Self::is_fresh`]) the
/// owner is expected to throw the handle away and build a new one from fresh credentials.
#[derive(Clone)]
pub struct YouTubeApi {
    access_token: String,
    expires_at: Option<Timestamp>,
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for YouTubeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeApi")
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YouTubeApi {
    pub fn new(
        access_token: String,
        expires_at: Option<Timestamp>,
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            expires_at,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Whether the access token can still be used at `now`.
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the bearer token, sends the request, and turns non-success statuses into
    /// [`ApiError`]s.
    async fn send(
        &self,
        method: &Method,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> eyre::Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("send {method} request to YouTube API: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::from_body(status, &body).into());
        }
        Ok(response)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        json_body: Option<&impl Serialize>,
    ) -> eyre::Result<reqwest::Response> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url).query(query);
        if let Some(body) = json_body {
            request = request.json(body);
        }
        self.send(&method, &url, request).await
    }

    /// Fetches one page of `liveBroadcasts.list` filtered by status and type.
    ///
    /// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/list>
    #[instrument(skip(self), level = tracing::Level::DEBUG)]
    pub async fn list_live_broadcasts(
        &self,
        status: BroadcastStatus,
        kind: BroadcastType,
        page_token: Option<&str>,
    ) -> eyre::Result<LiveBroadcastListResponse> {
        let mut query = vec![
            ("part", "id,snippet,status"),
            ("broadcastStatus", status.as_str()),
            ("broadcastType", kind.as_str()),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .request(Method::GET, "/youtube/v3/liveBroadcasts", &query, None::<&()>)
            .await?;
        let broadcasts: LiveBroadcastListResponse = response
            .json()
            .await
            .context("parse liveBroadcasts.list response as JSON")?;

        tracing::debug!(
            total_results = broadcasts.page_info.total_results,
            returned_items = broadcasts.items.len(),
            "fetched live broadcasts"
        );
        Ok(broadcasts)
    }

    /// Fetches one page of the authenticated user's channels.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self), level = tracing::Level::DEBUG)]
    pub async fn list_channels(&self, page_token: Option<&str>) -> eyre::Result<ChannelListResponse> {
        let mut query = vec![
            ("part", "id,snippet"),
            ("mine", "true"),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .request(Method::GET, "/youtube/v3/channels", &query, None::<&()>)
            .await?;
        response
            .json()
            .await
            .context("parse channels.list response as JSON")
    }

    /// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/insert>
    #[instrument(skip(self, broadcast), fields(title = %broadcast.snippet.title))]
    pub async fn insert_live_broadcast(
        &self,
        broadcast: &LiveBroadcastRequest,
    ) -> eyre::Result<LiveBroadcast> {
        let response = self
            .request(
                Method::POST,
                "/youtube/v3/liveBroadcasts",
                &[("part", "snippet,status")],
                Some(broadcast),
            )
            .await?;
        response
            .json()
            .await
            .context("parse liveBroadcasts.insert response as JSON")
    }

    /// Replaces the snippet and status of the broadcast identified by `broadcast.id`.
    ///
    /// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/update>
    #[instrument(skip(self, broadcast), fields(id = ?broadcast.id))]
    pub async fn update_live_broadcast(
        &self,
        broadcast: &LiveBroadcastRequest,
    ) -> eyre::Result<LiveBroadcast> {
        eyre::ensure!(broadcast.id.is_some(), "broadcast update requires an id");
        let response = self
            .request(
                Method::PUT,
                "/youtube/v3/liveBroadcasts",
                &[("part", "snippet,status")],
                Some(broadcast),
            )
            .await?;
        response
            .json()
            .await
            .context("parse liveBroadcasts.update response as JSON")
    }

    /// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/delete>
    #[instrument(skip(self))]
    pub async fn delete_live_broadcast(&self, broadcast_id: &str) -> eyre::Result<()> {
        self.request(
            Method::DELETE,
            "/youtube/v3/liveBroadcasts",
            &[("id", broadcast_id)],
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    /// Uploads `image` as the custom thumbnail of a video.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/thumbnails/set>
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn set_thumbnail(
        &self,
        video_id: &str,
        image: Bytes,
        mime_type: &str,
    ) -> eyre::Result<()> {
        let url = self.url("/upload/youtube/v3/thumbnails/set");
        let request = self
            .client
            .post(&url)
            .query(&[("videoId", video_id), ("uploadType", "media")])
            .header(http::header::CONTENT_TYPE, mime_type)
            .body(image);
        self.send(&Method::POST, &url, request).await?;
        Ok(())
    }
}
