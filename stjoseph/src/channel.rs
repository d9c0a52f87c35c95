//! The parish channel: scheduled broadcasts and the retrying executor every remote call goes
//! through.

use crate::credentials::CredentialsManager;
use crate::generators::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::livestream::{LiveStream, MAX_FIELD_LEN, truncate};
use crate::retry::{ErrorClass, RetryPolicy};
use crate::youtube_api::broadcasts::{LiveBroadcastRequestSnippet, LiveBroadcastRequestStatus};
use crate::youtube_api::{
    BroadcastStatus, BroadcastType, ChannelResource, DEFAULT_BASE_URL, LiveBroadcast,
    LiveBroadcastRequest, Page, PagedStream, PrivacyStatus, YouTubeApi,
};
use bytes::Bytes;
use eyre::Context;
use futures::{Stream, TryStreamExt};
use jiff::{SignedDuration, Timestamp};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// OAuth scopes needed to manage the channel's broadcasts.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/youtube.force-ssl"];

/// Length of a broadcast when no end time is given.
pub const DEFAULT_DURATION: SignedDuration = SignedDuration::from_hours(1);

/// What a dry run returns in place of a broadcast id.
pub const NO_OP: &str = "NOOP";

pub fn studio_url(broadcast_id: &str) -> String {
    format!("https://studio.youtube.com/video/{broadcast_id}/livestreaming")
}

/// A broadcast that was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description is {len} bytes long, the maximum is {max}")]
    DescriptionTooLong { len: usize, max: usize },
    #[error("title is {len} characters long, the maximum is {max}")]
    TitleTooLong { len: usize, max: usize },
}

/// Result of a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Broadcast(String),
    /// Nothing was sent because this was a dry run.
    NoOp,
}

impl ScheduleOutcome {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Broadcast(id) => Some(id),
            Self::NoOp => None,
        }
    }
}

impl fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast(id) => f.write_str(id),
            Self::NoOp => f.write_str(NO_OP),
        }
    }
}

/// Everything needed to create or update one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlan {
    pub title: String,
    pub description: String,
    pub start: Timestamp,
    /// Defaults to [`DEFAULT_DURATION`] after `start`.
    pub end: Option<Timestamp>,
    pub is_public: bool,
}

impl BroadcastPlan {
    pub fn new(title: impl Into<String>, description: impl Into<String>, start: Timestamp) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start,
            end: None,
            is_public: false,
        }
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn end(&self) -> Timestamp {
        self.end.unwrap_or(self.start + DEFAULT_DURATION)
    }

    pub fn privacy(&self) -> PrivacyStatus {
        PrivacyStatus::from_public(self.is_public)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.description.len();
        if len > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong {
                len,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        let len = self.title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(ValidationError::TitleTooLong {
                len,
                max: MAX_TITLE_LENGTH,
            });
        }
        Ok(())
    }

    fn to_request(&self, id: Option<&str>) -> LiveBroadcastRequest {
        LiveBroadcastRequest {
            id: id.map(str::to_string),
            snippet: LiveBroadcastRequestSnippet {
                title: self.title.clone(),
                description: self.description.clone(),
                scheduled_start_time: self.start,
                scheduled_end_time: self.end(),
            },
            status: LiveBroadcastRequestStatus {
                privacy_status: self.privacy(),
                self_declared_made_for_kids: true,
            },
        }
    }

    fn log(&self, action: &str, dry_run: bool) {
        tracing::info!(
            date = %self.start,
            title = %self.title,
            visibility = %self.privacy(),
            description = %truncate(&self.description, MAX_FIELD_LEN),
            dry_run,
            "{action} mass"
        );
    }
}

fn thumbnail_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Client for the authenticated user's YouTube channel.
///
/// The underlying [`YouTubeApi`] handle is built on first use and kept until its token goes
/// stale or the API rejects it. Every remote call is retried with backoff on authentication and
/// transient failures; after an authentication failure the handle is dropped and the token file
/// invalidated so the next attempt authenticates from scratch.
pub struct Channel {
    credentials: CredentialsManager,
    http: reqwest::Client,
    base_url: String,
    thumbnail: Option<PathBuf>,
    retry: RetryPolicy,
    api: Mutex<Option<Arc<YouTubeApi>>>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("thumbnail", &self.thumbnail)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Channel {
    pub fn new(credentials: CredentialsManager) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stjoseph/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build YouTube HTTP client")?;
        Ok(Self {
            credentials,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            thumbnail: None,
            retry: RetryPolicy::default(),
            api: Mutex::new(None),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Image uploaded as the thumbnail of every broadcast created or updated.
    pub fn with_thumbnail(mut self, path: impl Into<PathBuf>) -> Self {
        self.thumbnail = Some(path.into());
        self
    }

    pub fn credentials(&self) -> &CredentialsManager {
        &self.credentials
    }

    async fn api(&self) -> eyre::Result<Arc<YouTubeApi>> {
        let mut cached = self.api.lock().await;
        if let Some(api) = cached
            .as_ref()
            .filter(|api| api.is_fresh(Timestamp::now()))
        {
            return Ok(Arc::clone(api));
        }

        let credentials = self
            .credentials
            .create_oauth_credentials(SCOPES)
            .await
            .context("obtain YouTube credentials")?;
        let api = Arc::new(YouTubeApi::new(
            credentials.access_token.clone(),
            credentials.usable_until(),
            self.http.clone(),
            self.base_url.as_str(),
        ));
        *cached = Some(Arc::clone(&api));
        Ok(api)
    }

    /// Drops the cached API handle; the next call builds a new one.
    pub async fn reset(&self) {
        *self.api.lock().await = None;
    }

    /// Runs `call` against the API handle, retrying per the channel's [`RetryPolicy`].
    async fn execute<T, F, Fut>(&self, operation: &str, call: F) -> eyre::Result<T>
    where
        F: Fn(Arc<YouTubeApi>) -> Fut,
        Fut: Future<Output = eyre::Result<T>>,
    {
        let mut backoff = self.retry.backoff();
        loop {
            let result = match self.api().await {
                Ok(api) => call(api).await,
                Err(e) => Err(e),
            };
            let error = match result {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let class = ErrorClass::of(&error);
            if !class.is_retryable() {
                return Err(error.wrap_err(format!("{operation} failed")));
            }
            let Some(delay) = backoff.next_delay() else {
                return Err(error.wrap_err(format!(
                    "{operation} failed after {} attempts",
                    backoff.failures()
                )));
            };
            if class == ErrorClass::RetryableAuth {
                tracing::warn!(operation, "credentials rejected, invalidating token");
                self.reset().await;
                if let Err(e) = self.credentials.invalidate_token().await {
                    tracing::error!(operation, error = ?e, "could not invalidate token");
                }
            }
            tracing::warn!(operation, error = %error, ?delay, "retrying");
            tokio::time::sleep(delay).await;
        }
    }

    /// The authenticated user's channels.
    #[instrument(skip(self))]
    pub async fn get_channels(&self) -> eyre::Result<Vec<ChannelResource>> {
        PagedStream::new(move |token: Option<String>| async move {
            self.execute("list channels", |api| {
                let token = token.clone();
                async move { api.list_channels(token.as_deref()).await }
            })
            .await
            .map(Page::from)
        })
        .try_collect()
        .await
    }

    /// Every broadcast matching the filters, fetched page by page as the stream is consumed.
    pub fn broadcasts(
        &self,
        status: BroadcastStatus,
        kind: BroadcastType,
    ) -> impl Stream<Item = eyre::Result<LiveBroadcast>> + Send + Unpin + '_ {
        PagedStream::new(move |token: Option<String>| async move {
            self.execute("list live broadcasts", |api| {
                let token = token.clone();
                async move {
                    api.list_live_broadcasts(status, kind, token.as_deref())
                        .await
                }
            })
            .await
            .map(Page::from)
        })
    }

    pub fn list_scheduled_livestreams(
        &self,
    ) -> impl Stream<Item = eyre::Result<LiveStream>> + Send + Unpin + '_ {
        self.broadcasts(BroadcastStatus::Upcoming, BroadcastType::Event)
            .map_ok(LiveStream::from)
    }

    pub fn list_completed_livestreams(
        &self,
    ) -> impl Stream<Item = eyre::Result<LiveStream>> + Send + Unpin + '_ {
        self.broadcasts(BroadcastStatus::Completed, BroadcastType::All)
            .map_ok(LiveStream::from)
    }

    /// Completed streams that can be deleted, see [`LiveStream::is_eligible_for_deletion`].
    pub async fn list_eligible_for_deletion(&self) -> eyre::Result<Vec<LiveStream>> {
        let now = Timestamp::now();
        self.list_completed_livestreams()
            .try_filter(|stream| std::future::ready(stream.is_eligible_for_deletion_at(now)))
            .try_collect()
            .await
    }

    /// Upcoming broadcasts keyed by scheduled start time.
    ///
    /// When several broadcasts share a start time the first one listed is kept and a warning is
    /// logged for each of the others. Broadcasts with no scheduled start are left out.
    pub async fn get_scheduled_dates(&self) -> eyre::Result<BTreeMap<Timestamp, String>> {
        let mut dates = BTreeMap::new();
        let mut streams = self.list_scheduled_livestreams();
        while let Some(stream) = streams.try_next().await? {
            let Some(start) = stream.scheduled_start else {
                continue;
            };
            match dates.entry(start) {
                Entry::Vacant(entry) => {
                    entry.insert(stream.id);
                }
                Entry::Occupied(entry) => {
                    tracing::warn!(
                        %start,
                        kept = %entry.get(),
                        duplicate = %stream.id,
                        "more than one broadcast scheduled at the same time"
                    );
                }
            }
        }
        Ok(dates)
    }

    /// Start times shared by two or more upcoming broadcasts, with all of their ids in listing
    /// order.
    pub async fn get_duplicated_schedules_dates(
        &self,
    ) -> eyre::Result<BTreeMap<Timestamp, Vec<String>>> {
        let mut dates: BTreeMap<Timestamp, Vec<String>> = BTreeMap::new();
        let mut streams = self.list_scheduled_livestreams();
        while let Some(stream) = streams.try_next().await? {
            if let Some(start) = stream.scheduled_start {
                dates.entry(start).or_default().push(stream.id);
            }
        }
        dates.retain(|_, ids| ids.len() > 1);
        Ok(dates)
    }

    /// Creates a broadcast and uploads the channel thumbnail for it.
    #[instrument(skip_all, fields(start = %plan.start))]
    pub async fn schedule_broadcast(
        &self,
        plan: &BroadcastPlan,
        dry_run: bool,
    ) -> eyre::Result<ScheduleOutcome> {
        plan.validate()?;
        plan.log("scheduling", dry_run);
        if dry_run {
            return Ok(ScheduleOutcome::NoOp);
        }

        let thumbnail = self.load_thumbnail().await?;
        let request = &plan.to_request(None);
        let broadcast = self
            .execute("insert live broadcast", |api| async move {
                api.insert_live_broadcast(request).await
            })
            .await?;
        tracing::info!(id = %broadcast.id, url = %studio_url(&broadcast.id), "scheduled broadcast");
        self.upload_thumbnail(&broadcast.id, thumbnail)
            .await
            .with_context(|| format!("broadcast {} was created without its thumbnail", broadcast.id))?;
        Ok(ScheduleOutcome::Broadcast(broadcast.id))
    }

    /// Replaces the details of the broadcast `broadcast_id` and re-uploads the thumbnail.
    #[instrument(skip(self, plan), fields(start = %plan.start))]
    pub async fn update_broadcast(
        &self,
        broadcast_id: &str,
        plan: &BroadcastPlan,
        dry_run: bool,
    ) -> eyre::Result<ScheduleOutcome> {
        plan.validate()?;
        plan.log("updating", dry_run);
        if dry_run {
            return Ok(ScheduleOutcome::NoOp);
        }

        let thumbnail = self.load_thumbnail().await?;
        let request = &plan.to_request(Some(broadcast_id));
        let broadcast = self
            .execute("update live broadcast", |api| async move {
                api.update_live_broadcast(request).await
            })
            .await?;
        tracing::info!(id = %broadcast.id, url = %studio_url(&broadcast.id), "updated broadcast");
        self.upload_thumbnail(&broadcast.id, thumbnail)
            .await
            .with_context(|| format!("broadcast {} was updated without its thumbnail", broadcast.id))?;
        Ok(ScheduleOutcome::Broadcast(broadcast.id))
    }

    #[instrument(skip(self))]
    pub async fn delete_broadcast(&self, broadcast_id: &str) -> eyre::Result<()> {
        self.execute("delete live broadcast", |api| async move {
            api.delete_live_broadcast(broadcast_id).await
        })
        .await?;
        tracing::info!(id = broadcast_id, "deleted broadcast");
        Ok(())
    }

    /// Reads the configured thumbnail, if any, so a bad image is caught before anything is sent.
    async fn load_thumbnail(&self) -> eyre::Result<Option<Thumbnail>> {
        let Some(path) = self.thumbnail.as_deref() else {
            return Ok(None);
        };
        let Some(mime_type) = thumbnail_mime_type(path) else {
            eyre::bail!("thumbnail {} is not a JPEG or PNG image", path.display());
        };
        let image = tokio::fs::read(path)
            .await
            .with_context(|| format!("read thumbnail {}", path.display()))?;
        Ok(Some(Thumbnail {
            image: Bytes::from(image),
            mime_type,
        }))
    }

    async fn upload_thumbnail(
        &self,
        video_id: &str,
        thumbnail: Option<Thumbnail>,
    ) -> eyre::Result<()> {
        let Some(thumbnail) = thumbnail else {
            return Ok(());
        };
        let Thumbnail { image, mime_type } = thumbnail;
        self.execute("set thumbnail", |api| {
            let image = image.clone();
            async move { api.set_thumbnail(video_id, image, mime_type).await }
        })
        .await?;
        tracing::info!(id = video_id, "uploaded thumbnail");
        Ok(())
    }
}

struct Thumbnail {
    image: Bytes,
    mime_type: &'static str,
}
