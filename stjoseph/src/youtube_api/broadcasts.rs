//! YouTube Live Broadcasts API types.
//!
//! A broadcast is the viewer-facing side of a live event: title, description, scheduled time,
//! and privacy. Each broadcast corresponds to exactly one YouTube video, which is why its id
//! doubles as the video id for thumbnail uploads.

use crate::youtube_api::types::{Page, PageInfo, serialize_api_datetime};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Response structure for the `liveBroadcasts.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts/list>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastListResponse {
    #[serde(default)]
    pub items: VecDeque<LiveBroadcast>,
    #[serde(default)]
    pub page_info: PageInfo,
    /// Token for the next page in the result set, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl From<LiveBroadcastListResponse> for Page<LiveBroadcast> {
    fn from(response: LiveBroadcastListResponse) -> Self {
        Page {
            items: response.items,
            next_page_token: response.next_page_token,
        }
    }
}

/// A `liveBroadcast` resource.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveBroadcast {
    /// The ID that YouTube assigns to uniquely identify the broadcast.
    pub id: String,
    pub snippet: LiveBroadcastSnippet,
    /// Only present when the request asked for the `status` part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LiveBroadcastStatus>,
}

/// Basic details about the broadcast.
///
/// Every timestamp is optional: absent fields stay `None` rather than taking a default.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// When the broadcast was added to YouTube's live broadcast schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end_time: Option<Timestamp>,
    /// Unset until the broadcast has actually started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<Timestamp>,
    /// Unset until the broadcast has actually ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<Timestamp>,
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#status>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_status: Option<BroadcastLifeCycleStatus>,
    pub privacy_status: PrivacyStatus,
}

/// The broadcast's current lifecycle status.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveBroadcasts#status.lifeCycleStatus>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BroadcastLifeCycleStatus {
    Created,
    Ready,
    TestStarting,
    Testing,
    LiveStarting,
    Live,
    Complete,
    Revoked,
    /// A status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Who can watch the broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn from_public(is_public: bool) -> Self {
        if is_public {
            Self::Public
        } else {
            Self::Private
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Unlisted => write!(f, "unlisted"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// The `broadcastStatus` filter of `liveBroadcasts.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastStatus {
    Active,
    All,
    Completed,
    Upcoming,
}

impl BroadcastStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::All => "all",
            Self::Completed => "completed",
            Self::Upcoming => "upcoming",
        }
    }
}

/// The `broadcastType` filter of `liveBroadcasts.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastType {
    Event,
    Persistent,
    All,
}

impl BroadcastType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Persistent => "persistent",
            Self::All => "all",
        }
    }
}

/// Body of `liveBroadcasts.insert` and `liveBroadcasts.update`.
///
/// `id` is only set for updates; an insert lets YouTube assign one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveBroadcastRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub snippet: LiveBroadcastRequestSnippet,
    pub status: LiveBroadcastRequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastRequestSnippet {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_api_datetime")]
    pub scheduled_start_time: Timestamp,
    #[serde(serialize_with = "serialize_api_datetime")]
    pub scheduled_end_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastRequestStatus {
    pub privacy_status: PrivacyStatus,
    pub self_declared_made_for_kids: bool,
}
