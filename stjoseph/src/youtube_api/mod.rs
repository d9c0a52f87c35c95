//! YouTube Data API v3 wire types and a thin authenticated handle.
//!
//! Nothing in here retries or refreshes credentials; [`crate::channel::Channel`] layers that on
//! top of [`YouTubeApi`].

pub mod broadcasts;
pub mod channels;
pub mod client;
pub mod error;
pub mod types;

pub use broadcasts::{
    BroadcastLifeCycleStatus, BroadcastStatus, BroadcastType, LiveBroadcast,
    LiveBroadcastRequest, LiveBroadcastSnippet, LiveBroadcastStatus, PrivacyStatus,
};
pub use channels::{ChannelResource, ChannelSnippet};
pub use client::{DEFAULT_BASE_URL, YouTubeApi};
pub use error::ApiError;
pub use types::{Page, PageInfo, PagedStream, format_api_datetime};
