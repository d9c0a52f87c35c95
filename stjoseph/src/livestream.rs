//! The scheduler's view of a broadcast.

use crate::youtube_api::LiveBroadcast;
use jiff::{SignedDuration, Timestamp};
use std::fmt;

/// Completed streams shorter than this are considered aborted and may be deleted.
pub const MIN_KEPT_DURATION: SignedDuration = SignedDuration::from_mins(15);

/// Width that descriptions are cut to when logged or listed.
pub const MAX_FIELD_LEN: usize = 25;

/// A broadcast as listed from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStream {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published: Option<Timestamp>,
    pub scheduled_start: Option<Timestamp>,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
}

impl From<LiveBroadcast> for LiveStream {
    fn from(broadcast: LiveBroadcast) -> Self {
        let snippet = broadcast.snippet;
        Self {
            id: broadcast.id,
            title: snippet.title,
            description: snippet.description,
            published: snippet.published_at,
            scheduled_start: snippet.scheduled_start_time,
            actual_start: snippet.actual_start_time,
            actual_end: snippet.actual_end_time,
        }
    }
}

impl LiveStream {
    /// How long the stream actually ran, known only once it has both started and ended.
    pub fn duration(&self) -> Option<SignedDuration> {
        Some(self.actual_end?.duration_since(self.actual_start?))
    }

    /// Whether a completed stream can be deleted as of `now`.
    ///
    /// A stream qualifies when its scheduled start is not in the future and it was either never
    /// published, never ran to completion, or ran for less than [`MIN_KEPT_DURATION`]. A stream
    /// without a scheduled start is treated as not being in the future.
    pub fn is_eligible_for_deletion_at(&self, now: Timestamp) -> bool {
        if self.scheduled_start.is_some_and(|start| start > now) {
            return false;
        }
        self.published.is_none()
            || self
                .duration()
                .is_none_or(|duration| duration < MIN_KEPT_DURATION)
    }

    pub fn is_eligible_for_deletion(&self) -> bool {
        self.is_eligible_for_deletion_at(Timestamp::now())
    }
}

impl fmt::Display for LiveStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheduled = match self.scheduled_start {
            Some(start) => start.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "id='{}' title='{}' description='{}' scheduled='{}'",
            self.id,
            self.title,
            truncate(&self.description, MAX_FIELD_LEN),
            scheduled
        )
    }
}

/// Flattens `text` onto one line and cuts it to at most `max` characters, preferring to cut at
/// the last space that fits.
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    let Some((cut, _)) = flat.char_indices().nth(max) else {
        return flat;
    };
    let head = &flat[..cut];
    match head.rfind(' ') {
        Some(space) => head[..space].to_string(),
        None => head.to_string(),
    }
}
