//! Shared types and streaming infrastructure for the YouTube API client.

use jiff::Timestamp;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

/// Fixed UTC format used for every timestamp sent to the API.
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Renders a timestamp the way the broadcast endpoints expect it.
pub fn format_api_datetime(timestamp: Timestamp) -> String {
    timestamp.strftime(API_DATETIME_FORMAT).to_string()
}

pub(crate) fn serialize_api_datetime<S>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_api_datetime(*timestamp))
}

/// One page of a list endpoint's results.
#[derive(Debug)]
pub struct Page<T> {
    pub items: VecDeque<T>,
    /// Cursor for the following page; `None` on the last page.
    pub next_page_token: Option<String>,
}

type PendingPage<'a, F, T> = Pin<Box<dyn Future<Output = eyre::Result<(F, Page<T>)>> + Send + 'a>>;

/// A lazily paginated stream over a YouTube API list endpoint.
///
/// The fetcher is called with `None` for the first page and with the server's `nextPageToken`
/// for every page after that. Items are yielded in the order the server delivered them, and
/// iteration ends on the first page that carries no next-page token. A failed page fetch is
/// yielded as an error and ends the stream.
pub struct PagedStream<'a, T, F> {
    buffered: VecDeque<T>,
    pending: Option<PendingPage<'a, F, T>>,
    pages: usize,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + 'a,
        Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
    {
        let first = async move {
            let page = fetcher(None).await?;
            Ok((fetcher, page))
        };
        Self {
            buffered: VecDeque::new(),
            pending: Some(Box::pin(first)),
            pages: 0,
        }
    }
}

impl<T: Unpin, F> Unpin for PagedStream<'_, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
{
    type Item = eyre::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }
            let Some(pending) = self.pending.as_mut() else {
                return Poll::Ready(None);
            };
            match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    self.pending = None;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Ok((fetcher, page))) => {
                    self.pages += 1;
                    tracing::debug!(
                        page = self.pages,
                        items = page.items.len(),
                        more = page.next_page_token.is_some(),
                        "fetched page"
                    );
                    self.buffered.extend(page.items);
                    self.pending = match page.next_page_token {
                        Some(token) => Some(Box::pin(async move {
                            let page = fetcher(Some(token)).await?;
                            Ok((fetcher, page))
                        })),
                        None => None,
                    };
                }
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(default)]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(default)]
    pub results_per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tokio_stream::StreamExt;

    #[test]
    fn api_datetime_is_fixed_utc() {
        let ts: Timestamp = "2024-03-02T17:30:00-05:00".parse().unwrap();
        assert_eq!(format_api_datetime(ts), "2024-03-02T22:30:00Z");
    }

    #[tokio::test]
    async fn follows_page_tokens_in_order() {
        let seen = Mutex::new(Vec::new());
        let stream = PagedStream::new(|token: Option<String>| {
            seen.lock().unwrap().push(token.clone());
            async move {
                Ok(match token.as_deref() {
                    None => Page {
                        items: VecDeque::from([1, 2]),
                        next_page_token: Some("b".to_string()),
                    },
                    Some("b") => Page {
                        items: VecDeque::new(),
                        next_page_token: Some("c".to_string()),
                    },
                    Some("c") => Page {
                        items: VecDeque::from([3]),
                        next_page_token: None,
                    },
                    Some(other) => panic!("unexpected token {other}"),
                })
            }
        });
        let items: Vec<i32> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("b".to_string()), Some("c".to_string())]
        );
    }

    #[tokio::test]
    async fn page_error_ends_the_stream() {
        let stream = PagedStream::new(|token: Option<String>| async move {
            match token {
                None => Ok(Page {
                    items: VecDeque::from(["a"]),
                    next_page_token: Some("next".to_string()),
                }),
                Some(_) => Err(eyre::eyre!("boom")),
            }
        });
        let results: Vec<_> = stream.collect().await;
        assert_eq!(results.len(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), "a");
        assert!(results[1].is_err());
    }
}
