//! Offset/limit pagination.
//!
//! All list endpoints take `limit` and `offset` query parameters, with at
//! most [`MAX_PAGE_SIZE`] items per page. [`PageCursor`] holds the page
//! boundary arithmetic once; [`PaginatedStream`] (async) and
//! [`blocking::PageIter`](crate::blocking::PageIter) drive it.
//!
//! Endpoints disagree on what a short page means, so the cursor supports
//! two [`PageAdvance`] policies. Each list operation documents which one
//! it uses.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, TryStreamExt};
use serde::Serialize;

use crate::{Error, Result};

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

/// How the cursor moves after a non-empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdvance {
    /// Advance the offset by the requested page size and stop only on an
    /// empty page.
    DeclaredSize,
    /// Advance the offset by the number of items returned and stop as soon
    /// as a page comes back shorter than requested.
    StopOnShortPage,
}

/// `limit`/`offset` query parameters for one page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Items requested
    pub limit: u32,
    /// Offset of the first item
    pub offset: u64,
}

impl PageRequest {
    /// A single page request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `limit` is outside `1..=50`.
    pub fn new(limit: u32, offset: u64) -> Result<Self> {
        check_page_size(limit)?;
        Ok(Self { limit, offset })
    }
}

fn check_page_size(page_size: u32) -> Result<()> {
    if (1..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "per_page must be between 1 and {MAX_PAGE_SIZE} (inclusive), got {page_size}"
        )))
    }
}

/// Caller-facing pagination options.
///
/// # Example
///
/// ```
/// use domo_sdk::PageOptions;
///
/// // At most 120 items, fetched 25 at a time
/// let options = PageOptions::new().per_page(25).limit(120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Items per page, `1..=50`
    pub per_page: u32,
    /// Starting offset
    pub offset: u64,
    /// Overall item cap. `None` or `Some(0)` means unlimited.
    pub limit: Option<u64>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            offset: 0,
            limit: None,
        }
    }
}

impl PageOptions {
    /// Default options: 50 per page from offset 0, unlimited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the starting offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Cap the total number of items.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build a cursor for these options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `per_page` is outside `1..=50`.
    pub fn cursor(&self, advance: PageAdvance) -> Result<PageCursor> {
        PageCursor::new(self.per_page, self.offset, self.limit, advance)
    }
}

/// Position within a paginated listing.
///
/// ```
/// use domo_sdk::{PageAdvance, PageCursor};
///
/// let mut cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize)?;
///
/// let first = cursor.next_page().unwrap();
/// assert_eq!((first.limit, first.offset), (2, 0));
/// assert_eq!(cursor.take_page(vec!["a", "b"]), vec!["a", "b"]);
///
/// let second = cursor.next_page().unwrap();
/// assert_eq!(second.offset, 2);
/// assert!(cursor.take_page(Vec::<&str>::new()).is_empty());
/// assert!(cursor.next_page().is_none());
/// # Ok::<(), domo_sdk::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PageCursor {
    page_size: u32,
    offset: u64,
    limit: Option<u64>,
    emitted: u64,
    advance: PageAdvance,
    exhausted: bool,
}

impl PageCursor {
    /// Create a cursor.
    ///
    /// A `limit` of `Some(0)` is treated as unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `page_size` is outside `1..=50`.
    pub fn new(
        page_size: u32,
        offset: u64,
        limit: Option<u64>,
        advance: PageAdvance,
    ) -> Result<Self> {
        check_page_size(page_size)?;

        Ok(Self {
            page_size,
            offset,
            limit: limit.filter(|&l| l > 0),
            emitted: 0,
            advance,
            exhausted: false,
        })
    }

    /// The next page to fetch, or `None` once the listing is finished.
    pub fn next_page(&self) -> Option<PageRequest> {
        if self.exhausted {
            return None;
        }
        Some(PageRequest {
            limit: self.effective_page_size(),
            offset: self.offset,
        })
    }

    /// Record a fetched page and return the items to emit from it.
    ///
    /// Items past the overall limit are dropped.
    pub fn take_page<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        if self.exhausted {
            return Vec::new();
        }
        if items.is_empty() {
            self.exhausted = true;
            return items;
        }

        let requested = self.effective_page_size();
        let returned = items.len() as u64;

        if let Some(limit) = self.limit {
            let remaining = limit - self.emitted;
            if returned >= remaining {
                items.truncate(remaining as usize);
                self.emitted = limit;
                self.exhausted = true;
                return items;
            }
        }
        self.emitted += returned;

        match self.advance {
            PageAdvance::DeclaredSize => self.advance_offset(u64::from(requested)),
            PageAdvance::StopOnShortPage => {
                if returned < u64::from(requested) {
                    self.exhausted = true;
                } else {
                    self.advance_offset(returned);
                }
            }
        }
        items
    }

    /// Move past `by` items; an offset that would overflow ends the listing.
    fn advance_offset(&mut self, by: u64) {
        match self.offset.checked_add(by) {
            Some(offset) => self.offset = offset,
            None => self.exhausted = true,
        }
    }

    /// Items emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Whether no further pages will be requested.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// End the listing early, e.g. after a failed fetch.
    pub(crate) fn stop(&mut self) {
        self.exhausted = true;
    }

    fn effective_page_size(&self) -> u32 {
        match self.limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.emitted);
                u32::try_from(remaining).map_or(self.page_size, |r| r.min(self.page_size))
            }
            None => self.page_size,
        }
    }
}

/// Boxed future returned by page-fetch callbacks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type FetchPage<T> = Box<dyn Fn(PageRequest) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;

/// A stream that lazily fetches pages from a list endpoint.
///
/// Pages are fetched one at a time, in increasing-offset order, only when
/// the items of the previous page have been consumed. The stream ends
/// after the first error.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use domo_sdk::PageOptions;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let mut stream = client
///     .datasets()
///     .list_stream(PageOptions::new().limit(200), Default::default())?;
///
/// while let Some(result) = stream.next().await {
///     let dataset = result?;
///     println!("{}", dataset["name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    fetch_page: FetchPage<T>,
    cursor: PageCursor,
    current_items: VecDeque<T>,
    pending_fetch: Option<BoxFuture<'static, Result<Vec<T>>>>,
}

impl<T> PaginatedStream<T>
where
    T: Send + 'static,
{
    /// Create a stream driven by `cursor`, calling `fetch_page` for each page.
    pub fn new<F>(cursor: PageCursor, fetch_page: F) -> Self
    where
        F: Fn(PageRequest) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            cursor,
            current_items: VecDeque::new(),
            pending_fetch: None,
        }
    }

    /// Drain the stream into a `Vec`, stopping at the first error.
    pub async fn collect_all(self) -> Result<Vec<T>> {
        self.try_collect().await
    }
}

impl<T> Stream for PaginatedStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(fut) = this.pending_fetch.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(items)) => {
                        this.pending_fetch = None;
                        this.current_items = this.cursor.take_page(items).into();
                        if this.current_items.is_empty() {
                            return Poll::Ready(None);
                        }
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.cursor.stop();
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            match this.cursor.next_page() {
                Some(page) => this.pending_fetch = Some((this.fetch_page)(page)),
                None => return Poll::Ready(None),
            }
        }
    }
}

impl<T> Unpin for PaginatedStream<T> {}

impl<T> std::fmt::Debug for PaginatedStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedStream")
            .field("cursor", &self.cursor)
            .field("buffered", &self.current_items.len())
            .field("fetching", &self.pending_fetch.is_some())
            .finish()
    }
}

/// `limit`/`offset` merged with endpoint-specific query parameters.
#[derive(Serialize)]
pub(crate) struct PaginationQuery<'a, Q: ?Sized> {
    pub(crate) limit: u32,
    pub(crate) offset: u64,
    #[serde(flatten)]
    pub(crate) extra: &'a Q,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures_util::StreamExt;
    use proptest::prelude::*;

    use super::*;

    /// Run a cursor over scripted pages, returning emitted items and the
    /// page requests made.
    fn drive(mut cursor: PageCursor, mut pages: Vec<Vec<u32>>) -> (Vec<u32>, Vec<PageRequest>) {
        pages.reverse();
        let mut items = Vec::new();
        let mut requests = Vec::new();
        while let Some(request) = cursor.next_page() {
            requests.push(request);
            let page = pages.pop().unwrap_or_default();
            items.extend(cursor.take_page(page));
        }
        (items, requests)
    }

    fn scripted_stream(
        cursor: PageCursor,
        pages: Vec<Vec<u32>>,
    ) -> (PaginatedStream<u32>, Arc<Mutex<Vec<PageRequest>>>) {
        let pages = Arc::new(Mutex::new(pages.into_iter().collect::<VecDeque<_>>()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let stream = PaginatedStream::new(cursor, move |page| {
            seen.lock().unwrap().push(page);
            let next = pages.lock().unwrap().pop_front().unwrap_or_default();
            Box::pin(async move { Ok(next) })
        });
        (stream, calls)
    }

    #[test]
    fn test_page_size_bounds() {
        for size in [0, 51, 1000] {
            assert!(matches!(
                PageCursor::new(size, 0, None, PageAdvance::DeclaredSize),
                Err(Error::Validation(_))
            ));
        }
        assert!(PageCursor::new(1, 0, None, PageAdvance::DeclaredSize).is_ok());
        assert!(PageCursor::new(50, 0, None, PageAdvance::DeclaredSize).is_ok());
    }

    #[test]
    fn test_two_pages_then_empty() {
        let cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize).unwrap();
        let (items, requests) = drive(cursor, vec![vec![1, 2], vec![3, 4], vec![]]);
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(
            requests,
            vec![
                PageRequest { limit: 2, offset: 0 },
                PageRequest { limit: 2, offset: 2 },
                PageRequest { limit: 2, offset: 4 },
            ]
        );
    }

    #[test]
    fn test_limit_reached_within_first_page() {
        let cursor = PageCursor::new(50, 0, Some(3), PageAdvance::DeclaredSize).unwrap();
        let (items, requests) = drive(cursor, vec![vec![1, 2, 3, 4, 5]]);
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(requests, vec![PageRequest { limit: 3, offset: 0 }]);
    }

    #[test]
    fn test_final_page_is_not_over_fetched() {
        let cursor = PageCursor::new(4, 10, Some(6), PageAdvance::DeclaredSize).unwrap();
        let (items, requests) = drive(cursor, vec![vec![1, 2, 3, 4], vec![5, 6]]);
        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            requests,
            vec![
                PageRequest { limit: 4, offset: 10 },
                PageRequest { limit: 2, offset: 14 },
            ]
        );
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let cursor = PageCursor::new(2, 0, Some(0), PageAdvance::DeclaredSize).unwrap();
        let (items, _) = drive(cursor, vec![vec![1, 2], vec![3], vec![]]);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_declared_size_continues_after_short_page() {
        let cursor = PageCursor::new(3, 0, None, PageAdvance::DeclaredSize).unwrap();
        let (items, requests) = drive(cursor, vec![vec![1], vec![2], vec![]]);
        assert_eq!(items, vec![1, 2]);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].offset, 3);
    }

    #[test]
    fn test_stop_on_short_page() {
        let cursor = PageCursor::new(3, 0, None, PageAdvance::StopOnShortPage).unwrap();
        let (items, requests) = drive(cursor, vec![vec![1, 2, 3], vec![4], vec![5]]);
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(
            requests,
            vec![
                PageRequest { limit: 3, offset: 0 },
                PageRequest { limit: 3, offset: 3 },
            ]
        );
    }

    #[test]
    fn test_offset_overflow_ends_listing() {
        for advance in [PageAdvance::DeclaredSize, PageAdvance::StopOnShortPage] {
            let mut cursor = PageCursor::new(2, u64::MAX - 1, None, advance).unwrap();
            let request = cursor.next_page().unwrap();
            assert_eq!(request.offset, u64::MAX - 1);

            assert_eq!(cursor.take_page(vec![1, 2]), vec![1, 2]);
            assert!(cursor.is_exhausted());
            assert!(cursor.next_page().is_none());
        }
    }

    #[test]
    fn test_pagination_query_flattens_extra() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Extra {
            name_like: &'static str,
        }

        let query = PaginationQuery {
            limit: 50,
            offset: 100,
            extra: &Extra { name_like: "sales" },
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"limit": 50, "offset": 100, "nameLike": "sales"})
        );
    }

    #[tokio::test]
    async fn test_stream_yields_items_lazily() {
        let cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize).unwrap();
        let (mut stream, calls) = scripted_stream(cursor, vec![vec![1, 2], vec![3, 4], vec![]]);

        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), 2);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), 3);
        assert_eq!(calls.lock().unwrap().len(), 2);

        let rest: Vec<u32> = stream.collect_all().await.unwrap();
        assert_eq!(rest, vec![4]);
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stream_stops_after_error() {
        let cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize).unwrap();
        let calls = Arc::new(Mutex::new(0));
        let seen = calls.clone();
        let mut stream = PaginatedStream::<u32>::new(cursor, move |page| {
            *seen.lock().unwrap() += 1;
            Box::pin(async move {
                if page.offset == 0 {
                    Ok(vec![1, 2])
                } else {
                    Err(Error::RateLimited { retry_after: None })
                }
            })
        });

        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), 2);
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    fn pages_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
        prop::collection::vec(prop::collection::vec(any::<u32>(), 0..8), 0..8)
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_limit(
            per_page in 1u32..=50,
            limit in 0u64..40,
            pages in pages_strategy(),
        ) {
            let cursor = PageCursor::new(per_page, 0, Some(limit), PageAdvance::DeclaredSize).unwrap();
            let (items, _) = drive(cursor, pages.clone());

            // Emitted items are the concatenation of pages up to the first
            // empty one, truncated at the limit.
            let expected: Vec<u32> = pages
                .iter()
                .take_while(|p| !p.is_empty())
                .flatten()
                .copied()
                .collect();
            let expected_len = if limit == 0 {
                expected.len()
            } else {
                expected.len().min(limit as usize)
            };
            prop_assert_eq!(&items[..], &expected[..expected_len]);
        }

        #[test]
        fn prop_requests_never_exceed_remaining(
            per_page in 1u32..=50,
            limit in 1u64..200,
            advance in prop_oneof![Just(PageAdvance::DeclaredSize), Just(PageAdvance::StopOnShortPage)],
            pages in pages_strategy(),
        ) {
            let mut cursor = PageCursor::new(per_page, 0, Some(limit), advance).unwrap();
            let mut pages = pages.into_iter();
            while let Some(request) = cursor.next_page() {
                prop_assert!(request.limit >= 1);
                prop_assert!(request.limit <= per_page);
                prop_assert!(u64::from(request.limit) <= limit - cursor.emitted());
                let page = pages.next().unwrap_or_default();
                cursor.take_page(page);
            }
            prop_assert!(cursor.emitted() <= limit);
        }

        #[test]
        fn prop_offsets_strictly_increase(
            per_page in 1u32..=50,
            start in 0u64..1000,
            advance in prop_oneof![Just(PageAdvance::DeclaredSize), Just(PageAdvance::StopOnShortPage)],
            pages in pages_strategy(),
        ) {
            let cursor = PageCursor::new(per_page, start, None, advance).unwrap();
            let (_, requests) = drive(cursor, pages);
            prop_assert_eq!(requests[0].offset, start);
            for pair in requests.windows(2) {
                prop_assert!(pair[1].offset > pair[0].offset);
            }
        }

        #[test]
        fn prop_invalid_page_size_rejected(per_page in prop_oneof![Just(0u32), 51u32..10_000]) {
            prop_assert!(matches!(
                PageCursor::new(per_page, 0, None, PageAdvance::DeclaredSize),
                Err(Error::Validation(_))
            ));
        }
    }
}
