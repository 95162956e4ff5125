//! Blocking pagination.

use std::collections::VecDeque;
use std::fmt;

use crate::client::paginated::{PageCursor, PageRequest};
use crate::Result;

/// An iterator that lazily fetches pages from a list endpoint.
///
/// Blocking counterpart of [`PaginatedStream`](crate::PaginatedStream):
/// the same [`PageCursor`] decides which page comes next. Iteration ends
/// after the first error.
///
/// # Example
///
/// ```no_run
/// use domo_sdk::blocking::DomoClient;
/// use domo_sdk::PageOptions;
///
/// # fn example(client: DomoClient) -> domo_sdk::Result<()> {
/// for user in client.users().list_stream(PageOptions::new().per_page(25))? {
///     println!("{}", user?["email"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageIter<T, F>
where
    F: FnMut(PageRequest) -> Result<Vec<T>>,
{
    fetch_page: F,
    cursor: PageCursor,
    current_items: VecDeque<T>,
}

impl<T, F> PageIter<T, F>
where
    F: FnMut(PageRequest) -> Result<Vec<T>>,
{
    /// Create an iterator driven by `cursor`, calling `fetch_page` for
    /// each page.
    pub fn new(cursor: PageCursor, fetch_page: F) -> Self {
        Self {
            fetch_page,
            cursor,
            current_items: VecDeque::new(),
        }
    }

    /// Drain the iterator into a `Vec`, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<T>> {
        self.collect()
    }
}

impl<T, F> Iterator for PageIter<T, F>
where
    F: FnMut(PageRequest) -> Result<Vec<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current_items.pop_front() {
                return Some(Ok(item));
            }

            let page = self.cursor.next_page()?;
            match (self.fetch_page)(page) {
                Ok(items) => {
                    self.current_items = self.cursor.take_page(items).into();
                    if self.current_items.is_empty() {
                        return None;
                    }
                }
                Err(e) => {
                    self.cursor.stop();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T, F> fmt::Debug for PageIter<T, F>
where
    F: FnMut(PageRequest) -> Result<Vec<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIter")
            .field("cursor", &self.cursor)
            .field("buffered", &self.current_items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::paginated::PageAdvance;
    use crate::Error;

    #[test]
    fn test_iterates_until_empty_page() {
        let cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize).unwrap();
        let mut pages = vec![vec![1, 2], vec![3, 4], vec![5], vec![]].into_iter();
        let mut offsets = Vec::new();

        let items = PageIter::new(cursor, |page: PageRequest| {
            offsets.push(page.offset);
            Ok(pages.next().unwrap_or_default())
        })
        .collect_all()
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_short_page_ends_iteration() {
        let cursor = PageCursor::new(3, 0, None, PageAdvance::StopOnShortPage).unwrap();
        let mut calls = 0;

        let items: Vec<u32> = PageIter::new(cursor, |_| {
            calls += 1;
            Ok(vec![7, 8])
        })
        .collect_all()
        .unwrap();

        assert_eq!(items, vec![7, 8]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_error_ends_iteration() {
        let cursor = PageCursor::new(2, 0, None, PageAdvance::DeclaredSize).unwrap();
        let mut iter = PageIter::new(cursor, |_| -> Result<Vec<u32>> {
            Err(Error::RateLimited { retry_after: None })
        });

        assert!(matches!(iter.next(), Some(Err(Error::RateLimited { .. }))));
        assert!(iter.next().is_none());
    }
}
