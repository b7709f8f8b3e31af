//! Cursor pagination as a lazy sequence of pages.

use std::future::Future;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for the next page. `None` or empty ends the listing.
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CursorState {
    Start,
    Next(String),
    Done,
}

/// Pulls pages from `fetch` until the listing reports a terminal cursor.
///
/// `fetch` receives `None` for the first page and the previous page's cursor
/// afterwards. An empty cursor is treated as the end of the listing, which is
/// the only exit condition.
#[derive(Debug)]
pub struct CursorPages<F> {
    fetch: F,
    state: CursorState,
}

impl<F> CursorPages<F> {
    /// Start a new sequence at the first page.
    pub const fn new(fetch: F) -> Self {
        Self {
            fetch,
            state: CursorState::Start,
        }
    }

    /// Fetch the next page, or `Ok(None)` once the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged; the sequence can be retried from the
    /// same cursor.
    pub async fn next_page<T, E, Fut>(&mut self) -> Result<Option<Vec<T>>, E>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        let cursor = match &self.state {
            CursorState::Start => None,
            CursorState::Next(cursor) => Some(cursor.clone()),
            CursorState::Done => return Ok(None),
        };

        let page = (self.fetch)(cursor).await?;
        self.state = match page.next_cursor {
            Some(next) if !next.is_empty() => CursorState::Next(next),
            _ => CursorState::Done,
        };
        Ok(Some(page.items))
    }

    /// Drain every remaining page into one list, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error.
    pub async fn collect_all<T, E, Fut>(mut self) -> Result<Vec<T>, E>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
