//! Cursor pagination for Dynatrace API v2 list endpoints.
//!
//! List endpoints return one page of items under a resource-specific key
//! (`"entities"`, `"types"`, ...) together with an optional `nextPageKey`.
//! Follow-up requests carry only that key; the server remembers the
//! original query.

use std::collections::VecDeque;

use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::DynatraceClient;
use crate::error::{DynatraceError, Result};

/// Default maximum number of pages a single list will fetch (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// A page of results from the Dynatrace API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if reported).
    pub total_count: Option<u64>,
    /// Cursor for the next page, `None` on the last page.
    pub next_page_key: Option<String>,
}

impl<T> Page<T> {
    /// Create a new page from items and cursor info.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: Option<u64>, next_page_key: Option<String>) -> Self {
        Self {
            items,
            total_count,
            next_page_key,
        }
    }

    /// Whether the server reported another page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page_key.is_some()
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a raw list response, reading items from `list_item`.
    ///
    /// A missing or null item key yields an empty page. Any other
    /// non-array value is a parse error.
    pub fn from_response(mut body: Value, list_item: &str) -> Result<Self> {
        let items = match body.get_mut(list_item).map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value(raw)?,
        };

        let next_page_key = body
            .get("nextPageKey")
            .and_then(Value::as_str)
            .map(str::to_string);
        let total_count = body.get("totalCount").and_then(Value::as_u64);

        Ok(Self::new(items, total_count, next_page_key))
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug)]
enum Cursor<Q> {
    Start(Q),
    Next(String),
    Done,
}

/// A lazy, forward-only sequence over a paginated list endpoint.
///
/// Creating one performs no I/O. Pages are fetched as the list is driven
/// through [`next_page`](Self::next_page), [`try_next`](Self::try_next),
/// [`collect_all`](Self::collect_all) or [`into_stream`](Self::into_stream).
/// A failed fetch leaves the cursor in place, so the same page can be
/// requested again. At most [`MAX_PAGES`] pages are fetched unless changed
/// with [`with_max_pages`](Self::with_max_pages); past that the list ends
/// with a warning.
///
/// # Example
///
/// ```no_run
/// use dtapi::DynatraceClient;
///
/// # async fn example() -> dtapi::Result<()> {
/// let client = DynatraceClient::from_env()?;
/// let mut hosts = client.entities().list("type(HOST)");
///
/// while let Some(host) = hosts.try_next().await? {
///     println!("{:?}", host.display_name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedList<'a, T, Q> {
    client: &'a DynatraceClient,
    path: &'static str,
    list_item: &'static str,
    cursor: Cursor<Q>,
    buffer: VecDeque<T>,
    total_count: Option<u64>,
    pages_fetched: u32,
    max_pages: u32,
}

impl<T, Q: std::fmt::Debug> std::fmt::Debug for PaginatedList<'_, T, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedList")
            .field("path", &self.path)
            .field("list_item", &self.list_item)
            .field("cursor", &self.cursor)
            .field("buffered", &self.buffer.len())
            .field("pages_fetched", &self.pages_fetched)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl<'a, T, Q> PaginatedList<'a, T, Q>
where
    T: DeserializeOwned,
    Q: Serialize,
{
    /// Create a list over `path`, reading each page's items from `list_item`.
    pub fn new(
        client: &'a DynatraceClient,
        path: &'static str,
        list_item: &'static str,
        query: Q,
    ) -> Self {
        Self {
            client,
            path,
            list_item,
            cursor: Cursor::Start(query),
            buffer: VecDeque::new(),
            total_count: None,
            pages_fetched: 0,
            max_pages: MAX_PAGES,
        }
    }

    /// Override the page limit.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Total item count reported by the most recent page, if any.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// True once every page has been fetched and handed out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.cursor, Cursor::Done) && self.buffer.is_empty()
    }

    /// Fetch the next page.
    ///
    /// Items already buffered by [`try_next`](Self::try_next) are returned
    /// first, as a page of their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        if !self.buffer.is_empty() {
            let next_page_key = match &self.cursor {
                Cursor::Next(key) => Some(key.clone()),
                _ => None,
            };
            let items = self.buffer.drain(..).collect();
            return Ok(Some(Page::new(items, self.total_count, next_page_key)));
        }

        self.fetch_page().await
    }

    /// Fetch the next single item, requesting a new page when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a page request fails.
    pub async fn try_next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            match self.fetch_page().await? {
                Some(page) => self.buffer.extend(page.items),
                None => return Ok(None),
            }
        }
    }

    /// Drain every remaining page into a vector.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all_items: Vec<T> = self.buffer.drain(..).collect();

        while let Some(page) = self.fetch_page().await? {
            all_items.extend(page.items);
        }

        Ok(all_items)
    }

    /// Turn the list into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + 'a
    where
        T: 'a,
        Q: 'a,
    {
        futures::stream::try_unfold(self, |mut list| async move {
            let item = list.try_next().await?;
            Ok::<_, DynatraceError>(item.map(|item| (item, list)))
        })
    }

    async fn fetch_page(&mut self) -> Result<Option<Page<T>>> {
        if self.pages_fetched >= self.max_pages && !matches!(self.cursor, Cursor::Done) {
            tracing::warn!(
                path = self.path,
                "Reached pagination limit of {} pages, stopping",
                self.max_pages
            );
            self.cursor = Cursor::Done;
            return Ok(None);
        }

        let response = match &self.cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start(query) => self.client.get_with_query(self.path, query).await?,
            Cursor::Next(key) => {
                self.client
                    .get_with_query(self.path, &[("nextPageKey", key.as_str())])
                    .await?
            }
        };

        let body: Value = response.json().await.map_err(DynatraceError::HttpError)?;
        let page = Page::from_response(body, self.list_item)?;

        self.pages_fetched += 1;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
        self.cursor = match &page.next_page_key {
            Some(key) => Cursor::Next(key.clone()),
            None => Cursor::Done,
        };

        tracing::debug!(
            path = self.path,
            page = self.pages_fetched,
            items = page.len(),
            has_more = page.has_more(),
            "fetched page"
        );

        Ok(Some(page))
    }
}
