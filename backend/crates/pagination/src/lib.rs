//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] names a one-based page and a page size. Adapters fetch
//! one row more than the page size so [`Page::from_overfetch`] can report
//! whether another page exists without a separate `COUNT(*)` query.
//! [`PageLinks`] renders `self`/`next`/`prev` links for HTTP envelopes.

use serde::{Deserialize, Serialize};
use url::Url;

/// Page size used when a caller does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size accepted by [`PageRequest::new`].
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameter carrying the page number in rendered links.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Errors raised while building page requests or links.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are one-based.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// Page size falls outside `1..=MAX_PAGE_SIZE`.
    #[error("page size must be between 1 and {max}, got {actual}")]
    PageSize {
        /// Rejected page size.
        actual: usize,
        /// Upper bound in force.
        max: usize,
    },
    /// The page offset does not fit in a 64-bit row offset.
    #[error("page {page} is out of range")]
    OutOfRange {
        /// Rejected page number.
        page: u32,
    },
}

/// A validated request for one page of results.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid request");
/// assert_eq!(request.offset(), 20);
/// assert_eq!(request.fetch_limit(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: usize,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPage`] for page `0`,
    /// [`PaginationError::PageSize`] when the size is outside
    /// `1..=MAX_PAGE_SIZE`, and [`PaginationError::OutOfRange`] when the row
    /// offset would overflow.
    pub fn new(page: u32, page_size: usize) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSize {
                actual: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        let request = Self { page, page_size };
        request
            .checked_offset()
            .ok_or(PaginationError::OutOfRange { page })?;
        Ok(request)
    }

    /// First page with the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageSize`] for an out-of-range size.
    pub fn first(page_size: usize) -> Result<Self, PaginationError> {
        Self::new(1, page_size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    fn checked_offset(&self) -> Option<u64> {
        let size = u64::try_from(self.page_size).ok()?;
        u64::from(self.page - 1).checked_mul(size)
    }

    /// Number of rows to skip before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        // Validated in `new`.
        self.checked_offset().unwrap_or(u64::MAX)
    }

    /// Rows an adapter should fetch: one extra to detect a following page.
    #[must_use]
    pub const fn fetch_limit(&self) -> usize {
        self.page_size + 1
    }

    /// Request for the following page.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        Self::new(page, self.page_size).ok()
    }

    /// Request for the preceding page, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        (self.page > 1).then(|| Self {
            page: self.page - 1,
            page_size: self.page_size,
        })
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in query order.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Requested rows per page.
    pub page_size: usize,
    /// Whether at least one further row exists after this page.
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`PageRequest::fetch_limit`].
    ///
    /// Rows beyond the page size are dropped and only flag `has_next`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(1, 2).expect("valid request");
    /// let page = Page::from_overfetch(request, vec![1, 2, 3]);
    /// assert_eq!(page.items, vec![1, 2]);
    /// assert!(page.has_next);
    /// ```
    #[must_use]
    pub fn from_overfetch(request: PageRequest, mut rows: Vec<T>) -> Self {
        let has_next = rows.len() > request.page_size;
        rows.truncate(request.page_size);
        Self {
            items: rows,
            page: request.page,
            page_size: request.page_size,
            has_next,
        }
    }

    /// Empty page for the given request.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.page,
            page_size: request.page_size,
            has_next: false,
        }
    }

    /// Transform each item while keeping page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            has_next: self.has_next,
        }
    }

    /// Request that reproduces this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Navigation links for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    /// Link to the current page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Link to the following page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PageLinks {
    /// Render links for `page` relative to `base`.
    ///
    /// Existing `page` parameters on `base` are replaced; other query
    /// parameters are preserved.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageLinks, PageRequest};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost/api/v1/history/rider").expect("url");
    /// let request = PageRequest::new(2, 1).expect("valid request");
    /// let page = Page::from_overfetch(request, vec!["a", "b"]);
    /// let links = PageLinks::for_page(&base, &page);
    /// assert_eq!(links.next.as_deref(), Some("http://localhost/api/v1/history/rider?page=3"));
    /// assert_eq!(links.prev.as_deref(), Some("http://localhost/api/v1/history/rider?page=1"));
    /// ```
    #[must_use]
    pub fn for_page<T>(base: &Url, page: &Page<T>) -> Self {
        let request = page.request();
        let next = page
            .has_next
            .then(|| request.next())
            .flatten()
            .map(|next| page_url(base, next.page()));
        let prev = request.previous().map(|prev| page_url(base, prev.page()));
        Self {
            self_: page_url(base, request.page()),
            next,
            prev,
        }
    }
}

fn page_url(base: &Url, page: u32) -> String {
    let mut url = base.clone();
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_QUERY_PARAM, &page.to_string());
    }
    url.into()
}
