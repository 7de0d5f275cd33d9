//! Page-number pagination primitives shared by listing endpoints.
//!
//! A [`PageRequest`] carries the validated 1-based page number and page size
//! supplied by a client. Adapters translate it into `LIMIT`/`OFFSET` pairs,
//! count the full result set, and wrap the slice in a [`Page`] envelope that
//! reports totals and, once [`Page::with_links`] is applied, navigation URLs.
//!
//! Links preserve every query parameter of the originating request apart from
//! `page`, so filters such as `from`/`to` survive navigation.

use serde::{Deserialize, Serialize};
use url::Url;

/// Page size applied when the client does not request one.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

const PAGE_PARAM: &str = "page";

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// Page size fell outside `1..=MAX_PER_PAGE`.
    #[error("per_page must be between 1 and {max}, got {value}")]
    PerPageOutOfRange {
        /// Requested page size.
        value: u32,
        /// Upper bound accepted by the API.
        max: u32,
    },
}

/// Validated page coordinates.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= per_page <= MAX_PER_PAGE`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid page");
/// assert_eq!(request.offset(), 40);
/// assert_eq!(request.limit(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate explicit page coordinates.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` is out
    /// of range.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange {
                value: per_page,
                max: MAX_PER_PAGE,
            });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query parameters.
    ///
    /// Missing values fall back to page 1 and `default_per_page`.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied or defaulted value is
    /// invalid.
    pub const fn from_query(
        page: Option<u32>,
        per_page: Option<u32>,
        default_per_page: u32,
    ) -> Result<Self, PageRequestError> {
        let resolved_page = match page {
            Some(value) => value,
            None => 1,
        };
        let resolved_per_page = match per_page {
            Some(value) => value,
            None => default_per_page,
        };
        Self::new(resolved_page, resolved_per_page)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64).saturating_mul(self.per_page as u64)
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Totals describing where a page sits in the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number that was served.
    pub current_page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Number of items across all pages.
    pub total: u64,
    /// Last page number; `1` when the result set is empty.
    pub last_page: u32,
    /// 1-based position of the first item on this page, if any.
    pub from: Option<u64>,
    /// 1-based position of the last item on this page, if any.
    pub to: Option<u64>,
}

/// Navigation URLs for a page. Absent links are serialised as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    /// Link to page 1.
    pub first: Option<String>,
    /// Link to the last page.
    pub last: Option<String>,
    /// Link to the previous page when one exists.
    pub prev: Option<String>,
    /// Link to the next page when one exists.
    pub next: Option<String>,
}

/// A single page of items plus totals and navigation links.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::new(2, 2).expect("valid page");
/// let page = Page::new(vec!["c", "d"], request, 5);
/// assert_eq!(page.meta().last_page, 3);
/// assert_eq!(page.meta().from, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    data: Vec<T>,
    meta: PageMeta,
    links: PageLinks,
}

impl<T> Page<T> {
    /// Wrap `data` served for `request` out of `total` matching items.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let served = u64::try_from(data.len()).unwrap_or(u64::MAX);
        let offset = request.offset();
        let (from, to) = if served == 0 {
            (None, None)
        } else {
            (
                Some(offset.saturating_add(1)),
                Some(offset.saturating_add(served)),
            )
        };
        let meta = PageMeta {
            current_page: request.page(),
            per_page: request.per_page(),
            total,
            last_page: last_page(total, request.per_page()),
            from,
            to,
        };
        Self {
            data,
            meta,
            links: PageLinks::default(),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the envelope and return its items.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Page totals.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Navigation links; empty until [`Page::with_links`] is applied.
    #[must_use]
    pub const fn links(&self) -> &PageLinks {
        &self.links
    }

    /// Transform every item while keeping totals and links.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }

    /// Populate navigation links relative to `base`.
    ///
    /// Query parameters on `base` other than `page` are carried into every
    /// link.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost/api/v1/leaderboard?from=2024-01-01").unwrap();
    /// let request = PageRequest::new(1, 10).unwrap();
    /// let page = Page::new(vec![1, 2], request, 25).with_links(&base);
    /// assert_eq!(
    ///     page.links().next.as_deref(),
    ///     Some("http://localhost/api/v1/leaderboard?from=2024-01-01&page=2")
    /// );
    /// ```
    #[must_use]
    pub fn with_links(mut self, base: &Url) -> Self {
        let current = self.meta.current_page;
        let last = self.meta.last_page;
        self.links = PageLinks {
            first: Some(page_url(base, 1)),
            last: Some(page_url(base, last)),
            prev: (current > 1).then(|| page_url(base, current.saturating_sub(1).min(last))),
            next: (current < last).then(|| page_url(base, current.saturating_add(1))),
        };
        self
    }
}

fn last_page(total: u64, per_page: u32) -> u32 {
    let pages = total.div_ceil(u64::from(per_page.max(1))).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn page_url(base: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(PAGE_PARAM, &page.to_string());
    url.into()
}
