#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Pagination value types shared between the data-access core and API layers.
//!
//! This crate is deliberately free of any database dependency so HTTP
//! handlers can build [`PageParams`] from request input and pass [`Page`]
//! values through to the wire without pulling in the storage stack.

use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Validation error for page parameters.
///
/// Surfaced before any storage access; never retried.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page number must be at least 1 (got {0})")]
    InvalidPage(u64),

    #[error("page size must be at least 1 (got {0})")]
    InvalidSize(u64),
}

/// 1-based page request: which page, and how many rows per page.
///
/// No upper bound is enforced on `page` or `size` at this layer; API
/// boundaries may impose their own caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageParams {
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Reject out-of-domain parameters.
    ///
    /// # Errors
    /// Returns [`PageError::InvalidPage`] if `page < 1` and
    /// [`PageError::InvalidSize`] if `size < 1`.
    pub fn validate(&self) -> Result<(), PageError> {
        if self.page < 1 {
            return Err(PageError::InvalidPage(self.page));
        }
        if self.size < 1 {
            return Err(PageError::InvalidSize(self.size));
        }
        Ok(())
    }

    /// Number of rows to skip: `(page - 1) * size`, saturating instead of
    /// overflowing for absurd inputs.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One bounded, ordered slice of query results plus the total count of all
/// matching rows.
///
/// Invariants: `items.len() <= size`; `items` preserves the underlying query
/// order; `total` reflects the full predicate-matched count independent of
/// slicing. A request past the last page yields an empty page, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            size: params.size,
        }
    }

    /// An empty page carrying the request's coordinates and a zero total.
    #[must_use]
    pub fn empty(params: PageParams) -> Self {
        Self::new(Vec::new(), 0, params)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of pages for this total/size pair (0 when nothing
    /// matches).
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size)
    }

    /// Whether no page after this one holds rows.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }

    /// Swap the element type while preserving order and page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}
