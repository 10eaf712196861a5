//! Offset pagination primitives shared by backend list endpoints.
//!
//! Raw query parameters arrive as optional integers and are resolved against
//! configured [`PageLimits`] into a [`PageRequest`] with a definite 1-based
//! page index and a bounded page size. List handlers execute the bounded
//! query, then assemble a [`Page`] envelope carrying the matched items plus
//! paging metadata.
//!
//! Out-of-range parameters clamp rather than fail: a missing or sub-range
//! `size` falls back to the configured default, an oversized `size` clamps to
//! the configured maximum, and a missing or non-positive `page` resolves to
//! the first page.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing [`PageLimits`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageLimitsError {
    /// A limit was zero or negative.
    #[error("page sizes must be positive, got {value}")]
    NonPositiveSize {
        /// The rejected value.
        value: i64,
    },
    /// The default size exceeded the maximum size.
    #[error("default page size {default} exceeds maximum {max}")]
    DefaultExceedsMax {
        /// Configured default size.
        default: i64,
        /// Configured maximum size.
        max: i64,
    },
}

/// Configured bounds used to resolve raw page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_size: i64,
    max_size: i64,
}

impl PageLimits {
    /// Build limits after validating that both sizes are positive and the
    /// default does not exceed the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`PageLimitsError`] when a size is non-positive or the default
    /// exceeds the maximum.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageLimits;
    ///
    /// let limits = PageLimits::new(20, 100)?;
    /// assert_eq!(limits.default_size(), 20);
    /// # Ok::<(), pagination::PageLimitsError>(())
    /// ```
    pub const fn new(default_size: i64, max_size: i64) -> Result<Self, PageLimitsError> {
        if default_size <= 0 {
            return Err(PageLimitsError::NonPositiveSize {
                value: default_size,
            });
        }
        if max_size <= 0 {
            return Err(PageLimitsError::NonPositiveSize { value: max_size });
        }
        if default_size > max_size {
            return Err(PageLimitsError::DefaultExceedsMax {
                default: default_size,
                max: max_size,
            });
        }
        Ok(Self {
            default_size,
            max_size,
        })
    }

    /// The page size used when the request supplies none.
    #[must_use]
    pub const fn default_size(&self) -> i64 {
        self.default_size
    }

    /// The largest page size a request may ask for.
    #[must_use]
    pub const fn max_size(&self) -> i64 {
        self.max_size
    }
}

/// Raw, unvalidated pagination query parameters.
///
/// Both fields are optional so list endpoints accept bare requests; values
/// are interpreted by [`PageRequest::resolve`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// Requested 1-based page index.
    pub page: Option<i64>,
    /// Requested page size.
    pub size: Option<i64>,
}

/// A resolved pagination request with a definite page index and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Resolve raw parameters against configured limits.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageLimits, PageParams, PageRequest};
    ///
    /// let limits = PageLimits::new(20, 100)?;
    /// let request = PageRequest::resolve(
    ///     PageParams { page: Some(3), size: Some(250) },
    ///     limits,
    /// );
    /// assert_eq!(request.page(), 3);
    /// assert_eq!(request.size(), 100);
    /// # Ok::<(), pagination::PageLimitsError>(())
    /// ```
    #[must_use]
    pub fn resolve(params: PageParams, limits: PageLimits) -> Self {
        let page = params.page.filter(|page| *page >= 1).unwrap_or(1);
        let size = params
            .size
            .filter(|size| *size >= 1)
            .unwrap_or_else(|| limits.default_size())
            .min(limits.max_size());
        Self { page, size }
    }

    /// The resolved 1-based page index.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// The resolved page size.
    #[must_use]
    pub const fn size(&self) -> i64 {
        self.size
    }

    /// Row offset for the underlying bounded query.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }
}

/// A bounded slice of items plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The matched items, at most `size` of them.
    pub items: Vec<T>,
    /// Total matching rows in the store.
    pub total: i64,
    /// The 1-based page index this slice corresponds to.
    pub page: i64,
    /// The resolved page size.
    pub size: i64,
    /// Number of pages needed to cover `total` rows.
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Assemble the envelope from query results and the resolved request.
    ///
    /// A negative `total` (which a well-behaved store never reports) is
    /// normalised to zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageLimits, PageParams, PageRequest};
    ///
    /// let limits = PageLimits::new(20, 100)?;
    /// let request = PageRequest::resolve(PageParams::default(), limits);
    /// let page = Page::assemble(vec!["a", "b"], 42, request);
    /// assert_eq!(page.total_pages, 3);
    /// # Ok::<(), pagination::PageLimitsError>(())
    /// ```
    #[must_use]
    pub fn assemble(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let total = total.max(0);
        Self {
            items,
            total,
            page: request.page(),
            size: request.size(),
            total_pages: total.div_ceil(request.size()),
        }
    }
}
