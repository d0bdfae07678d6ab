//! Page-number pagination for catalog listings.

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound for a single page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized `(page, page_size)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Build a request from optional client input, clamping out-of-range
    /// values instead of rejecting them.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Total number of pages for `total_count` rows (`0` when empty).
    pub fn total_pages(&self, total_count: i64) -> i64 {
        if total_count <= 0 {
            return 0;
        }
        (total_count + self.page_size - 1) / self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
