//! Query parameter types for API handlers.

use folio_core::pagination::PageRequest;
use serde::Deserialize;

/// Page-number pagination (`?page=&pageSize=`).
///
/// Out-of-range values are clamped by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn into_request(self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}
