//! Response envelope types for API handlers.

use folio_core::pagination::PageRequest;
use folio_db::models::book::Book;
use serde::Serialize;

/// One page of the catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

impl BookPage {
    pub fn new(books: Vec<Book>, total_count: i64, request: PageRequest) -> Self {
        Self {
            books,
            total_count,
            total_pages: request.total_pages(total_count),
            current_page: request.page,
            page_size: request.page_size,
        }
    }
}
