pub mod book;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /books                  list, create
/// /books/{id}             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/books", book::router())
}
