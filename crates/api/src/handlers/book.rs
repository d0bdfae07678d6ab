//! Handlers for the `/books` resource.
//!
//! Mutations run inside a [`UnitOfWork`] over a [`PgStorage`] transaction:
//! the handler writes through the transaction, records the matching domain
//! event on the returned row, tracks it, and commits. Events are dispatched
//! only after the transaction commits.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::book::validate_book;
use folio_core::domain_event::{DomainEvent, HasDomainEvents};
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::book::{Book, BookInput};
use folio_db::repositories::BookRepo;
use folio_events::{PgStorage, UnitOfWork};

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::BookPage;
use crate::state::AppState;

type BookUnitOfWork = UnitOfWork<PgStorage, Book>;

fn unit_of_work(state: &AppState) -> BookUnitOfWork {
    UnitOfWork::new(PgStorage::new(state.pool.clone()), Arc::clone(&state.dispatcher))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Book", id })
}

fn duplicate_title(title: &str) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "A book with the title '{title}' already exists."
    )))
}

/// Commit `uow`, honouring the server's shutdown token.
///
/// A subscriber failure happens after the book is persisted, so it is
/// logged and the request still succeeds.
async fn commit(state: &AppState, uow: &mut BookUnitOfWork) -> AppResult<()> {
    match uow.commit_until_cancelled(&state.shutdown).await {
        Ok(summary) => {
            tracing::debug!(
                dispatched = summary.dispatched,
                deliveries = summary.deliveries,
                "Book events dispatched"
            );
            Ok(())
        }
        Err(e) if e.is_subscriber_failure() => {
            tracing::error!(error = %e, "Book persisted but an event subscriber failed");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Take the single tracked book back out of a committed unit of work.
fn into_book(uow: BookUnitOfWork) -> AppResult<Book> {
    uow.into_entities()
        .pop()
        .ok_or_else(|| AppError::InternalError("Unit of work lost its tracked book".into()))
}

/// GET /api/v1/books
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<BookPage>> {
    let request = params.into_request();
    let books = BookRepo::list_page(&state.pool, request.limit(), request.offset()).await?;
    let total_count = BookRepo::count(&state.pool).await?;
    Ok(Json(BookPage::new(books, total_count, request)))
}

/// GET /api/v1/books/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Book>> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(book))
}

/// POST /api/v1/books
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    validate_book(&input.title, &input.author, input.description.as_deref())?;

    let mut uow = unit_of_work(&state);
    let conn = uow.storage_mut().connection().await?;

    if BookRepo::title_exists(&mut *conn, &input.title, None).await? {
        return Err(duplicate_title(&input.title));
    }
    let mut book = BookRepo::create(&mut *conn, &input).await?;

    book.record_event(DomainEvent::BookCreated(book.snapshot()));
    uow.track(book);
    commit(&state, &mut uow).await?;

    let book = into_book(uow)?;
    tracing::info!(book_id = book.id, title = %book.title, "Book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/v1/books/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BookInput>,
) -> AppResult<Json<Book>> {
    let mut uow = unit_of_work(&state);
    let conn = uow.storage_mut().connection().await?;

    if BookRepo::find_by_id(&mut *conn, id).await?.is_none() {
        return Err(not_found(id));
    }

    validate_book(&input.title, &input.author, input.description.as_deref())?;

    if BookRepo::title_exists(&mut *conn, &input.title, Some(id)).await? {
        return Err(duplicate_title(&input.title));
    }
    let mut book = BookRepo::update(&mut *conn, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    book.record_event(DomainEvent::BookUpdated(book.snapshot()));
    uow.track(book);
    commit(&state, &mut uow).await?;

    let book = into_book(uow)?;
    tracing::info!(book_id = book.id, "Book updated");
    Ok(Json(book))
}

/// DELETE /api/v1/books/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let mut uow = unit_of_work(&state);
    let conn = uow.storage_mut().connection().await?;

    let mut book = BookRepo::delete(&mut *conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    book.record_event(DomainEvent::BookDeleted(book.snapshot()));
    uow.track(book);
    commit(&state, &mut uow).await?;

    tracing::info!(book_id = id, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}
