//! Repository for the `books` table.
//!
//! Every method is generic over [`PgExecutor`] so the same queries run
//! against the pool (reads) or inside a unit-of-work transaction (writes).

use folio_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::book::{Book, BookInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, author, description, created_at, updated_at";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &BookInput) -> Result<Book, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO books (title, author, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.title)
            .bind(&input.author)
            .bind(input.description_or_empty())
            .fetch_one(executor)
            .await
    }

    /// Find a book by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Book>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether another book already uses `title` (case-insensitive).
    ///
    /// `exclude_id` skips the book being updated.
    pub async fn title_exists<'e, E>(
        executor: E,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM books \
                WHERE LOWER(title) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2) \
             )",
        )
        .bind(title)
        .bind(exclude_id)
        .fetch_one(executor)
        .await
    }

    /// One page of books ordered by id.
    pub async fn list_page<'e, E>(
        executor: E,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Book>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM books ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Total number of books.
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(executor)
            .await
    }

    /// Replace the editable fields of a book.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &BookInput,
    ) -> Result<Option<Book>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE books SET \
                title = $2, \
                author = $3, \
                description = $4, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(input.description_or_empty())
            .fetch_optional(executor)
            .await
    }

    /// Delete a book, returning the removed row (or `None` if absent).
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<Option<Book>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("DELETE FROM books WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
