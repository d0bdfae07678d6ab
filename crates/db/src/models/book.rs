//! Book entity model and DTOs.

use folio_core::domain_event::{BookSnapshot, DomainEvents, HasDomainEvents};
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `books` table.
///
/// `events` is the in-memory domain event side channel. It is skipped by
/// both the row mapper and the serializer, so it never reaches the database
/// or an API response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    #[serde(skip)]
    pub events: DomainEvents,
}

impl Book {
    /// Copy of the fields subscribers are given.
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl HasDomainEvents for Book {
    fn domain_events(&self) -> &DomainEvents {
        &self.events
    }

    fn domain_events_mut(&mut self) -> &mut DomainEvents {
        &mut self.events
    }
}

/// DTO for creating or replacing a book. Used by both POST and PUT.
#[derive(Debug, Clone, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    /// Stored as an empty string when omitted.
    pub description: Option<String>,
}

impl BookInput {
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}
