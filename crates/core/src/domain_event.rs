//! In-memory domain events carried by entities.
//!
//! An entity that wants to announce a change records a [`DomainEvent`] on
//! its [`DomainEvents`] list. The list lives next to the entity's durable
//! fields but is never written to the database: it is drained by the unit
//! of work after the storage commit succeeds and then discarded with the
//! entity.
//!
//! Each recorded event is wrapped in an [`EventRecord`] carrying a
//! `published` flag. The flag only ever moves from `false` to `true`, and it
//! moves *before* the event is handed to subscribers, so a record is
//! dispatched at most once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Discriminant used to route an event to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BookCreated,
    BookUpdated,
    BookDeleted,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 3] = [
        EventKind::BookCreated,
        EventKind::BookUpdated,
        EventKind::BookDeleted,
    ];

    /// Dot-separated name, e.g. `"book.created"`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::BookCreated => "book.created",
            EventKind::BookUpdated => "book.updated",
            EventKind::BookDeleted => "book.deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// The book fields a subscriber may need, copied at the moment the event
/// is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Something that happened to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "book", rename_all = "snake_case")]
pub enum DomainEvent {
    BookCreated(BookSnapshot),
    BookUpdated(BookSnapshot),
    BookDeleted(BookSnapshot),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::BookCreated(_) => EventKind::BookCreated,
            DomainEvent::BookUpdated(_) => EventKind::BookUpdated,
            DomainEvent::BookDeleted(_) => EventKind::BookDeleted,
        }
    }

    /// Id of the entity the event is about.
    pub fn entity_id(&self) -> DbId {
        match self {
            DomainEvent::BookCreated(book)
            | DomainEvent::BookUpdated(book)
            | DomainEvent::BookDeleted(book) => book.id,
        }
    }
}

// ---------------------------------------------------------------------------
// EventRecord
// ---------------------------------------------------------------------------

/// A recorded event plus its delivery state.
#[derive(Debug, Clone)]
pub struct EventRecord {
    event: DomainEvent,
    published: bool,
}

impl EventRecord {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            event,
            published: false,
        }
    }

    pub fn event(&self) -> &DomainEvent {
        &self.event
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    pub fn is_published(&self) -> bool {
        self.published
    }
}

// ---------------------------------------------------------------------------
// DomainEvents
// ---------------------------------------------------------------------------

/// Ordered list of events recorded on one entity.
///
/// Insertion order is causal order: the drain loop always takes the oldest
/// unpublished record first.
#[derive(Debug, Clone, Default)]
pub struct DomainEvents {
    records: Vec<EventRecord>,
}

impl DomainEvents {
    /// Append an unpublished event.
    pub fn record(&mut self, event: DomainEvent) {
        self.records.push(EventRecord::new(event));
    }

    /// Unpublished records in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(|r| !r.published)
    }

    pub fn has_pending(&self) -> bool {
        self.records.iter().any(|r| !r.published)
    }

    /// Mark the oldest unpublished record as published and return a copy of
    /// its event for dispatch.
    ///
    /// The flag is flipped here, before any subscriber runs, so a failing
    /// subscriber cannot cause the same record to be handed out again.
    pub fn publish_next(&mut self) -> Option<DomainEvent> {
        let record = self.records.iter_mut().find(|r| !r.published)?;
        record.published = true;
        Some(record.event.clone())
    }

    /// Drop records that have already been published.
    pub fn clear_published(&mut self) {
        self.records.retain(|r| !r.published);
    }

    /// All records, published or not, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HasDomainEvents
// ---------------------------------------------------------------------------

/// An entity that carries a [`DomainEvents`] side channel.
pub trait HasDomainEvents {
    fn domain_events(&self) -> &DomainEvents;

    fn domain_events_mut(&mut self) -> &mut DomainEvents;

    fn record_event(&mut self, event: DomainEvent) {
        self.domain_events_mut().record(event);
    }

    /// Unpublished records in insertion order.
    fn pending_events(&self) -> Vec<&EventRecord> {
        self.domain_events().pending().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
