//! Fakes shared by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use folio_core::domain_event::{
    BookSnapshot, DomainEvent, DomainEvents, EventKind, HasDomainEvents,
};
use folio_core::types::DbId;
use tokio_util::sync::CancellationToken;

use crate::error::{StorageError, SubscriberError};
use crate::storage::Storage;
use crate::subscriber::{DispatchContext, Subscriber};
use crate::unit_of_work::EntityKey;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

pub fn snapshot(id: DbId) -> BookSnapshot {
    let now = Utc::now();
    BookSnapshot {
        id,
        title: format!("Test book number {id}"),
        author: "Test Author Name".to_string(),
        description: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn created(id: DbId) -> DomainEvent {
    DomainEvent::BookCreated(snapshot(id))
}

pub fn updated(id: DbId) -> DomainEvent {
    DomainEvent::BookUpdated(snapshot(id))
}

pub fn deleted(id: DbId) -> DomainEvent {
    DomainEvent::BookDeleted(snapshot(id))
}

/// Minimal tracked entity.
#[derive(Debug, Default)]
pub struct FakeBook {
    pub id: DbId,
    events: DomainEvents,
}

impl FakeBook {
    pub fn new(id: DbId) -> Self {
        Self {
            id,
            events: DomainEvents::default(),
        }
    }
}

impl HasDomainEvents for FakeBook {
    fn domain_events(&self) -> &DomainEvents {
        &self.events
    }

    fn domain_events_mut(&mut self) -> &mut DomainEvents {
        &mut self.events
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Storage that counts flushes and fails on demand.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub flushes: usize,
    pub fail: bool,
    /// Cancelled while a flush is in progress.
    cancel_on_flush: Option<CancellationToken>,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn cancelling(token: CancellationToken) -> Self {
        Self {
            cancel_on_flush: Some(token),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn flush(&mut self) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("disk on fire".to_string()));
        }
        if let Some(token) = &self.cancel_on_flush {
            token.cancel();
        }
        self.flushes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// Shared log of `(subscriber, event)` deliveries.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<(&'static str, DomainEvent)>>>,
}

impl Recorder {
    pub fn subscriber(&self, name: &'static str) -> Arc<dyn Subscriber> {
        Arc::new(Recording {
            name,
            log: Arc::clone(&self.log),
        })
    }

    pub fn calls(&self) -> Vec<(&'static str, DbId)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(name, event)| (*name, event.entity_id()))
            .collect()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.log.lock().unwrap().iter().map(|(_, e)| e.kind()).collect()
    }
}

struct Recording {
    name: &'static str,
    log: Arc<Mutex<Vec<(&'static str, DomainEvent)>>>,
}

#[async_trait]
impl Subscriber for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(
        &self,
        event: &DomainEvent,
        _ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        self.log.lock().unwrap().push((self.name, event.clone()));
        Ok(())
    }
}

enum Script {
    Fail,
    Unsupported,
    CascadeUpdate,
    CascadeDeleteOn(Vec<EntityKey>),
    Cancel(CancellationToken),
}

/// Subscriber with a canned behaviour.
pub struct Scripted {
    name: &'static str,
    script: Script,
}

impl Scripted {
    pub fn failing(name: &'static str) -> Self {
        Self { name, script: Script::Fail }
    }

    pub fn unsupported(name: &'static str) -> Self {
        Self { name, script: Script::Unsupported }
    }

    /// Records a `BookUpdated` on the originating entity.
    pub fn cascade_update(name: &'static str) -> Self {
        Self { name, script: Script::CascadeUpdate }
    }

    /// Records a `BookDeleted` on `key`.
    pub fn cascade_delete_on(name: &'static str, key: EntityKey) -> Self {
        Self::cascade_delete_on_each(name, vec![key])
    }

    /// Records a `BookDeleted` on each of `keys`, in order.
    pub fn cascade_delete_on_each(name: &'static str, keys: Vec<EntityKey>) -> Self {
        Self { name, script: Script::CascadeDeleteOn(keys) }
    }

    /// Cancels `token` while handling.
    pub fn cancelling(name: &'static str, token: CancellationToken) -> Self {
        Self { name, script: Script::Cancel(token) }
    }
}

#[async_trait]
impl Subscriber for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(
        &self,
        event: &DomainEvent,
        ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        match &self.script {
            Script::Fail => Err(SubscriberError::Failed("scripted failure".to_string())),
            Script::Unsupported => Err(SubscriberError::Unsupported(event.kind())),
            Script::CascadeUpdate => {
                ctx.record(updated(event.entity_id()));
                Ok(())
            }
            Script::CascadeDeleteOn(keys) => {
                for key in keys {
                    ctx.record_on(*key, deleted(event.entity_id()));
                }
                Ok(())
            }
            Script::Cancel(token) => {
                token.cancel();
                Ok(())
            }
        }
    }
}
