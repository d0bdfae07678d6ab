//! Ties a storage commit to the dispatch of the events it made true.
//!
//! A [`UnitOfWork`] owns the entities touched by one request. Calling
//! [`commit`](UnitOfWork::commit) first flushes storage and, only if that
//! succeeds, drains every unpublished event across the tracked entities:
//!
//! 1. scan entities in tracking order for the first unpublished record,
//! 2. mark it published,
//! 3. dispatch it,
//! 4. repeat until a scan finds nothing.
//!
//! Rescanning instead of snapshotting means events recorded by subscribers
//! during the drain are dispatched in the same commit.

use std::fmt;
use std::sync::Arc;

use folio_core::domain_event::{DomainEvent, HasDomainEvents};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::EventDispatcher;
use crate::error::{CommitError, ConfigurationError};
use crate::storage::Storage;
use crate::subscriber::DispatchContext;

// ---------------------------------------------------------------------------
// EntityKey
// ---------------------------------------------------------------------------

/// Handle to an entity tracked by a [`UnitOfWork`], in tracking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey(usize);

impl EntityKey {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CommitSummary
// ---------------------------------------------------------------------------

/// What a successful commit dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Events taken from the tracked entities and dispatched.
    pub dispatched: usize,
    /// Subscriber invocations across those events.
    pub deliveries: usize,
}

// ---------------------------------------------------------------------------
// UnitOfWork
// ---------------------------------------------------------------------------

/// One storage commit plus the drain of its pending events.
///
/// Scoped to a single request: tracked entities and their event lists are
/// owned here and never shared across units of work.
pub struct UnitOfWork<S, E> {
    storage: S,
    dispatcher: Arc<EventDispatcher>,
    tracked: Vec<E>,
}

impl<S, E> UnitOfWork<S, E>
where
    S: Storage,
    E: HasDomainEvents + Send,
{
    pub fn new(storage: S, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            storage,
            dispatcher,
            tracked: Vec::new(),
        }
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Start tracking an entity. Its pending events drain on the next commit.
    pub fn track(&mut self, entity: E) -> EntityKey {
        self.tracked.push(entity);
        EntityKey::new(self.tracked.len() - 1)
    }

    pub fn entity(&self, key: EntityKey) -> Option<&E> {
        self.tracked.get(key.index())
    }

    /// Tracked entities in tracking order.
    pub fn tracked(&self) -> &[E] {
        &self.tracked
    }

    /// Unpublished events across all tracked entities.
    pub fn pending_count(&self) -> usize {
        self.tracked
            .iter()
            .map(|e| e.domain_events().pending().count())
            .sum()
    }

    pub fn into_entities(self) -> Vec<E> {
        self.tracked
    }

    /// Flush storage, then drain events until none are unpublished.
    ///
    /// Storage failures abort before anything is dispatched and leave the
    /// events queued. A dispatch failure stops the drain and is returned
    /// after the flush has already succeeded; the failed record stays
    /// published and is not retried. After a complete drain the published
    /// records are cleared from every tracked entity.
    pub async fn commit(&mut self) -> Result<CommitSummary, CommitError> {
        self.commit_until_cancelled(&CancellationToken::new()).await
    }

    /// [`commit`](Self::commit) that also honours `cancel`.
    ///
    /// A token cancelled before the flush aborts the commit with nothing
    /// written. The flush itself always runs to completion: a cancellation
    /// observed while it runs is seen by the drain before its first
    /// dispatch, so the writes are durable but nothing is dispatched.
    /// Cancellation during the drain lets the in-flight dispatch finish and
    /// then stops with [`CommitError::Cancelled`].
    pub async fn commit_until_cancelled(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<CommitSummary, CommitError> {
        if cancel.is_cancelled() {
            tracing::warn!("Commit cancelled before storage flush");
            return Err(CommitError::Cancelled { dispatched: 0 });
        }

        if let Err(e) = self.storage.flush().await {
            tracing::warn!(error = %e, pending = self.pending_count(), "Storage flush failed, no events dispatched");
            return Err(e.into());
        }

        let summary = self.drain(cancel).await?;
        for entity in &mut self.tracked {
            entity.domain_events_mut().clear_published();
        }
        if summary.dispatched > 0 {
            tracing::debug!(
                dispatched = summary.dispatched,
                deliveries = summary.deliveries,
                "Unit of work committed"
            );
        }
        Ok(summary)
    }

    async fn drain(&mut self, cancel: &CancellationToken) -> Result<CommitSummary, CommitError> {
        let mut summary = CommitSummary::default();

        while self.has_pending() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    dispatched = summary.dispatched,
                    remaining = self.pending_count(),
                    "Commit cancelled while draining events"
                );
                return Err(CommitError::Cancelled {
                    dispatched: summary.dispatched,
                });
            }

            let Some((origin, event)) = self.publish_next() else {
                break;
            };

            let mut ctx = DispatchContext::new(origin);
            let delivered = self.dispatcher.dispatch(&event, &mut ctx).await;

            // Follow-ups recorded before a failing subscriber stay queued.
            self.apply_followups(ctx)?;
            summary.deliveries += delivered?;
            summary.dispatched += 1;
        }

        Ok(summary)
    }

    fn has_pending(&self) -> bool {
        self.tracked.iter().any(|e| e.domain_events().has_pending())
    }

    /// Mark the first unpublished record (tracking order, then insertion
    /// order) as published and return it with its entity's key.
    fn publish_next(&mut self) -> Option<(EntityKey, DomainEvent)> {
        self.tracked
            .iter_mut()
            .enumerate()
            .find_map(|(index, entity)| {
                entity
                    .domain_events_mut()
                    .publish_next()
                    .map(|event| (EntityKey::new(index), event))
            })
    }

    /// Append follow-ups to their entities, or none of them if any key is
    /// untracked.
    fn apply_followups(&mut self, ctx: DispatchContext) -> Result<(), ConfigurationError> {
        let followups = ctx.into_followups();

        if let Some((key, event)) = followups
            .iter()
            .find(|(key, _)| key.index() >= self.tracked.len())
        {
            return Err(ConfigurationError::UntrackedEntity {
                key: *key,
                kind: event.kind(),
            });
        }

        for (key, event) in followups {
            tracing::debug!(entity = %key, event_kind = %event.kind(), "Subscriber recorded follow-up event");
            self.tracked[key.index()].record_event(event);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
