//! The contract between the dispatcher and side-effecting consumers.

use async_trait::async_trait;
use folio_core::domain_event::DomainEvent;

use crate::error::SubscriberError;
use crate::unit_of_work::EntityKey;

/// A consumer invoked once per dispatched event of a kind it is bound to.
///
/// Subscribers run inline in the committing request. A returned error
/// stops the drain loop and surfaces to the caller of `commit`.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        event: &DomainEvent,
        ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError>;
}

/// Per-dispatch handle given to subscribers.
///
/// Lets a subscriber record cascading events. They are appended to the
/// tracked entities once the dispatch returns, even if a later subscriber
/// failed, and are drained in the same commit.
#[derive(Debug)]
pub struct DispatchContext {
    origin: EntityKey,
    followups: Vec<(EntityKey, DomainEvent)>,
}

impl DispatchContext {
    pub(crate) fn new(origin: EntityKey) -> Self {
        Self {
            origin,
            followups: Vec::new(),
        }
    }

    /// Key of the tracked entity whose event is being dispatched.
    pub fn origin(&self) -> EntityKey {
        self.origin
    }

    /// Record a follow-up event on the originating entity.
    pub fn record(&mut self, event: DomainEvent) {
        self.followups.push((self.origin, event));
    }

    /// Record a follow-up event on another tracked entity.
    pub fn record_on(&mut self, key: EntityKey, event: DomainEvent) {
        self.followups.push((key, event));
    }

    pub(crate) fn into_followups(self) -> Vec<(EntityKey, DomainEvent)> {
        self.followups
    }
}
