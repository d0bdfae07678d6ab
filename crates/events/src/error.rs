//! Error taxonomy for committing a unit of work and dispatching its events.
//!
//! - [`StorageError`]: the durable flush failed. Nothing was dispatched.
//! - [`SubscriberError`]: a subscriber failed after the flush succeeded.
//! - [`ConfigurationError`]: the subscriber wiring is wrong. Never swallow.
//!
//! [`DispatchError`] and [`CommitError`] wrap these for the dispatcher and
//! the unit of work respectively.

use folio_core::domain_event::EventKind;

use crate::delivery::email::EmailError;
use crate::unit_of_work::EntityKey;

/// The storage flush of a unit of work failed.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database rejected or could not complete the commit.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A non-database backend failed (used by alternative storages).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A subscriber could not handle an event.
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    /// The subscriber was handed a kind it has no handling for.
    #[error("Unsupported event kind: {0}")]
    Unsupported(EventKind),

    /// Email delivery failed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// Any other failure, described by the subscriber.
    #[error("{0}")]
    Failed(String),
}

/// The subscriber wiring does not match the events being produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A kind declared as required has no subscriber bound to it.
    #[error("No subscriber registered for required event kind {0}")]
    MissingSubscriber(EventKind),

    /// A subscriber was bound to a kind it cannot handle.
    #[error("Subscriber `{subscriber}` is bound to {kind} but cannot handle it")]
    UnsupportedEvent {
        subscriber: &'static str,
        kind: EventKind,
    },

    /// A subscriber recorded a follow-up event on an entity the unit of
    /// work does not track.
    #[error("Follow-up {kind} event targets untracked entity {key}")]
    UntrackedEntity { key: EntityKey, kind: EventKind },
}

/// Dispatching one event failed.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Subscriber `{subscriber}` failed on {kind}: {source}")]
    Subscriber {
        subscriber: &'static str,
        kind: EventKind,
        #[source]
        source: SubscriberError,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Committing a unit of work failed.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The flush failed; no event was dispatched.
    #[error("Storage flush failed: {0}")]
    Storage(#[from] StorageError),

    /// The flush succeeded but draining stopped on a dispatch failure.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A cancellation was observed before the drain reached its fixed point.
    /// With `dispatched == 0` the flush may still have completed.
    #[error("Commit cancelled after {dispatched} event(s) were dispatched")]
    Cancelled { dispatched: usize },
}

impl From<ConfigurationError> for CommitError {
    fn from(err: ConfigurationError) -> Self {
        CommitError::Dispatch(DispatchError::Configuration(err))
    }
}

impl CommitError {
    /// `true` when the durable write went through and only notification
    /// failed at the subscriber level.
    pub fn is_subscriber_failure(&self) -> bool {
        matches!(self, CommitError::Dispatch(DispatchError::Subscriber { .. }))
    }
}
