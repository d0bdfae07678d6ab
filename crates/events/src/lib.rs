//! Transactional domain-event dispatch for the Folio catalog.
//!
//! - [`UnitOfWork`]: flushes storage, then drains every pending event on
//!   its tracked entities until none remain.
//! - [`EventDispatcher`]: routes one event to its subscribers.
//! - [`SubscriberRegistry`]: immutable kind → subscriber bindings built at
//!   startup.
//! - [`subscribers`]: the audit logger and the book-created notifier.
//! - [`delivery`]: the email channel used by the notifier.

pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod storage;
pub mod subscriber;
pub mod subscribers;
pub mod unit_of_work;

#[cfg(test)]
mod test_support;

pub use delivery::email::{EmailConfig, LogMailer, Mailer, OutgoingEmail, SmtpMailer};
pub use dispatcher::EventDispatcher;
pub use error::{CommitError, ConfigurationError, DispatchError, StorageError, SubscriberError};
pub use registry::{SubscriberRegistry, SubscriberRegistryBuilder};
pub use storage::{PgStorage, Storage};
pub use subscriber::{DispatchContext, Subscriber};
pub use subscribers::default_registry;
pub use unit_of_work::{CommitSummary, EntityKey, UnitOfWork};
