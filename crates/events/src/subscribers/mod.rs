//! Built-in subscribers and the default wiring.

pub mod audit;
pub mod book_created;

use std::sync::Arc;

use folio_core::domain_event::EventKind;

use crate::delivery::email::Mailer;
use crate::registry::SubscriberRegistry;

pub use audit::AuditLogSubscriber;
pub use book_created::BookCreatedNotifier;

/// Registry used by the HTTP service.
///
/// Every kind goes to the audit log; `book.created` additionally mails
/// `recipient` and is required to have a subscriber.
pub fn default_registry(mailer: Arc<dyn Mailer>, recipient: impl Into<String>) -> SubscriberRegistry {
    SubscriberRegistry::builder()
        .subscribe_all(Arc::new(AuditLogSubscriber))
        .subscribe(
            EventKind::BookCreated,
            Arc::new(BookCreatedNotifier::new(mailer, recipient)),
        )
        .require(EventKind::BookCreated)
        .build()
}
