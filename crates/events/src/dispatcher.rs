//! Resolves an event's subscribers and runs them.

use std::sync::Arc;

use folio_core::domain_event::DomainEvent;

use crate::error::{ConfigurationError, DispatchError, SubscriberError};
use crate::registry::SubscriberRegistry;
use crate::subscriber::DispatchContext;

/// Invokes the subscribers bound to an event's kind.
///
/// Subscribers run sequentially in registration order. The first failure
/// stops the dispatch: later subscribers for the same event are not run.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    registry: Arc<SubscriberRegistry>,
}

impl EventDispatcher {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatch one event, returning how many subscribers ran.
    ///
    /// An event whose kind has no subscribers is a no-op unless the kind
    /// was declared required, in which case it is a
    /// [`ConfigurationError::MissingSubscriber`].
    pub async fn dispatch(
        &self,
        event: &DomainEvent,
        ctx: &mut DispatchContext,
    ) -> Result<usize, DispatchError> {
        let kind = event.kind();
        let subscribers = self.registry.subscribers_for(kind);

        if subscribers.is_empty() {
            if self.registry.is_required(kind) {
                tracing::error!(event_kind = %kind, "Required event kind has no subscribers");
                return Err(ConfigurationError::MissingSubscriber(kind).into());
            }
            tracing::debug!(event_kind = %kind, "No subscribers for event, skipping");
            return Ok(0);
        }

        for subscriber in subscribers {
            let name = subscriber.name();
            tracing::debug!(event_kind = %kind, subscriber = name, "Invoking subscriber");

            match subscriber.handle(event, ctx).await {
                Ok(()) => {}
                Err(SubscriberError::Unsupported(unsupported)) => {
                    return Err(ConfigurationError::UnsupportedEvent {
                        subscriber: name,
                        kind: unsupported,
                    }
                    .into());
                }
                Err(source) => {
                    tracing::warn!(
                        event_kind = %kind,
                        subscriber = name,
                        error = %source,
                        "Subscriber failed"
                    );
                    return Err(DispatchError::Subscriber {
                        subscriber: name,
                        kind,
                        source,
                    });
                }
            }
        }

        Ok(subscribers.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
