//! Event kind → subscriber bindings.
//!
//! The registry is assembled once at startup through
//! [`SubscriberRegistryBuilder`] and is immutable afterwards, so it can be
//! shared as `Arc<SubscriberRegistry>` by every concurrent drain loop
//! without locking.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use folio_core::domain_event::EventKind;

use crate::error::ConfigurationError;
use crate::subscriber::Subscriber;

/// Read-only mapping from [`EventKind`] to subscribers in registration
/// order.
pub struct SubscriberRegistry {
    bindings: HashMap<EventKind, Vec<Arc<dyn Subscriber>>>,
    required: HashSet<EventKind>,
}

impl SubscriberRegistry {
    pub fn builder() -> SubscriberRegistryBuilder {
        SubscriberRegistryBuilder::default()
    }

    /// Subscribers bound to `kind`, in registration order. Empty when none.
    pub fn subscribers_for(&self, kind: EventKind) -> &[Arc<dyn Subscriber>] {
        self.bindings.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `kind` was declared as needing at least one subscriber.
    pub fn is_required(&self, kind: EventKind) -> bool {
        self.required.contains(&kind)
    }

    /// Check that every required kind has a binding.
    ///
    /// Called at startup so a wiring defect stops the process before it
    /// serves a request.
    pub fn audit(&self) -> Result<(), ConfigurationError> {
        EventKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_required(*kind))
            .find(|kind| self.subscribers_for(*kind).is_empty())
            .map_or(Ok(()), |kind| Err(ConfigurationError::MissingSubscriber(kind)))
    }

    /// Total number of (kind, subscriber) bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bindings: Vec<(EventKind, Vec<&'static str>)> = self
            .bindings
            .iter()
            .map(|(kind, subs)| (*kind, subs.iter().map(|s| s.name()).collect()))
            .collect();
        bindings.sort_by_key(|(kind, _)| kind.as_str());
        f.debug_struct("SubscriberRegistry")
            .field("bindings", &bindings)
            .field("required", &self.required)
            .finish()
    }
}

/// Collects bindings before the registry is frozen.
#[derive(Default)]
pub struct SubscriberRegistryBuilder {
    bindings: HashMap<EventKind, Vec<Arc<dyn Subscriber>>>,
    required: HashSet<EventKind>,
}

impl SubscriberRegistryBuilder {
    /// Bind `subscriber` to `kind`. Later bindings run after earlier ones.
    pub fn subscribe(mut self, kind: EventKind, subscriber: Arc<dyn Subscriber>) -> Self {
        self.bindings.entry(kind).or_default().push(subscriber);
        self
    }

    /// Bind `subscriber` to every event kind.
    pub fn subscribe_all(mut self, subscriber: Arc<dyn Subscriber>) -> Self {
        for kind in EventKind::ALL {
            self.bindings
                .entry(kind)
                .or_default()
                .push(Arc::clone(&subscriber));
        }
        self
    }

    /// Declare that `kind` must have at least one subscriber.
    pub fn require(mut self, kind: EventKind) -> Self {
        self.required.insert(kind);
        self
    }

    pub fn build(self) -> SubscriberRegistry {
        SubscriberRegistry {
            bindings: self.bindings,
            required: self.required,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
