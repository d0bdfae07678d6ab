//! Structured log line per dispatched event.

use async_trait::async_trait;
use folio_core::domain_event::DomainEvent;

use crate::error::SubscriberError;
use crate::subscriber::{DispatchContext, Subscriber};

/// Writes every event it receives to the `folio_events::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditLogSubscriber;

#[async_trait]
impl Subscriber for AuditLogSubscriber {
    fn name(&self) -> &'static str {
        "audit_log"
    }

    async fn handle(
        &self,
        event: &DomainEvent,
        _ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| SubscriberError::Failed(format!("Cannot serialize event: {e}")))?;
        tracing::info!(
            target: "folio_events::audit",
            event_kind = %event.kind(),
            entity_id = event.entity_id(),
            payload = %payload,
            "Domain event"
        );
        Ok(())
    }
}
