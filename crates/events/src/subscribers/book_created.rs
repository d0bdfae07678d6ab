//! Mails the developers when a book is added to the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use folio_core::domain_event::{BookSnapshot, DomainEvent};

use crate::delivery::email::{Mailer, OutgoingEmail};
use crate::error::SubscriberError;
use crate::subscriber::{DispatchContext, Subscriber};

/// Creation time layout in the message body.
const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Sends one plain-text email per `book.created` event.
pub struct BookCreatedNotifier {
    mailer: Arc<dyn Mailer>,
    recipient: String,
}

impl BookCreatedNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            recipient: recipient.into(),
        }
    }

    fn compose(&self, book: &BookSnapshot) -> OutgoingEmail {
        let body = format!(
            "A new book was created:\n\n\
             Title: {}\n\
             Author: {}\n\
             Description: {}\n\
             ID: {}\n\
             Created at: {}",
            book.title,
            book.author,
            book.description,
            book.id,
            book.created_at.format(CREATED_AT_FORMAT),
        );
        OutgoingEmail {
            to: self.recipient.clone(),
            subject: format!("[Folio] New book: {}", book.title),
            body,
        }
    }
}

#[async_trait]
impl Subscriber for BookCreatedNotifier {
    fn name(&self) -> &'static str {
        "book_created_notifier"
    }

    async fn handle(
        &self,
        event: &DomainEvent,
        _ctx: &mut DispatchContext,
    ) -> Result<(), SubscriberError> {
        let DomainEvent::BookCreated(book) = event else {
            return Err(SubscriberError::Unsupported(event.kind()));
        };

        self.mailer.send(&self.compose(book)).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
