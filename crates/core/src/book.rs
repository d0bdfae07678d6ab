//! Field rules for book records.
//!
//! Title and author are required and bounded; the description is optional
//! but capped. All messages for a rejected submission are joined into one
//! [`CoreError::Validation`] so a client gets every problem at once.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Fields checked in this order so error messages are deterministic.
const FIELD_ORDER: [&str; 3] = ["title", "author", "description"];

#[derive(Debug, Validate)]
struct BookFields {
    #[validate(length(
        min = 10,
        max = 100,
        message = "Title must be between 10 and 100 characters."
    ))]
    title: String,

    #[validate(length(
        min = 10,
        max = 100,
        message = "Author must be between 10 and 100 characters."
    ))]
    author: String,

    #[validate(length(
        max = 1024,
        message = "Description must be at most 1024 characters."
    ))]
    description: String,
}

/// Validate the user-supplied fields of a book.
///
/// `description` may be absent or empty. Returns every violated rule,
/// space-separated, in title/author/description order.
///
/// ```
/// use folio_core::book::validate_book;
///
/// assert!(validate_book("The Pragmatic Programmer", "Andrew Hunt", None).is_ok());
/// assert!(validate_book("Short", "Andrew Hunt", None).is_err());
/// ```
pub fn validate_book(title: &str, author: &str, description: Option<&str>) -> Result<(), CoreError> {
    let mut messages = Vec::new();

    if title.trim().is_empty() {
        messages.push("Title is required.".to_string());
    }
    if author.trim().is_empty() {
        messages.push("Author is required.".to_string());
    }

    let fields = BookFields {
        title: title.to_string(),
        author: author.to_string(),
        description: description.unwrap_or_default().to_string(),
    };
    if let Err(errors) = fields.validate() {
        messages.extend(ordered_messages(&errors));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(messages.join(" ")))
    }
}

fn ordered_messages(errors: &ValidationErrors) -> Vec<String> {
    let by_field = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| by_field.get(*field))
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({}).", err.code))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
