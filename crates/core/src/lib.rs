//! Domain types for the Folio book catalog.
//!
//! Holds everything that does not touch the database or the network:
//! shared id/timestamp aliases, the domain error type, book field rules,
//! pagination math and the in-memory domain event model that entities carry
//! between a mutation and the commit of their unit of work.

pub mod book;
pub mod domain_event;
pub mod error;
pub mod pagination;
pub mod types;
