//! `taag-core`: building blocks shared by the billing pipeline.
//!
//! This crate contains **pure domain** primitives (no IO, no rendering, no async).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult, FieldError, ValidationErrors};
pub use event::Event;
pub use id::SessionId;
