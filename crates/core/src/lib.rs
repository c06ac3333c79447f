//! `packtrace-core`: shared domain building blocks.
//!
//! Pure domain primitives only: identifiers, the error model and the
//! aggregate/event contracts used by the catalog, BOM and sales crates.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{execute, Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{AggregateId, TenantId};
