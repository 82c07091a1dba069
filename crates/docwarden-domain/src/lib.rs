//! DocWarden Domain Layer
//!
//! Entities, value objects and rules for tracking compliance documents owned by
//! organizations and their members.
//!
//! # Modules
//!
//! - [`entities`]: `Organization`, `Member`, `Document` and upload payloads
//! - [`value_objects`]: identifiers, `FileRef`, the `DocumentOwner` tagged union
//! - [`expiry`]: the expiry classifier and its windows
//! - [`repositories`]: entity store traits
//! - [`ports`]: storage gateway and clock contracts
//!
//! The domain layer defines only interfaces for I/O; concrete implementations
//! live in `docwarden-persistence`.

pub mod entities;
pub mod errors;
pub mod expiry;
pub mod ports;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, DomainResult};
pub use expiry::{classify, ExpiryPolicy, ExpiryStatus};
pub use value_objects::*;
