//! In-Memory Implementations
//!
//! Thread-safe in-memory entity store and blob storage.
//! Suitable for testing and development.

mod blob_store;
mod entity_store;

pub use blob_store::InMemoryBlobStore;
pub use entity_store::{InMemoryEntityStore, Volatile};
