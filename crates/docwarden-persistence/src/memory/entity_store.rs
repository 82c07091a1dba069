//! In-Memory Entity Store Implementation

use crate::error::PersistenceError;
use crate::state::EntityState;
use crate::store::{RecordStore, SnapshotBackend};

/// Backend that keeps records only in process memory
#[derive(Debug, Clone, Copy, Default)]
pub struct Volatile;

impl SnapshotBackend for Volatile {
    const DURABLE: bool = false;

    fn persist(&self, _state: &EntityState) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Thread-safe in-memory entity store
///
/// Uses RwLock for concurrent read access with exclusive write access.
/// Stores cloned records to maintain isolation.
///
/// # Example
///
/// ```ignore
/// use docwarden_persistence::memory::InMemoryEntityStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(InMemoryEntityStore::new());
/// ```
pub type InMemoryEntityStore = RecordStore<Volatile>;

impl RecordStore<Volatile> {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::with_state(EntityState::default(), Volatile)
    }
}

impl Default for RecordStore<Volatile> {
    fn default() -> Self {
        Self::new()
    }
}
