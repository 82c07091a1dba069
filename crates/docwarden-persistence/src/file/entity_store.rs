//! JSON snapshot entity store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PersistenceError;
use crate::state::{EntityState, Snapshot};
use crate::store::{RecordStore, SnapshotBackend};

/// Backend writing the full record set to a JSON file
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl SnapshotBackend for JsonSnapshot {
    const DURABLE: bool = true;

    fn persist(&self, state: &EntityState) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(&state.to_snapshot())?;

        // Write-then-rename so a crash never leaves a truncated snapshot
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Entity snapshot written to {:?}", self.path);
        Ok(())
    }
}

/// Entity store persisted as a single JSON document
pub type JsonFileEntityStore = RecordStore<JsonSnapshot>;

impl RecordStore<JsonSnapshot> {
    /// Open the store at `path`, creating an empty one if the file is absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();

        let state = if path.exists() {
            let raw = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&raw)?;
            EntityState::from_snapshot(snapshot)
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            EntityState::default()
        };

        let (orgs, members, docs) = state.counts();
        info!(
            "Entity store opened at {:?} ({} organizations, {} members, {} documents)",
            path, orgs, members, docs
        );

        Ok(Self::with_state(state, JsonSnapshot { path }))
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.backend().path
    }
}
