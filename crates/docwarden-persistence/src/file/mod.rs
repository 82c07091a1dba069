//! Disk-backed Implementations
//!
//! - `JsonFileEntityStore`: records kept in memory and snapshotted to one JSON
//!   file after every committed write
//! - `FilesystemBlobStore`: document bytes stored as files under a root
//!   directory

mod blob_store;
mod entity_store;

pub use blob_store::FilesystemBlobStore;
pub use entity_store::{JsonFileEntityStore, JsonSnapshot};
