//! DocWarden Persistence Layer
//!
//! Infrastructure layer providing the entity store and storage gateway
//! implementations for the traits defined in `docwarden-domain`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Infrastructure Layer                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  memory/                    │  file/                             │
//! │  ─────────                  │  ─────                             │
//! │  InMemoryEntityStore        │  JsonFileEntityStore               │
//! │  InMemoryBlobStore          │  FilesystemBlobStore               │
//! └─────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ implements
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                               │
//! │  OrganizationRepository, MemberRepository, DocumentRepository,   │
//! │  StorageGateway                                                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use docwarden_persistence::{FilesystemBlobStore, JsonFileEntityStore};
//! use std::sync::Arc;
//!
//! let records = Arc::new(JsonFileEntityStore::open("./data/records.json")?);
//! let files = Arc::new(FilesystemBlobStore::open("./data/files").await?);
//! ```

pub mod error;
pub mod file;
pub mod memory;
mod naming;
mod state;
mod store;

pub use error::PersistenceError;
pub use store::{RecordStore, SnapshotBackend};

// Re-export commonly used types
pub use file::{FilesystemBlobStore, JsonFileEntityStore};
pub use memory::{InMemoryBlobStore, InMemoryEntityStore};
