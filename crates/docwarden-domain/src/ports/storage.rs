//! Storage gateway port
//!
//! Opaque put/get/delete of file bytes. The returned [`FileRef`] is only ever
//! stored and handed back; implementations are free to encode whatever they
//! need in it (object key, path, remote file id).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::value_objects::FileRef;

/// File bytes read back from the gateway
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl std::fmt::Debug for StoredFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredFile")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Blob storage for document files
///
/// Every operation may fail with `DomainError::StorageUnavailable`.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Store bytes and return a fresh reference to them
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> DomainResult<FileRef>;

    /// Read stored bytes; `DomainError::FileNotFound` if the ref is unknown
    async fn get(&self, file_ref: &FileRef) -> DomainResult<StoredFile>;

    /// Remove stored bytes; `DomainError::FileNotFound` if the ref is unknown
    async fn delete(&self, file_ref: &FileRef) -> DomainResult<()>;
}

/// Delete treating an already-missing file as success
pub async fn delete_idempotent<S>(storage: &S, file_ref: &FileRef) -> DomainResult<()>
where
    S: StorageGateway + ?Sized,
{
    match storage.delete(file_ref).await {
        Err(DomainError::FileNotFound { .. }) => Ok(()),
        other => other,
    }
}
