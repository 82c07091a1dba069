//! In-Memory Storage Gateway Implementation

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use docwarden_domain::{
    errors::{DomainError, DomainResult},
    ports::storage::{StorageGateway, StoredFile},
    value_objects::FileRef,
};

use crate::naming::new_storage_key;

/// Blob storage held in process memory
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    files: RwLock<HashMap<FileRef, StoredFile>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files (for testing)
    pub fn count(&self) -> usize {
        self.files.read().len()
    }

    /// Whether bytes are stored under `file_ref` (for testing)
    pub fn contains(&self, file_ref: &FileRef) -> bool {
        self.files.read().contains_key(file_ref)
    }
}

#[async_trait]
impl StorageGateway for InMemoryBlobStore {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> DomainResult<FileRef> {
        let file_ref = FileRef::new(new_storage_key(suggested_name));
        self.files.write().insert(
            file_ref.clone(),
            StoredFile {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(file_ref)
    }

    async fn get(&self, file_ref: &FileRef) -> DomainResult<StoredFile> {
        self.files
            .read()
            .get(file_ref)
            .cloned()
            .ok_or_else(|| DomainError::FileNotFound {
                file_ref: file_ref.to_string(),
            })
    }

    async fn delete(&self, file_ref: &FileRef) -> DomainResult<()> {
        self.files
            .write()
            .remove(file_ref)
            .map(|_| ())
            .ok_or_else(|| DomainError::FileNotFound {
                file_ref: file_ref.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwarden_domain::ports::storage::delete_idempotent;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryBlobStore::new();
        let file_ref = store
            .put(b"%PDF-1.4", "application/pdf", "cert.pdf")
            .await
            .unwrap();

        let stored = store.get(&file_ref).await.unwrap();
        assert_eq!(stored.bytes, b"%PDF-1.4");
        assert_eq!(stored.content_type, "application/pdf");

        store.delete(&file_ref).await.unwrap();
        assert!(!store.contains(&file_ref));
        assert!(matches!(
            store.get(&file_ref).await,
            Err(DomainError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = InMemoryBlobStore::new();
        let missing = FileRef::new("nope");
        assert!(store.delete(&missing).await.is_err());
        assert!(delete_idempotent(&store, &missing).await.is_ok());
    }
}
