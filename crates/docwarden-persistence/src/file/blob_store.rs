//! Local filesystem storage gateway

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use docwarden_domain::{
    errors::{DomainError, DomainResult},
    ports::storage::{StorageGateway, StoredFile},
    value_objects::FileRef,
};

use crate::naming::new_storage_key;

/// Directory under the root holding one metadata file per blob. Keys never
/// start with a dot, so no ref can resolve into it.
const META_DIR: &str = ".meta";

/// Metadata kept beside each blob
#[derive(Debug, Serialize, Deserialize)]
struct BlobMeta {
    content_type: String,
}

/// Stores each file under `root/<key>`; the key doubles as the file ref.
///
/// The declared content type is written to `root/.meta/<key>.json` and
/// returned by `get`. Blobs without metadata fall back to a guess from the
/// key's extension.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStore {
    root: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> DomainResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(META_DIR))
            .await
            .map_err(unavailable)?;
        debug!("Filesystem blob store rooted at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a ref to a path inside the root; refs this store never issued
    /// (separators, parent components) resolve to nothing.
    fn path_for(&self, file_ref: &FileRef) -> DomainResult<PathBuf> {
        let key = file_ref.as_str();
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(DomainError::FileNotFound {
                file_ref: key.to_string(),
            });
        }
        Ok(self.root.join(key))
    }

    fn meta_path(&self, file_ref: &FileRef) -> PathBuf {
        self.root
            .join(META_DIR)
            .join(format!("{}.json", file_ref.as_str()))
    }

    async fn read_content_type(&self, file_ref: &FileRef, path: &Path) -> DomainResult<String> {
        match fs::read(self.meta_path(file_ref)).await {
            Ok(raw) => {
                let meta: BlobMeta = serde_json::from_slice(&raw).map_err(|e| {
                    DomainError::StorageUnavailable {
                        reason: format!("corrupt metadata for {}: {}", file_ref, e),
                    }
                })?;
                Ok(meta.content_type)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()),
            Err(e) => Err(unavailable(e)),
        }
    }
}

fn unavailable(err: std::io::Error) -> DomainError {
    DomainError::StorageUnavailable {
        reason: err.to_string(),
    }
}

fn map_io(file_ref: &FileRef, err: std::io::Error) -> DomainError {
    if err.kind() == ErrorKind::NotFound {
        DomainError::FileNotFound {
            file_ref: file_ref.to_string(),
        }
    } else {
        unavailable(err)
    }
}

#[async_trait]
impl StorageGateway for FilesystemBlobStore {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> DomainResult<FileRef> {
        let file_ref = FileRef::new(new_storage_key(suggested_name));
        let path = self.root.join(file_ref.as_str());
        let meta = serde_json::to_vec(&BlobMeta {
            content_type: content_type.to_string(),
        })
        .map_err(|e| DomainError::StorageUnavailable {
            reason: e.to_string(),
        })?;

        fs::write(&path, bytes).await.map_err(unavailable)?;
        if let Err(e) = fs::write(self.meta_path(&file_ref), meta).await {
            // A blob without its metadata would read back with a guessed type
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!(file_ref = %file_ref, error = %cleanup, "Failed to remove blob after metadata write failed");
            }
            return Err(unavailable(e));
        }
        debug!("Stored {} bytes ({}) at {:?}", bytes.len(), content_type, path);
        Ok(file_ref)
    }

    async fn get(&self, file_ref: &FileRef) -> DomainResult<StoredFile> {
        let path = self.path_for(file_ref)?;
        let bytes = fs::read(&path).await.map_err(|e| map_io(file_ref, e))?;
        let content_type = self.read_content_type(file_ref, &path).await?;
        Ok(StoredFile {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, file_ref: &FileRef) -> DomainResult<()> {
        let path = self.path_for(file_ref)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| map_io(file_ref, e))?;
        match fs::remove_file(self.meta_path(file_ref)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(file_ref = %file_ref, error = %e, "Failed to remove blob metadata"),
        }
        debug!("Removed stored file {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::open(dir.path().join("files")).await.unwrap();

        let file_ref = store
            .put(b"%PDF-1.7", "application/pdf", "Safety Certificate_2025-03-01.pdf")
            .await
            .unwrap();
        assert!(store.root().join(file_ref.as_str()).exists());

        let stored = store.get(&file_ref).await.unwrap();
        assert_eq!(stored.bytes, b"%PDF-1.7");
        assert_eq!(stored.content_type, "application/pdf");

        store.delete(&file_ref).await.unwrap();
        assert!(matches!(
            store.delete(&file_ref).await,
            Err(DomainError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_declared_content_type_survives_mismatched_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::open(dir.path()).await.unwrap();

        let file_ref = store
            .put(b"\x89PNG", "image/png", "Badge_2025-01-01.bin")
            .await
            .unwrap();
        let stored = store.get(&file_ref).await.unwrap();
        assert_eq!(stored.content_type, "image/png");

        // Metadata goes with the blob
        store.delete(&file_ref).await.unwrap();
        assert!(!store.meta_path(&file_ref).exists());
    }

    #[tokio::test]
    async fn test_long_title_keeps_type_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::open(dir.path()).await.unwrap();
        let name = format!("{}_2025-01-01.pdf", "A".repeat(90));

        let file_ref = store.put(b"%PDF-1.7", "application/pdf", &name).await.unwrap();
        assert!(file_ref.as_str().ends_with(".pdf"), "{file_ref}");
        assert_eq!(
            store.get(&file_ref).await.unwrap().content_type,
            "application/pdf"
        );
    }

    #[tokio::test]
    async fn test_blob_without_metadata_guesses_from_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("legacy-scan.pdf"), b"%PDF-1.4").unwrap();

        let stored = store.get(&FileRef::new("legacy-scan.pdf")).await.unwrap();
        assert_eq!(stored.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_foreign_refs_never_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::open(dir.path()).await.unwrap();

        for raw in ["../secret", "/etc/passwd", "", ".hidden", ".meta"] {
            let result = store.get(&FileRef::new(raw)).await;
            assert!(matches!(result, Err(DomainError::FileNotFound { .. })), "{raw}");
        }
    }
}
