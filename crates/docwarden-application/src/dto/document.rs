//! Document DTOs and lifecycle commands

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use docwarden_domain::entities::{Document, FileUpload};
use docwarden_domain::expiry::ExpiryStatus;
use docwarden_domain::value_objects::{DocumentId, DocumentOwner, OwnerKind};

/// Command to add a document to an organization or member
///
/// `expiry_date` and `file` are optional so a missing value is reported as a
/// validation failure by the service rather than at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDocumentCommand {
    pub owner: DocumentOwner,
    pub title: String,
    pub expiry_date: Option<NaiveDate>,
    pub file: Option<FileUpload>,
}

/// Command to replace a document's file and expiry date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewDocumentCommand {
    pub document_id: DocumentId,
    pub new_expiry_date: Option<NaiveDate>,
    pub file: Option<FileUpload>,
}

/// Document DTO with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDto {
    pub id: String,
    pub title: String,
    pub expiry_date: NaiveDate,
    pub file_ref: String,
    pub owner_kind: OwnerKind,
    pub owner_id: String,
    pub status: ExpiryStatus,
    pub created_at: DateTime<Utc>,
}

impl DocumentDto {
    /// Create from domain entity and the status computed for it
    pub fn from_domain(document: &Document, status: ExpiryStatus) -> Self {
        let owner = document.owner();
        Self {
            id: document.id().to_string(),
            title: document.title().to_string(),
            expiry_date: document.expiry_date(),
            file_ref: document.file_ref().as_str().to_string(),
            owner_kind: owner.kind(),
            owner_id: owner.id().to_string(),
            status,
            created_at: document.created_at(),
        }
    }
}

/// File contents of a document ready to hand to a user
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentDownload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DocumentDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentDownload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Entry of the upcoming deadlines list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineDto {
    pub document: DocumentDto,
    /// Organization name, or the member's full name
    pub owner_name: String,
    /// Organization the owner belongs to (itself for organization owners)
    pub organization_id: String,
    pub organization_name: String,
    /// Negative once the document has expired
    pub days_remaining: i64,
}

/// What a cascading delete removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub deleted_members: Vec<String>,
    pub deleted_documents: Vec<String>,
}

impl CascadeSummary {
    pub(crate) fn absorb(&mut self, other: CascadeSummary) {
        self.deleted_members.extend(other.deleted_members);
        self.deleted_documents.extend(other.deleted_documents);
    }
}
