use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::required_text;
use crate::errors::DomainResult;
use crate::expiry::{ExpiryPolicy, ExpiryStatus};
use crate::value_objects::{DocumentId, DocumentOwner, FileRef, OwnerKind};

/// A compliance document: one stored file plus the date it stops being valid.
///
/// Expiry status is always derived from `expiry_date` at read time and never
/// stored on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    title: String,
    expiry_date: NaiveDate,
    file_ref: FileRef,
    owner: DocumentOwner,
    created_at: DateTime<Utc>,
}

/// The fields a renewal replaces, written in one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilePatch {
    pub file_ref: FileRef,
    pub expiry_date: NaiveDate,
}

impl Document {
    /// Create a document record for an already-stored file
    pub fn create(
        owner: DocumentOwner,
        title: &str,
        expiry_date: NaiveDate,
        file_ref: FileRef,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: DocumentId::new(),
            title: required_text("title", title)?,
            expiry_date,
            file_ref,
            owner,
            created_at: Utc::now(),
        })
    }

    /// Replace file and expiry date, keeping identity, title and owner
    pub fn apply_file_patch(&mut self, patch: DocumentFilePatch) {
        self.file_ref = patch.file_ref;
        self.expiry_date = patch.expiry_date;
    }

    /// Classify this document against `today`
    pub fn status(&self, policy: &ExpiryPolicy, today: NaiveDate) -> ExpiryStatus {
        policy.classify(self.expiry_date, today)
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn file_ref(&self) -> &FileRef {
        &self.file_ref
    }

    pub fn owner(&self) -> DocumentOwner {
        self.owner
    }

    pub fn owner_kind(&self) -> OwnerKind {
        self.owner.kind()
    }

    /// Id of the owning organization or member
    pub fn owner_id(&self) -> uuid::Uuid {
        self.owner.id()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
