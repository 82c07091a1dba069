//! Domain entities
//!
//! Organizations own members and organization-level documents; members own
//! their own documents. Every entity keeps its fields private and enforces its
//! invariants on construction.

mod document;
mod member;
mod organization;
mod upload;

pub use document::{Document, DocumentFilePatch};
pub use member::Member;
pub use organization::Organization;
pub use upload::{document_file_name, extension_for, is_supported_content_type, FileUpload};

use crate::errors::{DomainError, DomainResult};

/// Trim a required text field, rejecting blank input
pub(crate) fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}
