use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// File bytes submitted for a new or renewed document
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    /// Declared MIME type; guessed from `file_name` when absent
    pub content_type: Option<String>,
    /// Name of the file on the uploader's side
    pub file_name: Option<String>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl FileUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Effective MIME type of the upload
    pub fn content_type(&self) -> String {
        if let Some(declared) = self
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
        {
            return declared.to_ascii_lowercase();
        }

        self.file_name
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first_raw())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string()
    }

    /// Extension for the stored file, from the upload name or the MIME type
    pub fn extension(&self) -> Option<String> {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase());

        from_name.or_else(|| extension_for(&self.content_type()))
    }

    /// Check the upload carries bytes of an accepted type (PDF or image)
    pub fn validate(&self) -> DomainResult<()> {
        if self.bytes.is_empty() {
            return Err(DomainError::validation("file", "is required"));
        }

        let content_type = self.content_type();
        if !is_supported_content_type(&content_type) {
            return Err(DomainError::validation(
                "file",
                format!("unsupported content type {content_type}; expected a PDF or an image"),
            ));
        }
        Ok(())
    }

    /// Storage name hint: `<title>_<expiry>.<ext>` with whitespace replaced by `_`
    pub fn suggested_name(&self, title: &str, expiry_date: NaiveDate) -> String {
        document_file_name(title, expiry_date, self.extension().as_deref())
    }
}

/// File name for a document: `<title>_<expiry>[.<ext>]` with whitespace and
/// path separators replaced by `_`
pub fn document_file_name(title: &str, expiry_date: NaiveDate, extension: Option<&str>) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();

    match extension {
        Some(ext) => format!("{stem}_{expiry_date}.{ext}"),
        None => format!("{stem}_{expiry_date}"),
    }
}

/// Preferred file extension for a MIME type
pub fn extension_for(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence {
        // mime_guess lists several aliases; pick the common ones
        "application/pdf" => Some("pdf".to_string()),
        "image/jpeg" => Some("jpg".to_string()),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string()),
    }
}

/// PDF documents and any image type are accepted
pub fn is_supported_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/pdf" || essence.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_content_type_guessed_from_name() {
        let upload = FileUpload::new(b"%PDF".to_vec()).with_file_name("cert.pdf");
        assert_eq!(upload.content_type(), "application/pdf");
    }

    #[test]
    fn test_declared_content_type_wins() {
        let upload = FileUpload::new(b"x".to_vec())
            .with_file_name("scan.bin")
            .with_content_type("Image/PNG");
        assert_eq!(upload.content_type(), "image/png");
        assert!(upload.validate().is_ok());
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let upload = FileUpload::new(Vec::new()).with_content_type("application/pdf");
        let err = upload.validate().unwrap_err();
        assert!(matches!(err, DomainError::ValidationError { ref field, .. } if field == "file"));
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let upload = FileUpload::new(b"zip".to_vec()).with_file_name("archive.zip");
        assert!(upload.validate().is_err());
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert!(is_supported_content_type("application/pdf; charset=binary"));
        assert!(!is_supported_content_type("text/plain"));
    }

    #[test]
    fn test_suggested_name() {
        let upload = FileUpload::new(b"%PDF".to_vec()).with_file_name("Scan 01.PDF");
        assert_eq!(
            upload.suggested_name("Safety Certificate", date()),
            "Safety_Certificate_2025-06-30.pdf"
        );
    }

    #[test]
    fn test_extension_for_jpeg() {
        assert_eq!(extension_for("image/jpeg").as_deref(), Some("jpg"));
        assert_eq!(extension_for("application/x-unknown-thing"), None);
    }

    #[test]
    fn test_suggested_name_extension_from_type() {
        let upload = FileUpload::new(b"%PDF".to_vec()).with_content_type("application/pdf");
        assert_eq!(upload.suggested_name("Permit", date()), "Permit_2025-06-30.pdf");
    }
}
