//! Domain errors for DocWarden

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    EntityNotFound { entity_type: String, id: String },

    #[error("Stored file not found: {file_ref}")]
    FileNotFound { file_ref: String },

    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    #[error("Invariant violation: {rule}")]
    InvariantViolation { rule: String },

    #[error("Concurrency conflict: {resource}")]
    ConcurrencyConflict { resource: String },

    #[error("Entity store failure: {reason}")]
    StoreFailure { reason: String },
}

impl DomainError {
    /// Shorthand for a field validation failure
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::EntityNotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Whether this error reports an absent entity or file
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::EntityNotFound { .. } | DomainError::FileNotFound { .. }
        )
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DomainError::not_found("Document", "doc-1");
        assert_eq!(err.to_string(), "Entity not found: Document with id doc-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_file_not_found_is_not_found() {
        let err = DomainError::FileNotFound {
            file_ref: "abc".into(),
        };
        assert!(err.is_not_found());
        assert!(!DomainError::validation("title", "required").is_not_found());
    }
}
