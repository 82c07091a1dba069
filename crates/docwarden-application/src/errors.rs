//! Application layer error types
//!
//! These errors are what callers of the engine see. Domain and storage
//! failures are folded into a small, stable taxonomy so a presentation layer
//! can decide between "fix your input", "retry later" and "report a bug"
//! without inspecting messages.

use thiserror::Error;

use docwarden_domain::errors::DomainError;

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Coarse classification of an [`ApplicationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    StorageUnavailable,
    Conflict,
    CascadeIncomplete,
    Unauthenticated,
    Repository,
}

/// Application layer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    // === Input Errors ===
    /// Input rejected before any effect
    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },

    /// Caller identity missing or blank
    #[error("Unauthenticated: a caller identity is required")]
    Unauthenticated,

    // === Lookup Errors ===
    /// Referenced entity or stored file absent
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Reserved for concurrent modification reports
    #[error("Conflict on {resource}")]
    Conflict { resource: String },

    // === Infrastructure Errors ===
    /// Blob store failed; the operation may be retried
    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// Entity store failed
    #[error("Repository error: {0}")]
    Repository(String),

    // === Cascade Errors ===
    /// A cascading delete stopped part way
    #[error(
        "Cascade delete of {entity} {id} incomplete after {n} child deletion(s); {failed_child} failed: {cause}",
        n = .completed.len()
    )]
    CascadeIncomplete {
        entity: String,
        id: String,
        /// Child ids already deleted; retrying the cascade skips them
        completed: Vec<String>,
        failed_child: String,
        cause: Box<ApplicationError>,
    },
}

impl ApplicationError {
    /// Shorthand for a field validation failure
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::Validation { .. } => ErrorKind::Validation,
            ApplicationError::Unauthenticated => ErrorKind::Unauthenticated,
            ApplicationError::NotFound { .. } => ErrorKind::NotFound,
            ApplicationError::Conflict { .. } => ErrorKind::Conflict,
            ApplicationError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            ApplicationError::Repository(_) => ErrorKind::Repository,
            ApplicationError::CascadeIncomplete { .. } => ErrorKind::CascadeIncomplete,
        }
    }

    /// Id of the entity the error is about, when there is one
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            ApplicationError::NotFound { id, .. } => Some(id),
            ApplicationError::CascadeIncomplete { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether retrying the same call may succeed without caller changes
    pub fn is_retryable(&self) -> bool {
        match self {
            ApplicationError::StorageUnavailable { .. } => true,
            ApplicationError::CascadeIncomplete { cause, .. } => cause.is_retryable(),
            _ => false,
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError { field, reason } => {
                ApplicationError::Validation { field, reason }
            }
            DomainError::EntityNotFound { entity_type, id } => ApplicationError::NotFound {
                entity: entity_type,
                id,
            },
            DomainError::FileNotFound { file_ref } => ApplicationError::NotFound {
                entity: "File".to_string(),
                id: file_ref,
            },
            DomainError::StorageUnavailable { reason } => {
                ApplicationError::StorageUnavailable { reason }
            }
            DomainError::ConcurrencyConflict { resource } => ApplicationError::Conflict { resource },
            DomainError::InvariantViolation { rule } => ApplicationError::Repository(rule),
            DomainError::StoreFailure { reason } => ApplicationError::Repository(reason),
        }
    }
}
