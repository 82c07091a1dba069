//! Persistence Layer Error Types
//!
//! Error mapping to domain types

use thiserror::Error;

use docwarden_domain::errors::DomainError;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A write would break a referential or uniqueness rule
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}

/// Convert persistence errors to domain errors
impl From<PersistenceError> for DomainError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity_type, id } => DomainError::EntityNotFound {
                entity_type: entity_type.to_string(),
                id,
            },
            PersistenceError::Constraint(rule) => DomainError::InvariantViolation { rule },
            PersistenceError::Serialization(e) => DomainError::StoreFailure {
                reason: format!("serialization: {}", e),
            },
            PersistenceError::Io(e) => DomainError::StoreFailure {
                reason: format!("I/O: {}", e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = PersistenceError::not_found("Document", "doc-123");
        assert!(err.to_string().contains("Document"));
        assert!(err.to_string().contains("doc-123"));
    }

    #[test]
    fn test_error_conversion() {
        let err = PersistenceError::not_found("Member", "123");
        let domain_err: DomainError = err.into();
        assert!(matches!(domain_err, DomainError::EntityNotFound { .. }));

        let err = PersistenceError::constraint("duplicate file ref");
        let domain_err: DomainError = err.into();
        assert!(matches!(domain_err, DomainError::InvariantViolation { .. }));
    }
}
