//! Caller identity
//!
//! Authentication happens outside the engine. Every mutating operation takes
//! the already-established identity explicitly and only checks that one is
//! present.

use serde::{Deserialize, Serialize};

use crate::errors::{ApplicationError, ApplicationResult};

/// The authenticated subject performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject: String,
}

impl CallerIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into().trim().to_string(),
        }
    }

    /// Identity with no subject; every operation rejects it
    pub fn anonymous() -> Self {
        Self {
            subject: String::new(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_authenticated(&self) -> bool {
        !self.subject.is_empty()
    }

    pub(crate) fn ensure_authenticated(&self) -> ApplicationResult<&str> {
        if self.is_authenticated() {
            Ok(&self.subject)
        } else {
            Err(ApplicationError::Unauthenticated)
        }
    }
}
