// CLI error types and user-facing messages

use thiserror::Error;

use docwarden_application::{ApplicationError, ErrorKind};
use docwarden_persistence::PersistenceError;

use crate::config::ConfigError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        CliError::Storage(err.to_string())
    }
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'docwarden --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(e) => format!(
                "Configuration error: {}\n\nCheck your config file or DOCWARDEN_* environment variables.",
                e
            ),
            CliError::Storage(msg) => format!(
                "Storage error: {}\n\nCheck that storage.data_dir is readable and writable.",
                msg
            ),
            CliError::Application(e) => application_message(e),
            CliError::Output(e) => format!("Failed to render output: {}", e),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgument { .. } => 2,
            CliError::Application(e) => match e.kind() {
                ErrorKind::Validation | ErrorKind::Unauthenticated => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::StorageUnavailable => 4,
                _ => 1,
            },
            _ => 1,
        }
    }
}

fn application_message(err: &ApplicationError) -> String {
    match err {
        ApplicationError::Validation { field, reason } => {
            format!("{} {}.", field, reason)
        }
        ApplicationError::NotFound { entity, id } => {
            format!("{} '{}' does not exist.", entity, id)
        }
        ApplicationError::Unauthenticated => {
            "No caller identity. Pass --as <subject> or set USER.".to_string()
        }
        ApplicationError::StorageUnavailable { reason } => {
            format!("File storage is unavailable ({}). Try again later.", reason)
        }
        ApplicationError::CascadeIncomplete {
            entity,
            id,
            completed,
            failed_child,
            cause,
        } => format!(
            "Deleting {} '{}' stopped after removing {} item(s): '{}' could not be deleted ({}).\n\nRun the same command again to resume.",
            entity,
            id,
            completed.len(),
            failed_child,
            cause
        ),
        other => other.to_string(),
    }
}

pub type CliResult<T> = Result<T, CliError>;
