use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid share code: {0}")]
    InvalidCode(String),
}

/// Classified failures from the datastore collaborator.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Operation-boundary error for the sharing service.
///
/// A missing or expired record is a regular negative result, never an
/// error; these variants cover the failures that abort an operation.
#[derive(Debug, Clone, Error)]
pub enum ShareError {
    #[error("code space exhausted after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("invalid share code: {0}")]
    InvalidCode(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShareError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidCode(message) => Self::InvalidCode(message),
        }
    }
}
