/// Error types for post-service
use crate::storage::ObjectStoreError;
use crate::store::StoreError;
use thiserror::Error;

/// Failure category reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    DependencyFailure,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Dependency failure: {0}")]
    DependencyFailure(String),
}

impl ServiceError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::InvalidState(_) => ErrorKind::InvalidState,
            ServiceError::DependencyFailure(_) => ErrorKind::DependencyFailure,
        }
    }
}

/// Store diagnostics are logged here and never reach the caller's message
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "document store call failed");
        ServiceError::DependencyFailure("document store request failed".to_string())
    }
}

impl From<ObjectStoreError> for ServiceError {
    fn from(err: ObjectStoreError) -> Self {
        tracing::error!(error = %err, "object store call failed");
        ServiceError::DependencyFailure("object store request failed".to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_hide_backend_detail() {
        let err: ServiceError = StoreError::Backend("pg: 08006 connection reset".into()).into();
        assert_eq!(err.kind(), ErrorKind::DependencyFailure);
        assert!(!err.to_string().contains("08006"));
    }

    #[test]
    fn test_invalid_input_names_field() {
        let err = ServiceError::invalid_input("title", "Title must not be empty");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Invalid input: title: Title must not be empty");
    }
}
