//! Operation-level errors for clipshelf

use std::fmt;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Operation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Ingestion,
    Edit,
    SetRange,
    Upload,
    Purge,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Load => "load",
            Operation::Ingestion => "ingestion",
            Operation::Edit => "edit",
            Operation::SetRange => "set-range",
            Operation::Upload => "upload",
            Operation::Purge => "purge",
        };
        f.write_str(name)
    }
}

/// A domain failure tagged with the operation it interrupted
#[derive(Error, Debug)]
#[error("{operation} failed: {source}")]
pub struct OperationError {
    pub operation: Operation,
    #[source]
    pub source: DomainError,
}

impl OperationError {
    pub fn new(operation: Operation, source: DomainError) -> Self {
        Self { operation, source }
    }

    /// Whether the process should stop instead of returning to the menu
    pub fn is_fatal(&self) -> bool {
        self.source.is_fatal()
    }
}

/// Result type alias for clipshelf operations
pub type OperationResult<T> = std::result::Result<T, OperationError>;

/// Attach an operation name to a domain result
pub trait WithOperation<T> {
    fn during(self, operation: Operation) -> OperationResult<T>;
}

impl<T> WithOperation<T> for Result<T, DomainError> {
    fn during(self, operation: Operation) -> OperationResult<T> {
        self.map_err(|source| OperationError::new(operation, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_operation() {
        let err = OperationError::new(Operation::Edit, DomainError::NotEdited { id: 1000 });
        assert_eq!(err.to_string(), "edit failed: Video 1000 has not been edited yet");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatality_follows_source() {
        let err: OperationResult<()> =
            Err(DomainError::RecordNotFound { id: 7 }).during(Operation::Purge);
        assert!(err.unwrap_err().is_fatal());
    }
}
