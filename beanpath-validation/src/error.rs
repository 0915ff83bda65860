//! Error types for validation sessions

use beanpath::{ErrorSeverity, FacadeError, Severity};
use thiserror::Error as ThisError;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised while validating a bean
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ValidationError {
    /// Building or navigating a facade failed
    #[error(transparent)]
    Facade(#[from] FacadeError),

    /// One or more constraints were violated
    #[error("{count} constraint violation(s), first at '{first_path}'")]
    ConstraintsViolated { count: usize, first_path: String },
}

impl Severity for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ValidationError::Facade(inner) => inner.severity(),
            ValidationError::ConstraintsViolated { .. } => ErrorSeverity::Warning,
        }
    }
}
