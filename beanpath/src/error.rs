//! Error types for facade construction and dispatch
//!
//! Every failure raised by the interception machinery is a [`FacadeError`].
//! Errors returned by the wrapped objects' own method bodies travel through
//! the dispatch chain untouched, so a caller sees exactly what the bean raised.

use thiserror::Error as ThisError;

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, FacadeError>;

/// Severity levels for error classification
///
/// - **Warning**: Potential issue but operation can proceed.
/// - **Error**: Operation failed but the facade remains usable.
/// - **Critical**: The facade (or its configuration) cannot be used at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but the facade remains usable
    Error,
    /// Facade cannot be built or configured
    Critical,
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use beanpath::{ErrorSeverity, FacadeError, Severity};
///
/// let error = FacadeError::invalid_argument("no types given");
/// assert_eq!(error.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Errors that can occur while building or driving a facade
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum FacadeError {
    /// No inheritable ancestor exists to build the facade on
    #[error("cannot build a facade for '{type_name}': no non-final accessible ancestor")]
    Configuration { type_name: String },

    /// A caller passed something the facade machinery cannot work with
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No resolver in the chain could handle the call
    #[error("unsupported operation '{method}' on {type_name}")]
    UnsupportedOperation { type_name: String, method: String },

    /// A method body reported a failure
    #[error("method '{method}' failed: {message}")]
    MethodFailed { method: String, message: String },

    /// A type name was not found in the registry
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Facade configuration could not be parsed
    #[error("invalid facade configuration: {0}")]
    InvalidConfig(String),
}

impl FacadeError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsupported operation error
    pub fn unsupported(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Create a method failure, typically from inside a native method body
    pub fn method_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MethodFailed {
            method: method.into(),
            message: message.into(),
        }
    }
}

impl Severity for FacadeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FacadeError::Configuration { .. } | FacadeError::InvalidConfig(_) => {
                ErrorSeverity::Critical
            }
            FacadeError::InvalidArgument(_)
            | FacadeError::UnsupportedOperation { .. }
            | FacadeError::MethodFailed { .. }
            | FacadeError::UnknownType(_) => ErrorSeverity::Error,
        }
    }
}
