//! Errors raised while invoking a routine

use dbcall_core::{ConversionError, DbcallError};
use thiserror::Error;

/// Error type for routine calls
///
/// Every variant aborts the call it was raised in. Nothing is retried here.
#[derive(Error, Debug)]
pub enum CallError {
    /// The call identifier has no routine descriptor
    #[error("no routine is mapped to call `{0}`")]
    UnresolvedRoutine(String),

    /// The call description is unusable (missing binding, too few inputs, ...)
    #[error("invalid call: {0}")]
    InvalidCall(String),

    /// An output value could not be coerced and the policy asks to fail
    #[error("output parameter `{parameter}` could not be converted: {source}")]
    Conversion {
        parameter: String,
        #[source]
        source: ConversionError,
    },

    /// The backend rejected or failed the command
    #[error(transparent)]
    BackendExecution(#[from] DbcallError),

    /// Catalog or invoker configuration could not be loaded
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CallError {
    /// Check if the call itself was malformed or unknown
    pub fn is_invalid_call(&self) -> bool {
        matches!(self, CallError::UnresolvedRoutine(_) | CallError::InvalidCall(_))
    }
}

/// Result type alias for routine calls
pub type Result<T> = std::result::Result<T, CallError>;
