//! Error types for dbcall

use thiserror::Error;

/// Core error type for backend operations
#[derive(Error, Debug)]
pub enum DbcallError {
    /// The backend rejected or failed a statement
    #[error("Query error: {0}")]
    Query(String),

    /// The backend cannot express the requested call
    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, DbcallError>;
